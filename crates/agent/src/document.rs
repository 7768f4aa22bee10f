//! Draft file format.
//!
//! ```text
//! # Title
//! ## Optional subtitle
//!
//! Body paragraphs separated by blank lines, or raw HTML.
//! ```
//!
//! The title and subtitle headings are optional. A body that starts with
//! `<` is taken as HTML verbatim; anything else is split into paragraphs
//! and escaped.

use quill_core::draft::DraftContent;

/// Parse a draft file into the editor's content snapshot.
pub fn parse(text: &str) -> DraftContent {
    let mut lines = text.lines().peekable();
    let mut title = String::new();
    let mut subtitle = String::new();

    skip_blank(&mut lines);
    if let Some(rest) = lines.peek().and_then(|l| heading(l, "# ")) {
        title = rest.to_string();
        lines.next();

        skip_blank(&mut lines);
        if let Some(rest) = lines.peek().and_then(|l| heading(l, "## ")) {
            subtitle = rest.to_string();
            lines.next();
        }
    }

    let body: Vec<&str> = lines.collect();
    DraftContent::new(title, subtitle, body_html(&body.join("\n")))
}

fn skip_blank<'a, I>(lines: &mut std::iter::Peekable<I>)
where
    I: Iterator<Item = &'a str>,
{
    while lines.peek().is_some_and(|l| l.trim().is_empty()) {
        lines.next();
    }
}

fn heading<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.trim_start().strip_prefix(marker).map(str::trim)
}

/// Convert the body to HTML: pass HTML through, wrap text paragraphs.
pub fn body_html(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() || body.starts_with('<') {
        return body.to_string();
    }

    body.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", escape(p)))
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
