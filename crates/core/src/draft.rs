//! Draft content snapshots, fingerprints, and text helpers (editor core).
//!
//! [`DraftContent`] is the value the editing surface hands to the autosave
//! engine on every change. The engine never mutates it; it only compares
//! [`Fingerprint`]s and checks the emptiness rule.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of plain-text characters used for the auto-generated excerpt.
pub const PREVIEW_CHARS: usize = 160;

/// Title sent when a draft is created before the author typed one.
pub const UNTITLED: &str = "Untitled";

/// Matches any markup tag, e.g. `<p>`, `</strong>`, `<img src="..">`.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

// ---------------------------------------------------------------------------
// DraftContent
// ---------------------------------------------------------------------------

/// The mutable payload of an article being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftContent {
    pub title: String,
    pub subtitle: String,
    /// Rich-text body as HTML.
    pub body: String,
}

impl DraftContent {
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            body: body.into(),
        }
    }

    /// Returns `true` when neither the title nor the de-marked body carry
    /// any non-whitespace text. The subtitle is deliberately ignored.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && text_content(&self.body).is_empty()
    }

    /// Value-equality key for this snapshot.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self)
    }

    /// Title to send on an autosave create: the title as typed, or
    /// [`UNTITLED`] when it is empty.
    pub fn title_or_untitled(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    /// Subtitle as an optional field; an empty subtitle is omitted.
    pub fn subtitle_opt(&self) -> Option<&str> {
        (!self.subtitle.is_empty()).then_some(self.subtitle.as_str())
    }
}

// ---------------------------------------------------------------------------
// Fingerprint
// ---------------------------------------------------------------------------

/// SHA-256 digest of the JSON serialization of a [`DraftContent`].
///
/// Two snapshots have equal fingerprints exactly when their serialized
/// forms are byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(content: &DraftContent) -> Self {
        let json =
            serde_json::to_string(content).expect("DraftContent is always serialisable");
        Self(format!("{:x}", Sha256::digest(json.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

/// Strip all markup from `html` and trim the result.
///
/// Tags are removed without inserting separators, which is what the
/// emptiness rule needs.
pub fn text_content(html: &str) -> String {
    TAG_RE.replace_all(html, "").trim().to_string()
}

/// Plain text with tags replaced by whitespace and runs of whitespace
/// collapsed, so adjacent blocks do not glue words together.
pub fn plain_text(html: &str) -> String {
    let spaced = TAG_RE.replace_all(html, " ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of whitespace-separated words in the body.
pub fn word_count(html: &str) -> usize {
    TAG_RE.replace_all(html, " ").split_whitespace().count()
}

/// First [`PREVIEW_CHARS`] characters of the body's plain text, trimmed.
pub fn content_preview(html: &str) -> String {
    plain_text(html)
        .chars()
        .take(PREVIEW_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}
