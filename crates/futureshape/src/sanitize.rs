//! Best-effort repair of extracted text before it is accepted as
//! structured data.
//!
//! Adapters assemble each entry as a JSON object payload with the scraped
//! text inserted verbatim (only quotes and backslashes are escaped). Scraped
//! text regularly carries raw control characters, which strict JSON
//! rejects. [`clean`] makes one repair pass: it finds the character at the
//! parse failure, removes every occurrence of it, and parses again. A
//! second failure is final.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// The payload could not be turned into a record.
#[derive(thiserror::Error, Debug)]
pub enum SanitizeError {
    #[error("payload still malformed after removing {removed:?}: {source}")]
    Unrepaired {
        removed: char,
        #[source]
        source: serde_json::Error,
    },

    #[error("payload malformed with no offending character to remove: {0}")]
    Unlocatable(#[source] serde_json::Error),

    #[error("payload does not match the record shape: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Parse `text` strictly, repairing it once on failure.
pub fn clean(text: &str) -> Result<Value, SanitizeError> {
    let err = match serde_json::from_str::<Value>(text) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    // Truncated input has no character to blame.
    if err.classify() == serde_json::error::Category::Eof {
        return Err(SanitizeError::Unlocatable(err));
    }

    let Some(offending) = offending_char(text, err.line(), err.column()) else {
        return Err(SanitizeError::Unlocatable(err));
    };

    debug!("removing {offending:?} from payload after parse error: {err}");
    let repaired: String = text.chars().filter(|&c| c != offending).collect();
    serde_json::from_str::<Value>(&repaired).map_err(|source| SanitizeError::Unrepaired {
        removed: offending,
        source,
    })
}

/// [`clean`] followed by a typed decode.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, SanitizeError> {
    let value = clean(text)?;
    serde_json::from_value(value).map_err(SanitizeError::Shape)
}

/// Locate the character a parse error points at.
///
/// `line` and `column` are serde_json's 1-based position, where the column
/// counts bytes up to and including the offending one. A column of 0 means
/// the offender was the newline ending the previous line.
fn offending_char(text: &str, line: usize, column: usize) -> Option<char> {
    if line == 0 {
        return None;
    }
    let line_start = if line == 1 {
        0
    } else {
        text.match_indices('\n').nth(line - 2)?.0 + 1
    };

    let mut offset = if column == 0 {
        line_start.checked_sub(1)?
    } else {
        line_start + column - 1
    };
    if offset >= text.len() {
        return None;
    }
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    text[offset..].chars().next()
}

/// Builder for one record's JSON object payload.
#[derive(Debug, Default)]
pub struct RecordPayload {
    body: String,
}

impl RecordPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `"key": "value"`. The value keeps everything but quotes and
    /// backslashes verbatim.
    pub fn field(mut self, key: &str, value: &str) -> Self {
        if !self.body.is_empty() {
            self.body.push_str(", ");
        }
        self.body.push('"');
        self.body.push_str(key);
        self.body.push_str("\": \"");
        for c in value.chars() {
            match c {
                '"' => self.body.push_str("\\\""),
                '\\' => self.body.push_str("\\\\"),
                _ => self.body.push(c),
            }
        }
        self.body.push('"');
        self
    }

    /// The finished `{...}` payload text.
    pub fn finish(self) -> String {
        format!("{{{}}}", self.body)
    }

    /// Finish and decode through the sanitizer.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, SanitizeError> {
        decode(&self.finish())
    }
}
