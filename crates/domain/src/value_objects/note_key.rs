//! Cache key for generated notes
//!
//! A key is made of a readable, normalized part (useful when browsing the
//! saved-notes list) followed by a short blake3 digest of the raw fields.
//! Normalization alone is lossy ("Cells & Tissues" and "Cells, Tissues"
//! collapse to the same text), the digest keeps such keys apart.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    errors::DomainError,
    value_objects::{ClassLevel, DetailLevel},
};

/// Namespace prefix shared by every note cache key
pub const NOTE_KEY_PREFIX: &str = "pearl_notes_cache_v2_";

const DIGEST_HEX_LEN: usize = 16;

/// Replace every run of characters outside `[A-Za-z0-9_]` with a single `_`
/// and lowercase the result.
pub fn normalize_key_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c.to_ascii_lowercase());
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Deterministic cache key for a (subject, class, topic, detail) tuple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoteKey(String);

impl NoteKey {
    /// Derive the key for a note request
    pub fn derive(subject: &str, class_level: ClassLevel, topic: &str, detail: DetailLevel) -> Self {
        let readable = normalize_key_text(&format!(
            "{subject}_{class_level}_{topic}_{detail}"
        ));

        // Length-prefix each field so ("ab", "c") and ("a", "bc") hash differently.
        let mut hasher = blake3::Hasher::new();
        for field in [subject, class_level.as_str(), topic, detail.as_str()] {
            hasher.update(&(field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        let digest = hasher.finalize().to_hex();

        Self(format!(
            "{NOTE_KEY_PREFIX}{readable}_{}",
            &digest.as_str()[..DIGEST_HEX_LEN]
        ))
    }

    /// Accept a key received from outside (e.g. a delete request)
    pub fn from_raw(raw: &str) -> Result<Self, DomainError> {
        let Some(rest) = raw.strip_prefix(NOTE_KEY_PREFIX) else {
            return Err(DomainError::InvalidNoteKey(raw.to_string()));
        };
        if rest.is_empty()
            || !rest
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(DomainError::InvalidNoteKey(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a stored key belongs to the note namespace
    pub fn is_note_key(raw: &str) -> bool {
        raw.starts_with(NOTE_KEY_PREFIX)
    }
}

impl fmt::Display for NoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NoteKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NoteKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_raw(&value)
    }
}

impl From<NoteKey> for String {
    fn from(key: NoteKey) -> Self {
        key.0
    }
}
