//! Comic generation request model, field merging, and submission validation.
//!
//! The request is mutated one named field at a time (front ends patch
//! fields by name) and checked for presence just before submission.

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Field name constants
// ---------------------------------------------------------------------------

/// Comic genre field.
pub const FIELD_GENRE: &str = "genre";
/// Story setting field.
pub const FIELD_SETTING: &str = "setting";
/// Character description field.
pub const FIELD_CHARACTERS: &str = "characters";
/// Character names field (camelCase on the wire).
pub const FIELD_CHARACTER_NAMES: &str = "characterNames";

/// All field names accepted by [`ComicRequest::set_field`].
pub const VALID_FIELDS: &[&str] = &[
    FIELD_GENRE,
    FIELD_SETTING,
    FIELD_CHARACTERS,
    FIELD_CHARACTER_NAMES,
];

/// Banner message for a submission with any required field blank.
pub const MSG_FILL_ALL_FIELDS: &str = "Please fill in all fields";

// ---------------------------------------------------------------------------
// Request model
// ---------------------------------------------------------------------------

/// Parameters for one comic generation run.
///
/// Serialized as the `/generate-prompts` request body. The server contract
/// names every field with a single lowercase word except `characterNames`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComicRequest {
    pub genre: String,
    pub setting: String,
    pub characters: String,
    #[serde(rename = "characterNames")]
    pub character_names: String,
    /// Per-panel dialogue lines, in panel order. Omitted from the wire
    /// body when no panel has been given a line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialogues: Option<Vec<String>>,
}

impl ComicRequest {
    /// Merge a single named field into the request, leaving all other
    /// fields unchanged.
    ///
    /// Returns a validation error for field names outside [`VALID_FIELDS`].
    /// Dialogue lines are panel-indexed and set via [`Self::set_dialogue`].
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), CoreError> {
        match name {
            FIELD_GENRE => self.genre = value.to_string(),
            FIELD_SETTING => self.setting = value.to_string(),
            FIELD_CHARACTERS => self.characters = value.to_string(),
            FIELD_CHARACTER_NAMES => self.character_names = value.to_string(),
            _ => {
                return Err(CoreError::Validation(format!(
                    "Unknown form field: '{name}'. Valid fields: {}",
                    VALID_FIELDS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Set the dialogue line for one panel, growing the sequence with
    /// empty lines as needed to reach that panel index.
    pub fn set_dialogue(&mut self, panel: usize, line: &str) {
        let dialogues = self.dialogues.get_or_insert_with(Vec::new);
        if dialogues.len() <= panel {
            dialogues.resize(panel + 1, String::new());
        }
        dialogues[panel] = line.to_string();
    }

    /// Presence check performed immediately before submission.
    ///
    /// `genre`, `setting`, and `characters` must be non-blank; whitespace-only
    /// values count as blank. `character_names` and `dialogues` are never
    /// required. The error carries [`MSG_FILL_ALL_FIELDS`] so callers can
    /// surface it directly.
    pub fn validate_for_submission(&self) -> Result<(), CoreError> {
        let required = [&self.genre, &self.setting, &self.characters];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(CoreError::Validation(MSG_FILL_ALL_FIELDS.to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
