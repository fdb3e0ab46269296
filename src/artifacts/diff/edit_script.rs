//! Line edit scripts
//!
//! An edit script describes how to turn a base text into a derived text as
//! three ordered lists of line edits. Indices are interpreted by
//! [`apply_diff`](crate::artifacts::diff::line_diff::apply_diff):
//!
//! - `replaced_lines`: index of the base line to overwrite
//! - `inserted_lines`: splice position in the working sequence, applied ascending
//! - `deleted_lines`: index of the base line to remove, checked against its value

use derive_new::new;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct LineEdit {
    pub line_index: usize,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditScript {
    #[serde(default)]
    pub inserted_lines: Vec<LineEdit>,
    #[serde(default)]
    pub deleted_lines: Vec<LineEdit>,
    #[serde(default)]
    pub replaced_lines: Vec<LineEdit>,
}

impl EditScript {
    pub fn is_empty(&self) -> bool {
        self.inserted_lines.is_empty()
            && self.deleted_lines.is_empty()
            && self.replaced_lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inserted_lines.len() + self.deleted_lines.len() + self.replaced_lines.len()
    }
}
