//! Stored edit script
//!
//! A delta is the object written for one file content. It is keyed by the
//! hash of the content it produces and names the content it applies to.
//!
//! ## Format
//!
//! ```text
//! {"base":"<hash>"|null,"insertedLines":[...],"deletedLines":[...],"replacedLines":[...]}
//! ```

use crate::artifacts::diff::edit_script::EditScript;
use crate::artifacts::objects::content_hash::ContentHash;
use crate::artifacts::objects::object::Record;
use derive_new::new;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Delta {
    /// Content the script applies to; `None` means the empty text
    pub base: Option<ContentHash>,
    #[serde(flatten)]
    pub script: EditScript,
}

impl Record for Delta {
    fn kind() -> &'static str {
        "edit script"
    }
}
