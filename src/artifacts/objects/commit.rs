//! Commit record
//!
//! Commits are immutable snapshots of the staged tree. A commit's id is the
//! root hash of its snapshot, so two commits over identical trees share one
//! id. Parents are referenced by id and resolved through the commit store.
//!
//! ## Format
//!
//! Stored as JSON under `.savit/commits/<hh>/<rest>`:
//!
//! ```text
//! {"id":"...","message":"...","parent":"..."|null,"timestamp":"...","snapshot":{...}}
//! ```

use crate::artifacts::objects::content_hash::ContentHash;
use crate::artifacts::objects::object::Record;
use crate::artifacts::tree::snapshot::Snapshot;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    id: ContentHash,
    message: String,
    parent: Option<ContentHash>,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
    snapshot: Snapshot,
}

impl Commit {
    /// Create a commit over `snapshot`; the id is taken from its root hash
    pub fn new(snapshot: Snapshot, message: String, parent: Option<ContentHash>) -> Self {
        Commit {
            id: snapshot.root_hash().clone(),
            message,
            parent,
            timestamp: chrono::Local::now().fixed_offset(),
            snapshot,
        }
    }

    pub fn id(&self) -> &ContentHash {
        &self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the message
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn parent(&self) -> Option<&ContentHash> {
        self.parent.as_ref()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Log line in the `id: message` format
    pub fn log_entry(&self) -> String {
        format!("{}: {}", self.id, self.message)
    }
}

impl Record for Commit {
    fn kind() -> &'static str {
        "commit"
    }
}
