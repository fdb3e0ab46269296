use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::content_hash::ContentHash;
use derive_new::new;

/// A named pointer to a head commit; `None` until the first commit
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Branch {
    name: BranchName,
    head: Option<ContentHash>,
}

impl Branch {
    pub fn name(&self) -> &BranchName {
        &self.name
    }

    pub fn head(&self) -> Option<&ContentHash> {
        self.head.as_ref()
    }
}
