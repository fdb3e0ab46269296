use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::content_hash::ContentHash;
use crate::errors::{Result, SavitError};
use derive_new::new;
use std::collections::HashSet;

/// Commits reachable from `start`, newest first
#[derive(Clone, new)]
pub struct RevList<'r> {
    repository: &'r Repository,
    start: Option<ContentHash>,
}

impl<'r> IntoIterator for RevList<'r> {
    type Item = Result<Commit>;
    type IntoIter = RevListIntoIter<'r>;

    fn into_iter(self) -> Self::IntoIter {
        RevListIntoIter {
            repository: self.repository,
            current_commit_id: self.start,
            visited: HashSet::new(),
        }
    }
}

#[derive(Clone)]
pub struct RevListIntoIter<'r> {
    repository: &'r Repository,
    current_commit_id: Option<ContentHash>,
    visited: HashSet<ContentHash>,
}

impl Iterator for RevListIntoIter<'_> {
    type Item = Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_id = self.current_commit_id.take()?;

        if !self.visited.insert(commit_id.clone()) {
            return Some(Err(SavitError::corrupt(
                format!("commit {}", commit_id),
                "parent chain loops back on itself",
            )));
        }

        match self.repository.load_commit(&commit_id) {
            Ok(commit) => {
                // Move to the parent commit for the next iteration
                self.current_commit_id = commit.parent().cloned();
                Some(Ok(commit))
            }
            // the iteration ends at the first unreadable commit
            Err(err) => Some(Err(err)),
        }
    }
}
