use crate::areas::repository::Repository;
use crate::artifacts::checkout::reconstruction::Reconstructor;
use crate::artifacts::diff::line_diff::diff_texts;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::delta::Delta;
use crate::artifacts::tree::hash_tree::HashTree;
use crate::artifacts::tree::snapshot::Snapshot;
use crate::errors::{Result, SavitError};
use std::path::PathBuf;

impl Repository {
    /// Record the stage as a commit on the current branch
    ///
    /// Fails with `NothingToCommit` when the stage matches the head, and with
    /// `ValidationFailure` when a changed file was edited after staging.
    pub async fn commit(&self, message: &str) -> Result<Commit> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;

        let parent = self.head_commit()?;
        let parent_snapshot = parent
            .as_ref()
            .map(|commit| commit.snapshot().clone())
            .unwrap_or_default();

        // Load the stage on top of the head snapshot
        index.load(&parent_snapshot)?;

        let working = index.tree().snapshot().clone();
        let changes = working
            .compare(&parent_snapshot)
            .ok_or(SavitError::NothingToCommit)?;

        self.validate_changes(index.tree(), &changes)?;
        self.generate_objects(parent.as_ref(), &working, &changes)?;

        let commit = Commit::new(
            working,
            message.to_string(),
            parent.as_ref().map(|parent| parent.id().clone()),
        );
        let commit = if self.commits().put(commit.id(), &commit)? {
            commit
        } else {
            tracing::info!(id = %commit.id(), "tree already committed, reusing the stored commit");
            self.load_commit(commit.id())?
        };

        let branch = self.current_branch()?;
        self.refs().update_ref(&branch, Some(commit.id()))?;
        self.refs().update_head(Some(commit.id()))?;

        index.clear(commit.snapshot());
        index.write_updates()?;

        tracing::info!(
            id = %commit.id(),
            %branch,
            changes = changes.len(),
            "created commit"
        );

        Ok(commit)
    }

    /// Persist one edit script per changed file, keyed by its new content hash
    ///
    /// Scripts are computed against the content the parent commit recorded for
    /// the same path. Deleted files and contents already stored produce nothing.
    pub fn generate_objects(
        &self,
        parent: Option<&Commit>,
        working: &Snapshot,
        changes: &[PathBuf],
    ) -> Result<()> {
        let mut reconstructor = Reconstructor::new(self.objects());

        for path in changes {
            let Some(hash) = working.leaf_hash(path) else {
                continue;
            };

            if self.objects().contains(hash) {
                tracing::debug!(path = %path.display(), %hash, "content already stored");
                continue;
            }

            let base = parent.and_then(|parent| parent.snapshot().leaf_hash(path));
            let base_text = match base {
                Some(base) => reconstructor.content(base)?,
                None => String::new(),
            };
            let current = self.workspace().read_file(path)?;

            let delta = Delta::new(base.cloned(), diff_texts(&base_text, &current));
            self.objects().put(hash, &delta)?;
        }

        Ok(())
    }

    fn validate_changes(&self, tree: &HashTree, changes: &[PathBuf]) -> Result<()> {
        changes
            .iter()
            .filter(|path| tree.snapshot().leaf_hash(path).is_some())
            .try_for_each(|path| tree.validate(path))
    }
}
