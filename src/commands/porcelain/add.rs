use crate::areas::index::StageReport;
use crate::areas::repository::Repository;
use crate::artifacts::tree::hash_tree::HashTree;
use crate::errors::Result;
use std::path::Path;

impl Repository {
    /// Stage a file or every file beneath a directory
    ///
    /// Tracked files that were deleted from disk are untracked. A directory
    /// without any file is tracked as an empty directory. Files beneath a
    /// directory that cannot be hashed are reported in
    /// [`StageReport::skipped`] and keep their previous stage entry; the rest
    /// of the directory is still staged.
    pub async fn stage(&self, path: &Path) -> Result<StageReport> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;

        // Load the stage on top of the head snapshot
        index.load(&self.head_snapshot()?)?;

        let relative = index.tree().relative(path)?;
        let mut report = StageReport::default();

        if self.workspace().is_dir(&relative) {
            let (leaves, skipped) = HashTree::scan_leaves(self.path(), &relative);
            let deleted = index
                .tree()
                .snapshot()
                .leaves()
                .filter(|leaf| leaf.path.starts_with(&relative))
                .filter(|leaf| !self.workspace().exists(&leaf.path))
                .map(|leaf| leaf.path.clone())
                .collect::<Vec<_>>();

            let untouched = leaves.is_empty() && skipped.is_empty() && deleted.is_empty();

            report.staged = index.add_leaves(leaves);
            for path in deleted {
                report.staged.push(index.add(&path)?);
            }
            if untouched && !relative.as_os_str().is_empty() {
                report.staged.push(index.add(&relative)?);
            }
            report.skipped = skipped;
        } else {
            report.staged.push(index.add(&relative)?);
        }

        index.write_updates()?;
        tracing::debug!(
            staged = report.staged.len(),
            skipped = report.skipped.len(),
            root_hash = %index.tree().root_hash(),
            "staged paths"
        );

        Ok(report)
    }
}
