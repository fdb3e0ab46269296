use crate::areas::repository::Repository;
use crate::artifacts::branch::branch::Branch;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::reconstruction::Reconstructor;
use crate::artifacts::objects::commit::Commit;
use crate::errors::Result;

impl Repository {
    /// Switch branches
    ///
    /// Without a name the current branch is returned untouched. An unknown
    /// name creates a branch at the current head and switches to it without
    /// touching the working directory. An existing branch has its head commit
    /// written out to the working directory and becomes the new stage.
    pub async fn checkout(&self, name: Option<&str>) -> Result<Branch> {
        self.ensure_initialized()?;

        let current = self.current_branch()?;
        let Some(name) = name else {
            let head = self.refs().read_head()?;
            return Ok(Branch::new(current, head));
        };
        let target = BranchName::try_parse(name.to_string())?;

        let index = self.index();
        let mut index = index.lock().await;

        if !self.refs().branch_exists(&target) {
            let head = self.refs().read_head()?;
            self.refs().create_branch(&target, head.as_ref())?;
            self.refs().set_current_branch(&target)?;

            tracing::info!(from = %current, to = %target, "switched to a new branch");
            return Ok(Branch::new(target, head));
        }

        let previous = self.head_commit()?;
        let target_head = self.refs().read_ref(&target)?;
        let target_commit = target_head
            .as_ref()
            .map(|id| self.load_commit(id))
            .transpose()?;

        self.reconstruct_directory(previous.as_ref(), target_commit.as_ref())?;

        self.refs().set_current_branch(&target)?;
        self.refs().update_head(target_head.as_ref())?;

        let snapshot = target_commit
            .as_ref()
            .map(|commit| commit.snapshot().clone())
            .unwrap_or_default();
        index.clear(&snapshot);
        index.write_updates()?;

        tracing::info!(from = %current, to = %target, "switched branch");

        Ok(Branch::new(target, target_head))
    }

    /// Write every file tracked by `target` into the working directory
    ///
    /// Files tracked by `previous` but not by `target` are removed. Untracked
    /// files and the control directory are left alone.
    pub fn reconstruct_directory(
        &self,
        previous: Option<&Commit>,
        target: Option<&Commit>,
    ) -> Result<()> {
        let mut reconstructor = Reconstructor::new(self.objects());

        if let Some(target) = target {
            for leaf in target.snapshot().leaves() {
                let content = reconstructor.content(&leaf.hash)?;
                self.workspace().write_file(&leaf.path, &content)?;
            }

            for directory in target.snapshot().empty_directories() {
                self.workspace().make_directory(directory)?;
            }
        }

        let kept = target
            .map(|target| target.snapshot().tracked_paths())
            .unwrap_or_default();

        if let Some(previous) = previous {
            for leaf in previous.snapshot().leaves() {
                if !kept.contains(&leaf.path) {
                    tracing::debug!(path = %leaf.path.display(), "removing file absent from target");
                    self.workspace().remove_file(&leaf.path)?;
                }
            }
        }

        Ok(())
    }
}
