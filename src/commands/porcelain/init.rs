use crate::areas::refs::NULL_POINTER;
use crate::areas::repository::Repository;
use crate::errors::{IoContext, Result};
use std::fs;
use std::path::Path;

impl Repository {
    /// Create the control directory skeleton
    ///
    /// Missing pieces are filled in and existing ones left alone, so running
    /// it twice is harmless. Returns `false` if the repository already existed.
    pub async fn init(&self) -> Result<bool> {
        let created = !self.control_path().exists();

        if !self.path().exists() {
            create_dir(self.path())?;
            tracing::debug!(path = %self.path().display(), "created working directory");
        }

        create_dir(self.objects().objects_path())?;
        create_dir(self.commits().objects_path())?;
        create_dir(&self.refs().heads_path())?;

        if !self.refs().head_path().exists() {
            self.refs().update_head(None)?;
        }

        let default_branch = self.config().default_branch();
        if !self.refs().branch_path().exists() {
            self.refs().set_current_branch(default_branch)?;
        }
        self.refs().create_branch(default_branch, None)?;

        let index = self.index();
        let index = index.lock().await;
        // create the index file if it does not exist
        if !index.path().exists() {
            fs::write(index.path(), b"").at_path(index.path())?;
        }

        if created {
            tracing::info!(path = %self.path().display(), "initialized repository");
        }

        Ok(created)
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).at_path(path)
}
