use crate::areas::repository::Repository;
use crate::errors::Result;
use std::path::PathBuf;

impl Repository {
    /// Paths whose staged state differs from the head commit
    ///
    /// Empty when the stage matches the head. An added empty directory changes
    /// the fingerprint without reporting a path.
    pub async fn changes(&self) -> Result<Vec<PathBuf>> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;

        let head = self.head_snapshot()?;
        index.load(&head)?;

        Ok(index.tree().compare(&head).unwrap_or_default())
    }
}
