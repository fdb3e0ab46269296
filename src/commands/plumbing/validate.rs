use crate::areas::repository::Repository;
use crate::errors::Result;
use std::path::Path;

impl Repository {
    /// Check that a tracked file or directory still hashes to its staged value
    pub async fn validate(&self, path: &Path) -> Result<()> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;

        index.load(&self.head_snapshot()?)?;

        index.tree().validate(path)
    }
}
