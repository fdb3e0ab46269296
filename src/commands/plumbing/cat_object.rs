use crate::areas::repository::Repository;
use crate::artifacts::objects::content_hash::ContentHash;
use crate::artifacts::objects::delta::Delta;
use crate::errors::Result;

impl Repository {
    /// Read the edit script stored for a content hash
    pub fn show_object(&self, hash: &str) -> Result<Delta> {
        self.ensure_initialized()?;

        let hash = ContentHash::try_parse(hash.trim().to_string())?;
        self.objects().get(&hash)
    }
}

#[cfg(test)]
mod tests {
    use crate::areas::repository::Repository;
    use crate::artifacts::objects::content_hash::ContentHash;
    use crate::config::Config;
    use crate::errors::SavitError;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[tokio::test]
    async fn show_object_returns_the_stored_script() {
        let dir = TempDir::new().unwrap();
        dir.child("a.txt").write_str("hello").unwrap();
        let repository = Repository::new(dir.path(), Config::default()).unwrap();
        repository.init().await.unwrap();
        repository.stage(Path::new("a.txt")).await.unwrap();
        repository.commit("first").await.unwrap();

        let delta = repository
            .show_object(ContentHash::digest("hello").as_ref())
            .unwrap();

        assert_eq!(delta.base, None);
        assert_eq!(delta.script.len(), 1);
    }

    #[tokio::test]
    async fn show_object_rejects_malformed_hashes() {
        let dir = TempDir::new().unwrap();
        let repository = Repository::new(dir.path(), Config::default()).unwrap();
        repository.init().await.unwrap();

        let err = repository.show_object("xyz").unwrap_err();

        assert!(matches!(err, SavitError::InvalidHash(_)));
    }
}
