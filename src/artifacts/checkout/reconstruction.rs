use crate::areas::database::Database;
use crate::artifacts::diff::line_diff::apply_diff;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::content_hash::ContentHash;
use crate::artifacts::objects::delta::Delta;
use crate::errors::{Result, SavitError};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// One reconstruction session over the object store
///
/// Contents are cached per hash for the lifetime of the session, so replaying
/// many files that share history only walks each chain once.
#[derive(Debug)]
pub struct Reconstructor<'r> {
    objects: &'r Database<Delta>,
    cache: HashMap<ContentHash, String>,
}

impl<'r> Reconstructor<'r> {
    pub fn new(objects: &'r Database<Delta>) -> Self {
        Reconstructor {
            objects,
            cache: HashMap::new(),
        }
    }

    /// Text of `path` as recorded by `commit`
    ///
    /// No commit, or a path the commit does not track, means the file did not
    /// exist yet and yields the empty text.
    pub fn reconstruct_file(&mut self, commit: Option<&Commit>, path: &Path) -> Result<String> {
        let hash = match commit.and_then(|commit| commit.snapshot().leaf_hash(path)) {
            Some(hash) => hash.clone(),
            None => return Ok(String::new()),
        };

        self.content(&hash)
    }

    /// Text whose digest is `hash`
    pub fn content(&mut self, hash: &ContentHash) -> Result<String> {
        if let Some(text) = self.cache.get(hash) {
            return Ok(text.clone());
        }

        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut text = String::new();
        let mut cursor = Some(hash.clone());

        while let Some(current) = cursor.take() {
            if let Some(cached) = self.cache.get(&current) {
                text = cached.clone();
                break;
            }

            if !visited.insert(current.clone()) {
                return Err(SavitError::corrupt(
                    format!("edit script {}", current),
                    "base chain loops back on itself",
                ));
            }

            let delta = self.objects.get(&current)?;
            cursor = delta.base.clone();
            chain.push((current, delta));
        }

        tracing::debug!(%hash, depth = chain.len(), "replaying edit scripts");

        for (current, delta) in chain.into_iter().rev() {
            text = apply_diff(&text, &delta.script);

            let actual = ContentHash::digest(&text);
            if actual != current {
                tracing::warn!(
                    expected = %current,
                    %actual,
                    "reconstructed content differs from its recorded hash"
                );
            }

            self.cache.insert(current, text.clone());
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::diff::line_diff::diff_texts;
    use crate::artifacts::tree::snapshot::{Leaf, Snapshot};
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn objects_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    fn store(objects: &Database<Delta>, base: Option<&str>, derived: &str) -> ContentHash {
        let hash = ContentHash::digest(derived);
        let delta = Delta::new(
            base.map(ContentHash::digest),
            diff_texts(base.unwrap_or(""), derived),
        );
        objects.put(&hash, &delta).unwrap();
        hash
    }

    #[rstest]
    fn replays_a_chain_of_edits(objects_dir: TempDir) {
        let objects = Database::new(objects_dir.path().into());
        store(&objects, None, "one\ntwo");
        store(&objects, Some("one\ntwo"), "one\n2\nthree");
        let last = store(&objects, Some("one\n2\nthree"), "zero\none\n2\nthree");

        let mut reconstructor = Reconstructor::new(&objects);

        assert_eq!(reconstructor.content(&last).unwrap(), "zero\none\n2\nthree");
        assert_eq!(
            reconstructor
                .content(&ContentHash::digest("one\ntwo"))
                .unwrap(),
            "one\ntwo"
        );
    }

    #[rstest]
    fn untracked_paths_and_missing_commits_are_empty(objects_dir: TempDir) {
        let objects = Database::new(objects_dir.path().into());
        let hash = store(&objects, None, "hello");
        let snapshot = Snapshot::build(&[Leaf::new("a.txt", hash)], std::iter::empty());
        let commit = Commit::new(snapshot, "first".to_string(), None);

        let mut reconstructor = Reconstructor::new(&objects);

        assert_eq!(reconstructor.reconstruct_file(None, Path::new("a.txt")).unwrap(), "");
        assert_eq!(
            reconstructor
                .reconstruct_file(Some(&commit), Path::new("b.txt"))
                .unwrap(),
            ""
        );
        assert_eq!(
            reconstructor
                .reconstruct_file(Some(&commit), Path::new("a.txt"))
                .unwrap(),
            "hello"
        );
    }

    #[rstest]
    fn a_missing_object_is_not_found(objects_dir: TempDir) {
        let objects = Database::new(objects_dir.path().into());
        store(&objects, Some("gone"), "derived");

        let err = Reconstructor::new(&objects)
            .content(&ContentHash::digest("derived"))
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[rstest]
    fn a_looping_chain_is_corrupt(objects_dir: TempDir) {
        let objects = Database::new(objects_dir.path().into());
        let hash = ContentHash::digest("loop");
        objects
            .put(&hash, &Delta::new(Some(hash.clone()), diff_texts("", "loop")))
            .unwrap();

        let err = Reconstructor::new(&objects).content(&hash).unwrap_err();

        assert!(matches!(err, SavitError::CorruptData { .. }));
    }
}
