use crate::artifacts::objects::content_hash::ContentHash;
use crate::artifacts::objects::object::{Packable, Record, Unpackable};
use crate::errors::{IoContext, Result, SavitError};
use bytes::Bytes;
use fake::rand;
use std::io::{Cursor, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Sharded, append-only store of JSON records keyed by content hash
///
/// A record for hash `abcdef...` lives at `<path>/ab/cdef...`. Records are
/// never rewritten: storing a hash that is already present is a no-op, which
/// makes repeated or concurrent writes of the same record safe.
#[derive(Debug)]
pub struct Database<T> {
    path: Box<Path>,
    _record: PhantomData<T>,
}

impl<T: Record> Database<T> {
    pub fn new(path: Box<Path>) -> Self {
        Database {
            path,
            _record: PhantomData,
        }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.path.join(hash.to_path()).is_file()
    }

    /// Persist `record` under `hash`
    ///
    /// Returns `false` when the record already existed and nothing was written.
    pub fn put(&self, hash: &ContentHash, record: &T) -> Result<bool> {
        let object_path = self.path.join(hash.to_path());

        if object_path.exists() {
            tracing::debug!(kind = T::kind(), %hash, "record already stored");
            return Ok(false);
        }

        let content = record.pack()?;
        self.create_shard(&object_path)?;
        self.write_object(object_path, content)?;

        tracing::debug!(kind = T::kind(), %hash, "stored record");
        Ok(true)
    }

    pub fn get(&self, hash: &ContentHash) -> Result<T> {
        let object_path = self.path.join(hash.to_path());

        let content = match std::fs::read(&object_path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(SavitError::NotFound(format!("{} {}", T::kind(), hash)));
            }
            Err(err) => return Err(SavitError::io(object_path, err)),
        };

        T::unpack(Cursor::new(content)).map_err(|err| match err {
            SavitError::CorruptData { reason, .. } => {
                SavitError::corrupt(format!("{} {}", T::kind(), hash), reason)
            }
            other => other,
        })
    }

    fn create_shard(&self, object_path: &Path) -> Result<()> {
        let shard = object_path
            .parent()
            .ok_or_else(|| SavitError::NotFound(format!("shard of {}", object_path.display())))?;

        match std::fs::create_dir_all(shard) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
            Err(err) => Err(SavitError::io(shard, err)),
        }
    }

    fn write_object(&self, object_path: PathBuf, content: Bytes) -> Result<()> {
        let object_dir = object_path
            .parent()
            .ok_or_else(|| SavitError::NotFound(format!("shard of {}", object_path.display())))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .at_path(&temp_object_path)?;

        file.write_all(&content).at_path(&temp_object_path)?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).at_path(object_path)
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
