use crate::errors::{Result, SavitError};
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::BufRead;

pub trait Packable {
    fn pack(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn unpack(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

/// A record persisted in one of the sharded stores
///
/// Records are JSON documents; the kind only names them in logs and errors.
pub trait Record: Serialize + DeserializeOwned {
    fn kind() -> &'static str;
}

impl<T: Record> Packable for T {
    fn pack(&self) -> Result<Bytes> {
        serde_json::to_vec(self)
            .map(Bytes::from)
            .map_err(|e| SavitError::corrupt(T::kind(), e))
    }
}

impl<T: Record> Unpackable for T {
    fn unpack(reader: impl BufRead) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| SavitError::corrupt(T::kind(), e))
    }
}
