use crate::errors::{IoContext, Result, SavitError};
use std::path::Path;

/// Name of the control directory inside the working directory
pub const CONTROL_DIR: &str = ".savit";

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).exists()
    }

    pub fn is_dir(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_dir()
    }

    pub fn read_file(&self, file_path: &Path) -> Result<String> {
        let file_path = self.path.join(file_path);

        std::fs::read_to_string(&file_path).at_path(file_path)
    }

    /// Write a file, creating its parent directories as needed
    pub fn write_file(&self, file_path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = file_path.parent() {
            self.make_directory(parent)?;
        }

        let file_path = self.path.join(file_path);
        std::fs::write(&file_path, content).at_path(file_path)
    }

    /// Remove a file and any parent directories it leaves empty
    pub fn remove_file(&self, file_path: &Path) -> Result<()> {
        let absolute = self.path.join(file_path);

        match std::fs::remove_file(&absolute) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(SavitError::io(absolute, err)),
        }

        self.prune_empty_parent_dirs(file_path)
    }

    pub fn make_directory(&self, dir_path: &Path) -> Result<()> {
        let dir_path = self.path.join(dir_path);

        match std::fs::create_dir_all(&dir_path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
            Err(err) => Err(SavitError::io(dir_path, err)),
        }
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            let absolute = self.path.join(parent);
            let is_empty = std::fs::read_dir(&absolute)
                .at_path(&absolute)?
                .next()
                .is_none();

            if is_empty {
                std::fs::remove_dir(&absolute).at_path(&absolute)?;
                self.prune_empty_parent_dirs(parent)?;
            }
        }

        Ok(())
    }
}
