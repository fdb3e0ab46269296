use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{CONTROL_DIR, Workspace};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::reconstruction::Reconstructor;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::content_hash::ContentHash;
use crate::artifacts::objects::delta::Delta;
use crate::artifacts::tree::snapshot::Snapshot;
use crate::config::Config;
use crate::errors::{IoContext, Result, SavitError};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct Repository {
    path: Box<Path>,
    config: Config,
    index: Arc<Mutex<Index>>,
    objects: Database<Delta>,
    commits: Database<Commit>,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Open the repository rooted at `path`
    ///
    /// Nothing is created on disk until `init`, which also creates a missing
    /// root directory.
    pub fn new(path: &Path, config: Config) -> Result<Self> {
        let path = if path.exists() {
            path.canonicalize().at_path(path)?
        } else {
            std::path::absolute(path).at_path(path)?
        };
        let control = path.join(CONTROL_DIR);

        let index = Index::new(
            control.join("index.txt").into_boxed_path(),
            path.clone().into_boxed_path(),
        );
        let objects = Database::new(control.join("objects").into_boxed_path());
        let commits = Database::new(control.join("commits").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(control.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            config,
            index: Arc::new(Mutex::new(index)),
            objects,
            commits,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn control_path(&self) -> Box<Path> {
        self.path.join(CONTROL_DIR).into_boxed_path()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn objects(&self) -> &Database<Delta> {
        &self.objects
    }

    pub fn commits(&self) -> &Database<Commit> {
        &self.commits
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let control = self.control_path();

        if control.is_dir() {
            Ok(())
        } else {
            Err(SavitError::NotInitialized(control.to_path_buf()))
        }
    }

    pub fn current_branch(&self) -> Result<BranchName> {
        self.refs.current_branch(self.config.default_branch())
    }

    pub fn head_commit(&self) -> Result<Option<Commit>> {
        self.refs
            .read_head()?
            .map(|id| self.load_commit(&id))
            .transpose()
    }

    /// Snapshot of the head commit; empty before the first commit
    pub fn head_snapshot(&self) -> Result<Snapshot> {
        Ok(self
            .head_commit()?
            .map(|commit| commit.snapshot().clone())
            .unwrap_or_default())
    }

    /// Read a commit and check that its snapshot still hashes to its id
    pub fn load_commit(&self, id: &ContentHash) -> Result<Commit> {
        let commit = self.commits.get(id)?;
        commit.snapshot().verify()?;

        if commit.id() != id || commit.snapshot().root_hash() != id {
            return Err(SavitError::corrupt(
                format!("commit {}", id),
                "stored id does not match its snapshot",
            ));
        }

        Ok(commit)
    }

    /// Text of `path` at `commit`; empty if the commit is absent or does not
    /// track the path
    pub fn reconstruct_file(&self, commit: Option<&Commit>, path: &Path) -> Result<String> {
        Reconstructor::new(&self.objects).reconstruct_file(commit, path)
    }
}
