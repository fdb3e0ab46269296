use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::errors::Result;

impl Repository {
    /// `id: message` for every commit reachable from the head, newest first
    pub fn log(&self) -> Result<Vec<String>> {
        self.ensure_initialized()?;

        let head = self.refs().read_head()?;

        RevList::new(self, head)
            .into_iter()
            .map(|commit| commit.map(|commit| commit.log_entry()))
            .collect()
    }
}
