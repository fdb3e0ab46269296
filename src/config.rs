//! Environment-driven settings
//!
//! - `SAVIT_LOG`: log filter directives, `warn` when unset
//! - `SAVIT_DEFAULT_BRANCH`: branch created by `init`, `main` when unset

use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::Result;

pub const LOG_FILTER_VAR: &str = "SAVIT_LOG";
pub const DEFAULT_BRANCH_VAR: &str = "SAVIT_DEFAULT_BRANCH";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    default_branch: BranchName,
    log_filter: String,
}

impl Config {
    pub fn new(default_branch: BranchName, log_filter: String) -> Self {
        Config {
            default_branch,
            log_filter,
        }
    }

    pub fn load_from_env() -> Result<Self> {
        let default_branch = std::env::var(DEFAULT_BRANCH_VAR)
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());
        let log_filter = std::env::var(LOG_FILTER_VAR)
            .ok()
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Config::new(
            BranchName::try_parse(default_branch.trim().to_string())?,
            log_filter,
        ))
    }

    pub fn default_branch(&self) -> &BranchName {
        &self.default_branch
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_branch: BranchName::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
