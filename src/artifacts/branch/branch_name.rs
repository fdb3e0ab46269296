use crate::artifacts::branch::{DEFAULT_BRANCH, INVALID_BRANCH_NAME_REGEX};
use crate::errors::{Result, SavitError};
use std::path::PathBuf;

/// Name of a branch, checked against the ref naming rules
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> Result<Self> {
        if name.is_empty() {
            return Err(SavitError::InvalidBranchName(
                "branch name cannot be empty".to_string(),
            ));
        }

        let re = regex::Regex::new(INVALID_BRANCH_NAME_REGEX)
            .map_err(|err| SavitError::corrupt("branch name pattern", err))?;

        if re.is_match(&name) {
            Err(SavitError::InvalidBranchName(name))
        } else {
            Ok(Self(name))
        }
    }

    /// Location of the ref file, relative to `refs/heads`
    pub fn ref_file(&self) -> PathBuf {
        PathBuf::from(format!("{}.txt", self.0))
    }
}

impl Default for BranchName {
    fn default() -> Self {
        Self(DEFAULT_BRANCH.to_string())
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::proptest;

    proptest! {
        #[test]
        fn plain_names_are_valid(branch_name in "[a-zA-Z0-9_-]+") {
            assert!(BranchName::try_parse(branch_name).is_ok());
        }

        #[test]
        fn hierarchical_names_are_valid(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!("{}/{}", prefix, suffix);
            assert!(BranchName::try_parse(branch_name).is_ok());
        }

        #[test]
        fn names_starting_with_a_dot_are_invalid(suffix in "[a-zA-Z0-9_-]+") {
            let branch_name = format!(".{}", suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn names_with_consecutive_dots_are_invalid(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+"
        ) {
            let branch_name = format!("{}..{}", prefix, suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }

        #[test]
        fn names_with_special_chars_are_invalid(
            prefix in "[a-zA-Z0-9_-]+",
            suffix in "[a-zA-Z0-9_-]+",
            special_char in r"[\*:\?\[\\^~ ]"
        ) {
            let branch_name = format!("{}{}{}", prefix, special_char, suffix);
            assert!(BranchName::try_parse(branch_name).is_err());
        }
    }

    #[test]
    fn empty_name_is_invalid() {
        assert!(matches!(
            BranchName::try_parse("".to_string()),
            Err(SavitError::InvalidBranchName(_))
        ));
    }

    #[test]
    fn slashes_at_the_edges_are_invalid() {
        assert!(BranchName::try_parse("/feature".to_string()).is_err());
        assert!(BranchName::try_parse("feature/".to_string()).is_err());
    }

    #[test]
    fn names_clashing_with_ref_files_are_invalid() {
        assert!(BranchName::try_parse("main.lock".to_string()).is_err());
        assert!(BranchName::try_parse("main.txt".to_string()).is_err());
    }

    #[test]
    fn ref_file_keeps_the_hierarchy() {
        let name = BranchName::try_parse("feature/login".to_string()).unwrap();

        assert_eq!(name.ref_file(), PathBuf::from("feature/login.txt"));
    }
}
