//! Branches: validated names and head pointers

pub mod branch;
pub mod branch_name;

pub const DEFAULT_BRANCH: &str = "main";

pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|\.txt$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
