//! Line-level diff and patch
//!
//! - `edit_script`: the serialized description of a change between two texts
//! - `line_diff`: LCS-based script computation and replay
//!
//! Both operations are pure functions of their inputs.

pub mod edit_script;
pub mod line_diff;
