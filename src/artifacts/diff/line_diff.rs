use crate::artifacts::diff::edit_script::{EditScript, LineEdit};
use derive_new::new;

/// Split a text into lines on `\n`, keeping any carriage returns
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

/// Compute the edit script turning `base` into `derived`
pub fn compute_diff<T: AsRef<str>>(base: &[T], derived: &[T]) -> EditScript {
    LcsDiff::new(base, derived).diff()
}

/// Convenience over [`compute_diff`] for whole texts
pub fn diff_texts(base: &str, derived: &str) -> EditScript {
    compute_diff(&split_lines(base), &split_lines(derived))
}

/// Replay an edit script on top of `base`
///
/// The order is fixed: replacements, then insertions, then deletions.
pub fn apply_diff(base: &str, script: &EditScript) -> String {
    // each working line remembers the base index it came from, if any
    let mut lines = split_lines(base)
        .into_iter()
        .enumerate()
        .map(|(index, line)| (Some(index), line))
        .collect::<Vec<_>>();

    for edit in &script.replaced_lines {
        while lines.len() <= edit.line_index {
            lines.push((None, String::new()));
        }
        lines[edit.line_index].1 = edit.value.clone();
    }

    for edit in &script.inserted_lines {
        let at = edit.line_index.min(lines.len());
        lines.insert(at, (None, edit.value.clone()));
    }

    for edit in &script.deleted_lines {
        let position = lines
            .iter()
            .position(|(origin, line)| *origin == Some(edit.line_index) && *line == edit.value)
            .or_else(|| lines.iter().position(|(_, line)| *line == edit.value));

        if let Some(position) = position {
            lines.remove(position);
        }
    }

    lines
        .into_iter()
        .map(|(_, line)| line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    Keep { base: usize, derived: usize },
    Replace { base: usize, derived: usize },
    Delete { base: usize },
    Insert { derived: usize },
}

/// Longest-common-subsequence line diff
#[derive(Debug, Clone, new)]
pub struct LcsDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<T: AsRef<str>> LcsDiff<'_, T> {
    fn line_eq(left: &T, right: &T) -> bool {
        let left = left.as_ref();
        let right = right.as_ref();
        left.strip_suffix('\r').unwrap_or(left) == right.strip_suffix('\r').unwrap_or(right)
    }

    /// `table[i][j]` is the LCS length of `a[..i]` and `b[..j]`
    fn score_table(&self) -> Vec<Vec<usize>> {
        let (n, m) = (self.a.len(), self.b.len());
        let mut table = vec![vec![0; m + 1]; n + 1];

        for i in 1..=n {
            for j in 1..=m {
                table[i][j] = if Self::line_eq(&self.a[i - 1], &self.b[j - 1]) {
                    table[i - 1][j - 1] + 1
                } else {
                    table[i][j - 1].max(table[i - 1][j])
                };
            }
        }

        table
    }

    /// Walk the table back from the bottom-right corner
    ///
    /// Returns the alignment in ascending order.
    fn backtrack(&self) -> Vec<Alignment> {
        let table = self.score_table();
        let (mut i, mut j) = (self.a.len(), self.b.len());
        let mut path = Vec::new();

        while i > 0 && j > 0 {
            if Self::line_eq(&self.a[i - 1], &self.b[j - 1]) {
                path.push(Alignment::Keep {
                    base: i - 1,
                    derived: j - 1,
                });
                i -= 1;
                j -= 1;
            } else if table[i][j - 1] > table[i - 1][j] {
                path.push(Alignment::Insert { derived: j - 1 });
                j -= 1;
            } else if table[i - 1][j] > table[i][j - 1] {
                path.push(Alignment::Delete { base: i - 1 });
                i -= 1;
            } else {
                path.push(Alignment::Replace {
                    base: i - 1,
                    derived: j - 1,
                });
                i -= 1;
                j -= 1;
            }
        }

        while i > 0 {
            path.push(Alignment::Delete { base: i - 1 });
            i -= 1;
        }

        while j > 0 {
            path.push(Alignment::Insert { derived: j - 1 });
            j -= 1;
        }

        path.reverse();
        path
    }

    pub fn diff(&self) -> EditScript {
        let mut script = EditScript::default();

        // position of each step in the working sequence once every insertion
        // has been spliced in and before any deletion happens
        for (position, step) in self.backtrack().into_iter().enumerate() {
            match step {
                // matched lines that only differ in their line ending
                Alignment::Keep { base, derived } => {
                    if self.a[base].as_ref() != self.b[derived].as_ref() {
                        script
                            .replaced_lines
                            .push(LineEdit::new(base, self.line(self.b, derived)));
                    }
                }
                Alignment::Replace { base, derived } => script
                    .replaced_lines
                    .push(LineEdit::new(base, self.line(self.b, derived))),
                Alignment::Delete { base } => script
                    .deleted_lines
                    .push(LineEdit::new(base, self.line(self.a, base))),
                Alignment::Insert { derived } => script
                    .inserted_lines
                    .push(LineEdit::new(position, self.line(self.b, derived))),
            }
        }

        script
    }

    fn line(&self, lines: &[T], index: usize) -> String {
        lines[index].as_ref().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn identical_texts_produce_an_empty_script() {
        let script = diff_texts("a\nb\nc", "a\nb\nc");

        assert!(script.is_empty());
    }

    #[test]
    fn first_version_of_a_file_replaces_the_empty_line() {
        let script = diff_texts("", "File Content 0");

        assert_eq!(
            script.replaced_lines,
            vec![LineEdit::new(0, "File Content 0".to_string())]
        );
        assert!(script.inserted_lines.is_empty());
        assert!(script.deleted_lines.is_empty());
        assert_eq!(apply_diff("", &script), "File Content 0");
    }

    #[test]
    fn appended_line_is_reported_as_an_insertion() {
        let script = diff_texts("a\nb", "a\nb\nc");

        assert_eq!(script.inserted_lines, vec![LineEdit::new(2, "c".to_string())]);
        assert!(script.deleted_lines.is_empty());
        assert!(script.replaced_lines.is_empty());
    }

    #[test]
    fn removed_line_is_reported_as_a_deletion() {
        let script = diff_texts("a\nb\nc", "a\nc");

        assert_eq!(script.deleted_lines, vec![LineEdit::new(1, "b".to_string())]);
        assert!(script.inserted_lines.is_empty());
    }

    #[test]
    fn carriage_returns_align_lines_but_survive_apply() {
        let script = diff_texts("a\r\nb\r\n", "a\nb\n");

        assert!(script.inserted_lines.is_empty());
        assert!(script.deleted_lines.is_empty());
        assert_eq!(
            script.replaced_lines,
            vec![LineEdit::new(0, "a".to_string()), LineEdit::new(1, "b".to_string())]
        );
        assert_eq!(apply_diff("a\r\nb\r\n", &script), "a\nb\n");
    }

    #[test]
    fn crlf_text_is_rebuilt_byte_for_byte() {
        let base = vec!["x"];
        let derived = vec!["a\r", "b\r", ""];

        let script = compute_diff(&base, &derived);

        assert_eq!(apply_diff("x", &script), "a\r\nb\r\n");
    }

    #[rstest]
    #[case("a\nb", "b\nc")]
    #[case("x\ny\nx", "y\nx")]
    #[case("x\ny\nx", "x\ny")]
    #[case("a\na\na", "a")]
    #[case("", "one\ntwo\nthree")]
    #[case("one\r\ntwo\r\n", "one\r\n2\r\ntwo\r\n")]
    #[case("one\ntwo", "one\r\ntwo\r")]
    #[case("one\ntwo\nthree", "")]
    #[case("fn main() {\n    todo!()\n}\n", "fn main() {\n    println!(\"hi\");\n    todo!()\n}\n")]
    fn apply_reproduces_the_derived_text(#[case] base: &str, #[case] derived: &str) {
        let script = diff_texts(base, derived);

        assert_eq!(apply_diff(base, &script), derived);
    }

    #[test]
    fn deletions_fall_back_to_value_matching() {
        let script = EditScript {
            inserted_lines: vec![],
            deleted_lines: vec![LineEdit::new(7, "b".to_string())],
            replaced_lines: vec![],
        };

        assert_eq!(apply_diff("a\nb\nc", &script), "a\nc");
    }

    proptest! {
        #[test]
        fn round_trip_holds_for_arbitrary_line_sequences(
            base in prop::collection::vec("[abc]{0,2}\r?", 1..10),
            derived in prop::collection::vec("[abc]{0,2}\r?", 1..10),
        ) {
            let script = compute_diff(&base, &derived);

            prop_assert_eq!(apply_diff(&base.join("\n"), &script), derived.join("\n"));
        }

        #[test]
        fn diff_of_a_text_with_itself_is_empty(
            lines in prop::collection::vec("[a-z ]{0,6}", 1..10),
        ) {
            prop_assert!(compute_diff(&lines, &lines).is_empty());
        }
    }
}
