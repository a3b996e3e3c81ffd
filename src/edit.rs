//! Batched text insertions and diff rendering
//!
//! Every insertion in a plan is positioned against the same original text.
//! Applying them from the bottom of the document upward means no insertion
//! ever shifts the offset of one that is still pending.

use crate::position::{LineIndex, Position};
use std::path::Path;

/// Text to insert at a position of the original document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub position: Position,
    pub text: String,
}

/// An ordered set of non-overlapping insertions applied as one edit
#[derive(Debug, Clone, Default)]
pub struct EditPlan {
    insertions: Vec<Insertion>,
}

impl EditPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, position: Position, text: impl Into<String>) {
        self.insertions.push(Insertion {
            position,
            text: text.into(),
        });
    }

    pub fn insertions(&self) -> &[Insertion] {
        &self.insertions
    }

    pub fn len(&self) -> usize {
        self.insertions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insertions.is_empty()
    }

    /// Apply every insertion to `text`, highest offset first
    pub fn apply_to(&self, text: &str) -> String {
        let index = LineIndex::new(text);
        let mut edits: Vec<(usize, &str)> = self
            .insertions
            .iter()
            .map(|ins| (index.offset_at(ins.position), ins.text.as_str()))
            .collect();
        edits.sort_by(|a, b| b.0.cmp(&a.0));

        let mut result = String::with_capacity(text.len() + edits.iter().map(|e| e.1.len()).sum::<usize>());
        result.push_str(text);
        for (offset, insert) in edits {
            if result.is_char_boundary(offset) {
                result.insert_str(offset, insert);
            } else {
                log::warn!("Skipping insertion inside a character at offset {}", offset);
            }
        }
        result
    }
}

/// Unified diff of two versions of `file`
///
/// Lines only present in `modified` are reported as additions with one line
/// of leading context; lines that differ in place are reported as a
/// removal/addition pair.
pub fn unified_diff(file: &Path, original: &str, modified: &str) -> String {
    let old: Vec<&str> = original.lines().collect();
    let new: Vec<&str> = modified.lines().collect();

    let mut diff = String::new();
    if old == new {
        return diff;
    }
    diff.push_str(&format!("--- a/{}\n", file.display()));
    diff.push_str(&format!("+++ b/{}\n", file.display()));

    let (mut i, mut j) = (0, 0);
    while i < old.len() || j < new.len() {
        if i < old.len() && j < new.len() && old[i] == new[j] {
            i += 1;
            j += 1;
            continue;
        }

        let resync = match old.get(i) {
            Some(line) => new[j..].iter().position(|l| l == line).map(|p| j + p),
            None => Some(new.len()),
        };

        match resync {
            Some(k) if k > j => {
                let added = &new[j..k];
                if i > 0 {
                    diff.push_str(&format!("@@ -{},1 +{},{} @@\n", i, j, added.len() + 1));
                    diff.push_str(&format!(" {}\n", old[i - 1]));
                } else {
                    diff.push_str(&format!("@@ -0,0 +1,{} @@\n", added.len()));
                }
                for line in added {
                    diff.push_str(&format!("+{}\n", line));
                }
                j = k;
            }
            _ => {
                let replaced = new.get(j);
                diff.push_str(&format!(
                    "@@ -{},1 +{},{} @@\n",
                    i + 1,
                    j + 1,
                    usize::from(replaced.is_some())
                ));
                diff.push_str(&format!("-{}\n", old[i]));
                if let Some(line) = replaced {
                    diff.push_str(&format!("+{}\n", line));
                    j += 1;
                }
                i += 1;
            }
        }
    }

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_plan_is_identity() {
        let plan = EditPlan::new();
        assert!(plan.is_empty());
        assert_eq!(plan.apply_to("int x;\n"), "int x;\n");
    }

    #[test]
    fn test_insertions_apply_bottom_up() {
        let text = "a\nb\nc\n";
        let mut plan = EditPlan::new();
        plan.insert(Position::new(0, 0), "/* a */\n");
        plan.insert(Position::new(2, 0), "/* c */\n");
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.apply_to(text), "/* a */\na\nb\n/* c */\nc\n");
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let text = "one\ntwo\nthree\n";
        let mut forward = EditPlan::new();
        forward.insert(Position::new(1, 0), "X\n");
        forward.insert(Position::new(2, 0), "Y\n");
        let mut backward = EditPlan::new();
        backward.insert(Position::new(2, 0), "Y\n");
        backward.insert(Position::new(1, 0), "X\n");
        assert_eq!(forward.apply_to(text), backward.apply_to(text));
    }

    #[test]
    fn test_insertion_past_end_appends() {
        let mut plan = EditPlan::new();
        plan.insert(Position::new(10, 0), "tail\n");
        assert_eq!(plan.apply_to("x\n"), "x\ntail\n");
    }

    #[test]
    fn test_diff_of_insertion() {
        let original = "int a;\nint b;\n";
        let modified = "int a;\n/* b */\nint b;\n";
        let diff = unified_diff(Path::new("x.c"), original, modified);
        assert_eq!(
            diff,
            "--- a/x.c\n+++ b/x.c\n@@ -1,1 +1,2 @@\n int a;\n+/* b */\n"
        );
    }

    #[test]
    fn test_diff_of_prepend() {
        let diff = unified_diff(Path::new("x.c"), "int a;\n", "/* h */\n\nint a;\n");
        assert!(diff.contains("@@ -0,0 +1,2 @@\n+/* h */\n+\n"));
    }

    #[test]
    fn test_diff_of_replacement() {
        let diff = unified_diff(Path::new("test.c"), "line1\nline2\nline3\n", "line1\nmodified\nline3\n");
        assert!(diff.contains("--- a/test.c"));
        assert!(diff.contains("+++ b/test.c"));
        assert!(diff.contains("-line2"));
        assert!(diff.contains("+modified"));
    }

    #[test]
    fn test_diff_identical_is_empty() {
        assert!(unified_diff(Path::new("x.c"), "a\n", "a\n").is_empty());
    }
}
