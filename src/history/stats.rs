use super::types::{DiffRow, EditOp};
use similar::{ChangeTag, TextDiff};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStats {
    pub added_count: usize,
    pub removed_count: usize,
}

fn join_tokens(ops: &[EditOp]) -> String {
    ops.iter()
        .map(|op| op.token.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Calculate character-level statistics from diff rows
pub fn calculate_stats(rows: &[DiffRow]) -> DiffStats {
    let mut stats = DiffStats::default();

    for row in rows {
        match row {
            DiffRow::Pair(left, right) => {
                let left_str = join_tokens(left);
                let right_str = join_tokens(right);

                let diff = TextDiff::from_chars(&left_str, &right_str);
                for change in diff.iter_all_changes() {
                    match change.tag() {
                        ChangeTag::Insert => stats.added_count += change.value().chars().count(),
                        ChangeTag::Delete => stats.removed_count += change.value().chars().count(),
                        ChangeTag::Equal => {}
                    }
                }
            }
            DiffRow::Unchanged(_) => {}
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::diff::{diff_lines, group_into_rows};

    fn stats_for(old: &str, new: &str) -> DiffStats {
        calculate_stats(&group_into_rows(&diff_lines(old, new)))
    }

    #[test]
    fn stats_counting_english() {
        // paired row "hello cat" -> "hello dog": 3 chars removed, 3 added
        let stats = stats_for("title\nhello cat", "title\nhello dog");
        assert_eq!(stats.added_count, 3);
        assert_eq!(stats.removed_count, 3);
    }

    #[test]
    fn stats_counting_chinese() {
        let stats = stats_for("我爱你", "我不爱你");
        assert_eq!(stats.added_count, 1);
        assert_eq!(stats.removed_count, 0);
    }

    #[test]
    fn unchanged_text_has_no_stats() {
        assert_eq!(stats_for("same\ntext", "same\ntext"), DiffStats::default());
    }

    #[test]
    fn pure_insertions_count_every_char() {
        let stats = stats_for("", "abc");
        // "" -> "abc": the empty line is replaced by "abc"
        assert_eq!(stats.added_count, 3);
        assert_eq!(stats.removed_count, 0);
    }
}
