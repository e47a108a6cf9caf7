use super::types::{DiffRow, EditKind, EditOp};

/// Split text into line tokens. Empty lines are kept, so `""` is one empty line.
pub fn line_tokens(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Split text into word tokens on runs of whitespace
pub fn word_tokens(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Compute a minimal edit script between two token sequences.
///
/// The script is an LCS alignment walked forward from the start of both
/// sequences; when deleting and inserting keep an equally long common
/// subsequence, the old token is deleted first.
pub fn diff_tokens(old: &[&str], new: &[&str]) -> Vec<EditOp> {
    if old.is_empty() && new.is_empty() {
        return vec![EditOp::equal("")];
    }

    let m = old.len();
    let n = new.len();

    // lcs[i][j] = length of the LCS of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; n + 1]; m + 1];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut ops = Vec::with_capacity(m + n);
    let mut i = 0usize;
    let mut j = 0usize;

    while i < m && j < n {
        if old[i] == new[j] {
            ops.push(EditOp::equal(old[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            ops.push(EditOp::delete(old[i]));
            i += 1;
        } else {
            ops.push(EditOp::insert(new[j]));
            j += 1;
        }
    }

    ops.extend(old[i..].iter().map(|token| EditOp::delete(*token)));
    ops.extend(new[j..].iter().map(|token| EditOp::insert(*token)));

    ops
}

/// Compute line-based diff between old and new text
pub fn diff_lines(old: &str, new: &str) -> Vec<EditOp> {
    diff_tokens(&line_tokens(old), &line_tokens(new))
}

/// Compute word-based diff between old and new text
pub fn diff_words(old: &str, new: &str) -> Vec<EditOp> {
    diff_tokens(&word_tokens(old), &word_tokens(new))
}

/// Group a line edit script into rows where unchanged lines are single rows,
/// and contiguous deleted/inserted blocks become paired rows.
pub fn group_into_rows(ops: &[EditOp]) -> Vec<DiffRow> {
    let mut rows = Vec::new();
    let mut i = 0usize;

    while i < ops.len() {
        match ops[i].kind {
            EditKind::Equal => {
                rows.push(DiffRow::Unchanged(ops[i].token.clone()));
                i += 1;
            }
            EditKind::Delete => {
                // collect deleted block
                let mut removed_block = Vec::new();
                while i < ops.len() && ops[i].kind == EditKind::Delete {
                    removed_block.push(ops[i].clone());
                    i += 1;
                }

                // collect following inserted block (if any)
                let mut added_block = Vec::new();
                while i < ops.len() && ops[i].kind == EditKind::Insert {
                    added_block.push(ops[i].clone());
                    i += 1;
                }

                rows.push(DiffRow::Pair(removed_block, added_block));
            }
            EditKind::Insert => {
                // inserted without preceding deletion -> right-only
                rows.push(DiffRow::Pair(Vec::new(), vec![ops[i].clone()]));
                i += 1;
            }
        }
    }

    rows
}

/// Check if an edit script contains meaningful changes (non-blank inserted or deleted tokens)
pub fn has_meaningful_changes(ops: &[EditOp]) -> bool {
    ops.iter()
        .any(|op| !op.is_equal() && !op.token.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(ops: &[EditOp], keep: EditKind) -> Vec<String> {
        ops.iter()
            .filter(|op| op.kind == EditKind::Equal || op.kind == keep)
            .map(|op| op.token.clone())
            .collect()
    }

    fn swap(ops: &[EditOp]) -> Vec<EditOp> {
        ops.iter()
            .map(|op| match op.kind {
                EditKind::Equal => op.clone(),
                EditKind::Insert => EditOp::delete(op.token.clone()),
                EditKind::Delete => EditOp::insert(op.token.clone()),
            })
            .collect()
    }

    fn changes(ops: &[EditOp]) -> usize {
        ops.iter().filter(|op| !op.is_equal()).count()
    }

    #[test]
    fn line_diff_example() {
        let ops = diff_lines("a\nb\nc", "a\nc\nd");
        assert_eq!(
            ops,
            vec![
                EditOp::equal("a"),
                EditOp::delete("b"),
                EditOp::equal("c"),
                EditOp::insert("d"),
            ]
        );
    }

    #[test]
    fn empty_inputs_yield_single_empty_equal() {
        assert_eq!(diff_lines("", ""), vec![EditOp::equal("")]);
        assert_eq!(diff_tokens(&[], &[]), vec![EditOp::equal("")]);
    }

    #[test]
    fn one_side_empty_is_pure_insert_or_delete() {
        let ops = diff_words("", "hello big world");
        assert_eq!(ops.len(), 3);
        assert!(ops.iter().all(|op| op.kind == EditKind::Insert));

        let ops = diff_words("hello world", "   ");
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().all(|op| op.kind == EditKind::Delete));
    }

    #[test]
    fn tie_prefers_delete() {
        // "x" -> "y": deleting or inserting first both keep an empty LCS
        let ops = diff_words("x", "y");
        assert_eq!(ops, vec![EditOp::delete("x"), EditOp::insert("y")]);

        let ops = diff_words("a b", "b a");
        assert_eq!(
            ops,
            vec![EditOp::delete("a"), EditOp::equal("b"), EditOp::insert("a")]
        );
    }

    #[test]
    fn identical_inputs_are_all_equal() {
        let text = "one\n\ntwo\nthree\n";
        let ops = diff_lines(text, text);
        assert_eq!(ops.len(), line_tokens(text).len());
        assert!(ops.iter().all(EditOp::is_equal));
    }

    #[test]
    fn lines_keep_empty_lines_and_strip_carriage_returns() {
        assert_eq!(line_tokens("a\r\n\r\nb\n"), vec!["a", "", "b", ""]);
        let ops = diff_lines("a\r\nb", "a\nb");
        assert!(ops.iter().all(EditOp::is_equal));
    }

    #[test]
    fn comparison_is_exact() {
        let ops = diff_words("Hello", "hello");
        assert_eq!(changes(&ops), 2);
    }

    #[test]
    fn replay_reconstructs_both_sides() {
        let cases = [
            ("the quick brown fox", "the slow brown dog jumps"),
            ("a b c d e", "e d c b a"),
            ("same same same", "same"),
            ("", "fresh words"),
            ("x y z", "x y z"),
        ];

        for (old, new) in cases {
            let ops = diff_words(old, new);
            assert_eq!(replay(&ops, EditKind::Delete), word_tokens(old), "{old:?}");
            assert_eq!(replay(&ops, EditKind::Insert), word_tokens(new), "{new:?}");
        }
    }

    #[test]
    fn swapped_inputs_give_same_edit_count() {
        let old = "alpha\nbeta\ngamma\ndelta";
        let new = "beta\nalpha\ngamma\nepsilon\ndelta";

        let forward = diff_lines(old, new);
        let backward = diff_lines(new, old);
        assert_eq!(changes(&forward), changes(&backward));

        let swapped = swap(&backward);
        assert_eq!(replay(&swapped, EditKind::Delete), line_tokens(old));
        assert_eq!(replay(&swapped, EditKind::Insert), line_tokens(new));
    }

    #[test]
    fn edit_script_is_minimal() {
        // LCS of these is "a c e" (3), so 2 deletes and 2 inserts
        let ops = diff_words("a b c d e", "a x c y e");
        assert_eq!(changes(&ops), 4);
    }

    #[test]
    fn grouping_unchanged_lines() {
        let ops = diff_lines("a\nb", "a\nb");
        let rows = group_into_rows(&ops);
        assert_eq!(rows.len(), 2);
        match &rows[0] {
            DiffRow::Unchanged(s) => assert_eq!(s, "a"),
            _ => panic!(),
        }
        match &rows[1] {
            DiffRow::Unchanged(s) => assert_eq!(s, "b"),
            _ => panic!(),
        }
    }

    #[test]
    fn grouping_removed_added_pair() {
        let ops = diff_lines("a\nold\nc", "a\nnew\nc");
        let rows = group_into_rows(&ops);
        // rows: a (unchanged), pair(old,new), c (unchanged)
        assert_eq!(rows.len(), 3);
        match &rows[1] {
            DiffRow::Pair(l, r) => {
                assert_eq!(l.len(), 1);
                assert_eq!(r.len(), 1);
            }
            _ => panic!(),
        }
    }

    #[test]
    fn whitespace_only_changes_are_not_meaningful() {
        let ops = diff_lines("a\n\nb", "a\nb");
        assert!(!has_meaningful_changes(&ops));
        let ops = diff_lines("a", "a\nb");
        assert!(has_meaningful_changes(&ops));
    }
}
