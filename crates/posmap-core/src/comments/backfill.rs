//! Backward fill of blank comments.

use tracing::debug;

use super::CommentField;

/// Fill blank comments from the nearest following non-blank comment.
///
/// Rows are scanned from last to first while carrying the most recent
/// non-blank comment. Blank rows after the last non-blank one stay blank.
/// Row order is preserved; the input is left untouched.
pub fn backfill<T: CommentField + Clone>(rows: &[T]) -> Vec<T> {
    let mut filled = rows.to_vec();
    backfill_in_place(&mut filled);
    filled
}

/// In-place variant of [`backfill`]. Mutates the comments of `rows`.
pub fn backfill_in_place<T: CommentField>(rows: &mut [T]) {
    let mut carry: Option<String> = None;
    let mut filled = 0usize;

    for row in rows.iter_mut().rev() {
        match row.comment() {
            Some(comment) => carry = Some(comment.to_string()),
            None => {
                if let Some(value) = &carry {
                    row.set_comment(value.clone());
                    filled += 1;
                }
            }
        }
    }

    debug!("Backfilled {} of {} comments", filled, rows.len());
}
