//! Product mapping comments: backfill and entry key extraction.

mod backfill;
mod keys;

pub use backfill::{backfill, backfill_in_place};
pub use keys::{extract_keys, filter_commented};

use crate::models::records::ProductMapRow;

/// A row carrying a free-text comment that may be blank.
pub trait CommentField {
    /// The comment, or `None` when it is blank.
    fn comment(&self) -> Option<&str>;

    /// Replace the comment.
    fn set_comment(&mut self, comment: String);
}

impl CommentField for ProductMapRow {
    fn comment(&self) -> Option<&str> {
        self.comments.as_deref().filter(|c| !c.is_empty())
    }

    fn set_comment(&mut self, comment: String) {
        self.comments = Some(comment);
    }
}
