use crate::{
    backend::utils::error::BackendResult,
    common::{
        comment::{AddedComment, CommentRow, NewComment},
        newtypes::{CommentId, ThreadId, UserId},
        thread::{AddedThread, NewThread, Thread},
    },
};
use std::collections::{HashMap, HashSet};

/// Storage operations for threads. Implementations decide how rows are kept;
/// callers only rely on the behavior stated here.
pub trait ThreadStore: Send + Sync {
    fn add_thread(&self, new_thread: &NewThread, owner: &UserId) -> BackendResult<AddedThread>;

    /// Fails with `Error::NotFound("thread")` if the id is unknown.
    fn verify_thread_exists(&self, id: &ThreadId) -> BackendResult<()>;

    /// Returns the thread without its comments, enriched with the author's
    /// username. Fails with `Error::NotFound("thread")` if the id is unknown.
    fn get_thread_header(&self, id: &ThreadId) -> BackendResult<Thread>;
}

/// Storage operations for comments and replies.
pub trait CommentStore: Send + Sync {
    fn add_comment(&self, new_comment: &NewComment) -> BackendResult<AddedComment>;

    /// Fails with `Error::NotFound("comment")` if the id is unknown.
    fn verify_comment_exists(&self, id: &CommentId) -> BackendResult<()>;

    /// Fails with `Error::Forbidden("comment")` unless the comment is owned
    /// by `owner`.
    fn verify_comment_owner(&self, id: &CommentId, owner: &UserId) -> BackendResult<()>;

    /// All comments of a thread as one flat list, tombstoned rows included,
    /// ordered by creation time ascending with a deterministic tie-break.
    /// Each row carries the poster's username.
    fn list_comments_by_thread(&self, thread_id: &ThreadId) -> BackendResult<Vec<CommentRow>>;

    /// Flips the tombstone flag. The row is retained so existing reply
    /// threads stay intact; repeating the call is a no-op.
    fn delete_comment(&self, id: &CommentId) -> BackendResult<()>;
}

/// Storage operations for comment likes.
pub trait LikeStore: Send + Sync {
    /// Atomically inserts the like if absent or removes it if present,
    /// guarded by the uniqueness of `(user, comment)`. Returns whether the
    /// like exists afterwards. There is deliberately no separate read
    /// followed by a conditional write: concurrent toggles for the same
    /// pair must never produce duplicate rows.
    fn toggle_like(&self, user_id: &UserId, comment_id: &CommentId) -> BackendResult<bool>;

    fn is_liked(&self, user_id: &UserId, comment_id: &CommentId) -> BackendResult<bool>;

    /// Like counts for the given comments. Ids without likes are absent
    /// from the result, never zero-filled.
    fn count_likes_by_comment(
        &self,
        comment_ids: &HashSet<CommentId>,
    ) -> BackendResult<HashMap<CommentId, i64>>;
}
