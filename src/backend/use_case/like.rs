use crate::{
    backend::{
        store::{CommentStore, LikeStore, ThreadStore},
        utils::error::BackendResult,
        ForumContext,
    },
    common::newtypes::{CommentId, ThreadId, UserId},
};

/// Likes the comment if the user has not liked it yet, otherwise removes
/// the like. The existence checks are reads; the toggle itself is a single
/// atomic store operation, so concurrent calls for the same pair cannot
/// double-insert.
pub fn toggle_comment_like(
    thread_id: &ThreadId,
    comment_id: &CommentId,
    user_id: &UserId,
    context: &ForumContext,
) -> BackendResult<()> {
    context.threads.verify_thread_exists(thread_id)?;
    context.comments.verify_comment_exists(comment_id)?;
    context.likes.toggle_like(user_id, comment_id)?;
    Ok(())
}
