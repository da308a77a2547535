use crate::{
    backend::{
        store::{CommentStore, ThreadStore},
        utils::error::BackendResult,
        ForumContext,
    },
    common::{
        comment::{AddedComment, CreateCommentParams, NewComment},
        newtypes::{CommentId, ThreadId, UserId},
        require_not_empty,
    },
};

pub fn add_comment(
    params: CreateCommentParams,
    thread_id: &ThreadId,
    owner: &UserId,
    context: &ForumContext,
) -> BackendResult<AddedComment> {
    let new_comment = NewComment::new(params, thread_id.clone(), None, owner.clone())?;
    context.threads.verify_thread_exists(&new_comment.thread_id)?;
    context.comments.add_comment(&new_comment)
}

pub fn add_reply(
    params: CreateCommentParams,
    thread_id: &ThreadId,
    parent_id: &CommentId,
    owner: &UserId,
    context: &ForumContext,
) -> BackendResult<AddedComment> {
    let new_reply = NewComment::new(
        params,
        thread_id.clone(),
        Some(parent_id.clone()),
        owner.clone(),
    )?;
    context.threads.verify_thread_exists(&new_reply.thread_id)?;
    context.comments.verify_comment_exists(parent_id)?;
    context.comments.add_comment(&new_reply)
}

/// Tombstones a comment after checking it exists and belongs to the
/// requester. The checks are reads; the single mutating call comes last, so
/// a failed check leaves nothing behind.
pub fn delete_comment(
    id: &CommentId,
    requester: &UserId,
    context: &ForumContext,
) -> BackendResult<()> {
    require_not_empty(&id.0, "id")?;
    context.comments.verify_comment_exists(id)?;
    context.comments.verify_comment_owner(id, requester)?;
    context.comments.delete_comment(id)
}

/// Replies are rows of the same table; the checklist is identical.
pub fn delete_reply(
    id: &CommentId,
    requester: &UserId,
    context: &ForumContext,
) -> BackendResult<()> {
    delete_comment(id, requester, context)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        backend::{
            memory::MemoryForum,
            use_case::thread::{add_thread, get_thread},
            utils::error::Error,
        },
        common::{
            comment::DELETED_COMMENT_PLACEHOLDER,
            newtypes::ThreadId,
            thread::CreateThreadParams,
        },
    };
    use pretty_assertions::assert_eq;

    fn thread_params() -> CreateThreadParams {
        CreateThreadParams {
            title: "a title".to_string(),
            body: "a body".to_string(),
        }
    }

    fn comment_params(content: &str) -> CreateCommentParams {
        CreateCommentParams {
            content: content.to_string(),
        }
    }

    #[test]
    fn test_add_comment_requires_existing_thread() {
        let forum = MemoryForum::new();
        let context = forum.context();
        let user = forum.add_user("johndoe");

        let result = add_comment(
            comment_params("a comment"),
            &ThreadId("thread-404".to_string()),
            &user,
            &context,
        );
        assert!(matches!(result, Err(Error::NotFound("thread"))));
    }

    #[test]
    fn test_add_comment_validates_before_store_checks() {
        let forum = MemoryForum::new();
        let context = forum.context();
        let user = forum.add_user("johndoe");

        // Payload validation fires first, even though the thread is also
        // missing.
        let result = add_comment(
            comment_params(""),
            &ThreadId("thread-404".to_string()),
            &user,
            &context,
        );
        assert!(matches!(result, Err(Error::MissingProperty("content"))));
    }

    #[test]
    fn test_add_reply_requires_existing_parent() -> BackendResult<()> {
        let forum = MemoryForum::new();
        let context = forum.context();
        let user = forum.add_user("johndoe");
        let added = add_thread(thread_params(), &user, &context)?;

        let result = add_reply(
            comment_params("a reply"),
            &added.id,
            &CommentId("comment-404".to_string()),
            &user,
            &context,
        );
        assert!(matches!(result, Err(Error::NotFound("comment"))));

        // The failed check aborted before the write; nothing was stored.
        let thread = get_thread(&added.id, &context)?;
        assert_eq!(thread.comments, Some(vec![]));
        Ok(())
    }

    #[test]
    fn test_add_reply_marks_parent() -> BackendResult<()> {
        let forum = MemoryForum::new();
        let context = forum.context();
        let user = forum.add_user("johndoe");
        let added = add_thread(thread_params(), &user, &context)?;
        let top = add_comment(comment_params("a comment"), &added.id, &user, &context)?;

        let reply = add_reply(comment_params("a reply"), &added.id, &top.id, &user, &context)?;
        assert_eq!(reply.content, "a reply");
        assert_eq!(reply.owner, user);
        Ok(())
    }

    #[test]
    fn test_delete_comment_checks_existence_then_ownership() -> BackendResult<()> {
        let forum = MemoryForum::new();
        let context = forum.context();
        let author = forum.add_user("johndoe");
        let intruder = forum.add_user("janedoe");
        let added = add_thread(thread_params(), &author, &context)?;
        let top = add_comment(comment_params("a comment"), &added.id, &author, &context)?;

        let unknown = delete_comment(&CommentId("comment-404".to_string()), &author, &context);
        assert!(matches!(unknown, Err(Error::NotFound("comment"))));

        let not_owner = delete_comment(&top.id, &intruder, &context);
        assert!(matches!(not_owner, Err(Error::Forbidden("comment"))));

        // A failed ownership check must not tombstone the row.
        let thread = get_thread(&added.id, &context)?;
        let comments = thread.comments.expect("comments populated");
        assert_eq!(comments[0].content, "a comment");
        Ok(())
    }

    #[test]
    fn test_delete_comment_is_idempotent() -> BackendResult<()> {
        let forum = MemoryForum::new();
        let context = forum.context();
        let user = forum.add_user("johndoe");
        let added = add_thread(thread_params(), &user, &context)?;
        let top = add_comment(comment_params("a comment"), &added.id, &user, &context)?;

        delete_comment(&top.id, &user, &context)?;
        // Deleting again still succeeds; the row exists and the flag is
        // simply re-applied.
        delete_comment(&top.id, &user, &context)?;

        let thread = get_thread(&added.id, &context)?;
        let comments = thread.comments.expect("comments populated");
        assert_eq!(comments[0].content, DELETED_COMMENT_PLACEHOLDER);
        Ok(())
    }

    #[test]
    fn test_delete_requires_id() {
        let forum = MemoryForum::new();
        let context = forum.context();
        let user = forum.add_user("johndoe");

        let result = delete_comment(&CommentId(String::new()), &user, &context);
        assert!(matches!(result, Err(Error::MissingProperty("id"))));
    }
}
