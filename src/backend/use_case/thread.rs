use crate::{
    backend::{
        store::{CommentStore, LikeStore, ThreadStore},
        utils::error::BackendResult,
        ForumContext,
    },
    common::{
        comment::{Comment, CommentRow},
        newtypes::{CommentId, ThreadId, UserId},
        require_not_empty,
        thread::{AddedThread, CreateThreadParams, NewThread, Thread},
    },
};
use log::warn;
use std::collections::{HashMap, HashSet};

pub fn add_thread(
    params: CreateThreadParams,
    owner: &UserId,
    context: &ForumContext,
) -> BackendResult<AddedThread> {
    let new_thread = NewThread::new(params)?;
    context.threads.add_thread(&new_thread, owner)
}

/// Rebuilds a thread's two-level comment tree from the flat rows the stores
/// hold: header fetch, one pass to split rows into top-level comments and a
/// parent to replies map, one batched like-count read for the top-level ids,
/// then in-order hydration. The three reads are independent and see the
/// store's natural read consistency, nothing stronger.
pub fn get_thread(id: &ThreadId, context: &ForumContext) -> BackendResult<Thread> {
    require_not_empty(&id.0, "id")?;
    let thread = context.threads.get_thread_header(id)?;
    let rows = context.comments.list_comments_by_thread(id)?;

    let mut top_level = Vec::new();
    let mut replies_by_parent: HashMap<CommentId, Vec<CommentRow>> = HashMap::new();
    for row in rows {
        match row.parent_id.clone() {
            Some(parent_id) => replies_by_parent.entry(parent_id).or_default().push(row),
            None => top_level.push(row),
        }
    }

    let top_level_ids: HashSet<CommentId> = top_level.iter().map(|row| row.id.clone()).collect();
    let like_counts = context.likes.count_likes_by_comment(&top_level_ids)?;

    let mut comments = Vec::with_capacity(top_level.len());
    for row in top_level {
        let comment_id = row.id.clone();
        let replies = replies_by_parent
            .remove(&comment_id)
            .unwrap_or_default()
            .into_iter()
            .map(Comment::from_row)
            .collect::<BackendResult<Vec<_>>>()?;
        let mut comment = Comment::from_row(row)?;
        // Comments nobody liked have no entry in the count map and keep
        // their count unset rather than zero.
        comment.like_count = like_counts.get(&comment_id).copied();
        comment.replies = Some(replies);
        comments.push(comment);
    }

    // A reply whose parent is not a top-level comment of this thread is
    // inconsistent data; drop it rather than fail the whole read.
    if !replies_by_parent.is_empty() {
        let orphaned = replies_by_parent
            .values()
            .flatten()
            .map(|row| row.id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        warn!("thread {id}: dropping replies with missing parents: {orphaned}");
    }

    Ok(thread.with_comments(comments))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        backend::{
            memory::MemoryForum,
            use_case::{comment, like},
            utils::error::Error,
        },
        common::comment::{
            CreateCommentParams,
            DELETED_COMMENT_PLACEHOLDER,
            DELETED_REPLY_PLACEHOLDER,
        },
    };
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;

    fn date(value: &str) -> DateTime<Utc> {
        value.parse().expect("parse date")
    }

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
    fn test_add_thread_validates_payload() {
        let forum = MemoryForum::new();
        let context = forum.context();
        let user = forum.add_user("johndoe");

        let result = add_thread(
            CreateThreadParams {
                title: String::new(),
                body: "a body".to_string(),
            },
            &user,
            &context,
        );
        assert!(matches!(result, Err(Error::MissingProperty("title"))));
    }

    #[test]
    fn test_get_thread_requires_id() {
        let context = MemoryForum::new().context();
        let result = get_thread(&ThreadId(String::new()), &context);
        assert!(matches!(result, Err(Error::MissingProperty("id"))));
    }

    #[test]
    fn test_get_thread_unknown_id() {
        let context = MemoryForum::new().context();
        let result = get_thread(&ThreadId("thread-404".to_string()), &context);
        assert!(matches!(result, Err(Error::NotFound("thread"))));
    }

    #[test]
    fn test_get_thread_without_comments() -> BackendResult<()> {
        let forum = MemoryForum::new();
        let context = forum.context();
        let user = forum.add_user("johndoe");
        let added = add_thread(thread_params(), &user, &context)?;

        let thread = get_thread(&added.id, &context)?;
        assert_eq!(thread.id, added.id);
        assert_eq!(thread.title, "a title");
        assert_eq!(thread.username, "johndoe");
        assert_eq!(thread.comments, Some(vec![]));
        Ok(())
    }

    #[test]
    fn test_get_thread_hydrates_comments_and_replies() -> BackendResult<()> {
        let forum = MemoryForum::new();
        let context = forum.context();
        let user = forum.add_user("johndoe");
        let added = add_thread(thread_params(), &user, &context)?;
        let top = comment::add_comment(comment_params("a comment"), &added.id, &user, &context)?;
        let reply =
            comment::add_reply(comment_params("a reply"), &added.id, &top.id, &user, &context)?;
        like::toggle_comment_like(&added.id, &top.id, &user, &context)?;

        let thread = get_thread(&added.id, &context)?;
        let comments = thread.comments.expect("comments populated");
        assert_eq!(comments.len(), 1);

        let hydrated = &comments[0];
        assert_eq!(hydrated.id, top.id);
        assert_eq!(hydrated.content, "a comment");
        assert_eq!(hydrated.like_count, Some(1));
        assert_eq!(hydrated.parent_id, None);

        let replies = hydrated.replies.as_ref().expect("replies populated");
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].id, reply.id);
        assert_eq!(replies[0].parent_id, Some(top.id.clone()));
        // Replies stay leaves: no nested replies, no like count.
        assert_eq!(replies[0].replies, None);
        assert_eq!(replies[0].like_count, None);
        Ok(())
    }

    #[test]
    fn test_get_thread_substitutes_deleted_content() -> BackendResult<()> {
        let forum = MemoryForum::new();
        let context = forum.context();
        let user = forum.add_user("johndoe");
        let added = add_thread(thread_params(), &user, &context)?;
        let top = comment::add_comment(comment_params("a comment"), &added.id, &user, &context)?;
        let reply =
            comment::add_reply(comment_params("a reply"), &added.id, &top.id, &user, &context)?;
        comment::delete_comment(&top.id, &user, &context)?;
        comment::delete_reply(&reply.id, &user, &context)?;

        let thread = get_thread(&added.id, &context)?;
        let comments = thread.comments.expect("comments populated");
        assert_eq!(comments[0].content, DELETED_COMMENT_PLACEHOLDER);
        // Identity and position survive the tombstone.
        assert_eq!(comments[0].id, top.id);
        assert_eq!(comments[0].username, "johndoe");

        let replies = comments[0].replies.as_ref().expect("replies populated");
        assert_eq!(replies[0].content, DELETED_REPLY_PLACEHOLDER);
        Ok(())
    }

    #[test]
    fn test_get_thread_orders_by_date_then_insertion() -> BackendResult<()> {
        let forum = MemoryForum::new();
        let context = forum.context();
        let user = forum.add_user("johndoe");
        let added = add_thread(thread_params(), &user, &context)?;

        // Inserted out of creation order on purpose.
        let late = forum.seed_comment(
            &added.id,
            &user,
            "posted later",
            None,
            date("2023-01-19T17:00:00Z"),
        );
        let early = forum.seed_comment(
            &added.id,
            &user,
            "posted earlier",
            None,
            date("2023-01-17T17:00:00Z"),
        );
        // Same timestamp as `late`; insertion order breaks the tie.
        let tied = forum.seed_comment(
            &added.id,
            &user,
            "posted at the same time",
            None,
            date("2023-01-19T17:00:00Z"),
        );

        let thread = get_thread(&added.id, &context)?;
        let ids: Vec<CommentId> = thread
            .comments
            .expect("comments populated")
            .into_iter()
            .map(|comment| comment.id)
            .collect();
        assert_eq!(ids, vec![early, late, tied]);
        Ok(())
    }

    #[test]
    fn test_get_thread_partitions_every_row_exactly_once() -> BackendResult<()> {
        let forum = MemoryForum::new();
        let context = forum.context();
        let user = forum.add_user("johndoe");
        let added = add_thread(thread_params(), &user, &context)?;

        let first = comment::add_comment(comment_params("first"), &added.id, &user, &context)?;
        let second = comment::add_comment(comment_params("second"), &added.id, &user, &context)?;
        comment::add_reply(comment_params("reply 1"), &added.id, &first.id, &user, &context)?;
        comment::add_reply(comment_params("reply 2"), &added.id, &first.id, &user, &context)?;
        comment::add_reply(comment_params("reply 3"), &added.id, &second.id, &user, &context)?;

        let thread = get_thread(&added.id, &context)?;
        let comments = thread.comments.expect("comments populated");
        assert_eq!(comments.len(), 2);

        let reply_counts: Vec<usize> = comments
            .iter()
            .map(|comment| comment.replies.as_ref().expect("replies populated").len())
            .collect();
        assert_eq!(reply_counts, vec![2, 1]);

        // Depth never exceeds two.
        for comment in &comments {
            for reply in comment.replies.as_ref().expect("replies populated") {
                assert_eq!(reply.replies, None);
            }
        }
        Ok(())
    }

    #[test]
    fn test_get_thread_drops_orphaned_replies() -> BackendResult<()> {
        let forum = MemoryForum::new();
        let context = forum.context();
        let user = forum.add_user("johndoe");
        let added = add_thread(thread_params(), &user, &context)?;
        let top = comment::add_comment(comment_params("a comment"), &added.id, &user, &context)?;
        let missing_parent = CommentId("comment-404".to_string());
        forum.seed_comment(
            &added.id,
            &user,
            "orphaned reply",
            Some(&missing_parent),
            date("2023-01-19T17:00:00Z"),
        );

        let thread = get_thread(&added.id, &context)?;
        let comments = thread.comments.expect("comments populated");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, top.id);
        assert!(comments[0]
            .replies
            .as_ref()
            .expect("replies populated")
            .is_empty());
        Ok(())
    }
}
