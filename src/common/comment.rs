use super::{
    newtypes::{CommentId, ThreadId, UserId},
    require_not_empty,
};
use crate::backend::utils::error::BackendResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown in place of a deleted top-level comment.
pub const DELETED_COMMENT_PLACEHOLDER: &str = "**komentar telah dihapus**";
/// Placeholder shown in place of a deleted reply.
pub const DELETED_REPLY_PLACEHOLDER: &str = "**balasan telah dihapus**";

/// A comment as returned to callers. `parent_id` is present exactly when the
/// comment is a reply; replies never carry `replies` or `like_count` of
/// their own.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub username: String,
    pub date: DateTime<Utc>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<Comment>>,
    #[serde(rename = "commentId", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
}

impl Comment {
    /// Builds the visible comment from a stored row. Tombstoned rows keep
    /// their identity but have their content replaced by the fixed
    /// placeholder, chosen by whether the row is a reply. The substitution
    /// is keyed on the tombstone flag alone, so rebuilding an already
    /// tombstoned row yields the same output.
    pub fn from_row(row: CommentRow) -> BackendResult<Self> {
        require_not_empty(&row.id.0, "id")?;
        require_not_empty(&row.content, "content")?;
        require_not_empty(&row.username, "username")?;

        let content = if row.is_delete {
            match row.parent_id {
                None => DELETED_COMMENT_PLACEHOLDER.to_string(),
                Some(_) => DELETED_REPLY_PLACEHOLDER.to_string(),
            }
        } else {
            row.content
        };

        Ok(Comment {
            id: row.id,
            username: row.username,
            date: row.date,
            content,
            like_count: None,
            replies: None,
            parent_id: row.parent_id,
        })
    }
}

/// Flat storage shape of a single comment, as produced by
/// `CommentStore::list_comments_by_thread`. Tombstoned rows are included,
/// with the tombstone exposed as a flag rather than substituted content.
#[derive(Clone, Debug, PartialEq)]
pub struct CommentRow {
    pub id: CommentId,
    pub content: String,
    pub date: DateTime<Utc>,
    pub username: String,
    pub parent_id: Option<CommentId>,
    pub is_delete: bool,
}

/// A validated comment submission, ready to be persisted. A present
/// `parent_id` makes it a reply.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewComment {
    pub content: String,
    pub thread_id: ThreadId,
    pub parent_id: Option<CommentId>,
    pub owner: UserId,
}

impl NewComment {
    pub fn new(
        params: CreateCommentParams,
        thread_id: ThreadId,
        parent_id: Option<CommentId>,
        owner: UserId,
    ) -> BackendResult<Self> {
        require_not_empty(&params.content, "content")?;
        require_not_empty(&thread_id.0, "threadId")?;
        Ok(NewComment {
            content: params.content,
            thread_id,
            parent_id,
            owner,
        })
    }
}

/// Echo of a successful comment insert.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddedComment {
    pub id: CommentId,
    pub content: String,
    pub owner: UserId,
}

impl AddedComment {
    pub fn new(id: CommentId, content: String, owner: UserId) -> BackendResult<Self> {
        require_not_empty(&id.0, "id")?;
        require_not_empty(&content, "content")?;
        require_not_empty(&owner.0, "owner")?;
        Ok(AddedComment { id, content, owner })
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CreateCommentParams {
    pub content: String,
}
