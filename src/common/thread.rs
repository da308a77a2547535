use super::{
    comment::Comment,
    newtypes::{ThreadId, UserId},
    require_not_empty,
};
use crate::backend::utils::error::BackendResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A discussion thread as returned to callers. `comments` stays unset on a
/// plain header fetch and is only populated by thread aggregation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: ThreadId,
    pub title: String,
    pub body: String,
    pub date: DateTime<Utc>,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

impl Thread {
    pub fn new(
        id: ThreadId,
        title: String,
        body: String,
        date: DateTime<Utc>,
        username: String,
    ) -> BackendResult<Self> {
        require_not_empty(&id.0, "id")?;
        require_not_empty(&title, "title")?;
        require_not_empty(&body, "body")?;
        require_not_empty(&username, "username")?;
        Ok(Thread {
            id,
            title,
            body,
            date,
            username,
            comments: None,
        })
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = Some(comments);
        self
    }
}

/// A validated thread submission, ready to be persisted.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewThread {
    pub title: String,
    pub body: String,
}

impl NewThread {
    pub fn new(params: CreateThreadParams) -> BackendResult<Self> {
        require_not_empty(&params.title, "title")?;
        require_not_empty(&params.body, "body")?;
        Ok(NewThread {
            title: params.title,
            body: params.body,
        })
    }
}

/// Echo of a successful thread insert.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddedThread {
    pub id: ThreadId,
    pub title: String,
    pub owner: UserId,
}

impl AddedThread {
    pub fn new(id: ThreadId, title: String, owner: UserId) -> BackendResult<Self> {
        require_not_empty(&id.0, "id")?;
        require_not_empty(&title, "title")?;
        require_not_empty(&owner.0, "owner")?;
        Ok(AddedThread { id, title, owner })
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CreateThreadParams {
    pub title: String,
    pub body: String,
}
