use crate::{
    backend::{
        store::{CommentStore, LikeStore, ThreadStore},
        utils::error::{BackendResult, Error},
        ForumContext,
    },
    common::{
        comment::{AddedComment, CommentRow, NewComment},
        newtypes::{CommentId, ThreadId, UserId},
        thread::{AddedThread, NewThread, Thread},
    },
};
use chrono::{DateTime, Utc};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<UserId, String>,
    threads: Vec<ThreadRecord>,
    comments: Vec<CommentRecord>,
    likes: Vec<LikeRecord>,
    id_counter: u64,
}

impl MemoryState {
    fn generate_id(&mut self, prefix: &str) -> String {
        self.id_counter += 1;
        format!("{prefix}-{}", self.id_counter)
    }

    fn username(&self, owner: &UserId) -> String {
        self.users.get(owner).cloned().unwrap_or_default()
    }
}

#[derive(Debug)]
struct ThreadRecord {
    id: ThreadId,
    title: String,
    body: String,
    owner: UserId,
    date: DateTime<Utc>,
}

#[derive(Debug)]
struct CommentRecord {
    id: CommentId,
    content: String,
    owner: UserId,
    thread_id: ThreadId,
    parent_id: Option<CommentId>,
    date: DateTime<Utc>,
    is_delete: bool,
}

impl CommentRecord {
    fn to_row(&self, username: String) -> CommentRow {
        CommentRow {
            id: self.id.clone(),
            content: self.content.clone(),
            date: self.date,
            username,
            parent_id: self.parent_id.clone(),
            is_delete: self.is_delete,
        }
    }
}

#[derive(Debug)]
struct LikeRecord {
    user_id: UserId,
    comment_id: CommentId,
}

/// Keeps the whole forum in process memory behind a single mutex and
/// implements all three store contracts. Ids are small counters
/// (`thread-1`, `comment-2`) so tests stay readable.
#[derive(Clone, Default)]
pub struct MemoryForum {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryForum {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context serving every store capability from this instance.
    pub fn context(&self) -> ForumContext {
        ForumContext {
            threads: Arc::new(self.clone()),
            comments: Arc::new(self.clone()),
            likes: Arc::new(self.clone()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().expect("forum state lock poisoned")
    }

    /// Registers a user for display-name lookups. Account management itself
    /// lives outside this crate.
    pub fn add_user(&self, username: &str) -> UserId {
        let mut state = self.lock();
        let id = UserId(state.generate_id("user"));
        state.users.insert(id.clone(), username.to_string());
        id
    }

    /// Inserts a comment row with an explicit creation time, for callers
    /// that need control over ordering.
    pub fn seed_comment(
        &self,
        thread_id: &ThreadId,
        owner: &UserId,
        content: &str,
        parent_id: Option<&CommentId>,
        date: DateTime<Utc>,
    ) -> CommentId {
        let mut state = self.lock();
        let id = CommentId(state.generate_id("comment"));
        state.comments.push(CommentRecord {
            id: id.clone(),
            content: content.to_string(),
            owner: owner.clone(),
            thread_id: thread_id.clone(),
            parent_id: parent_id.cloned(),
            date,
            is_delete: false,
        });
        id
    }

    /// Number of stored like rows for the pair, duplicates included.
    pub fn like_rows(&self, user_id: &UserId, comment_id: &CommentId) -> usize {
        self.lock()
            .likes
            .iter()
            .filter(|like| &like.user_id == user_id && &like.comment_id == comment_id)
            .count()
    }
}

impl ThreadStore for MemoryForum {
    fn add_thread(&self, new_thread: &NewThread, owner: &UserId) -> BackendResult<AddedThread> {
        let mut state = self.lock();
        let id = ThreadId(state.generate_id("thread"));
        state.threads.push(ThreadRecord {
            id: id.clone(),
            title: new_thread.title.clone(),
            body: new_thread.body.clone(),
            owner: owner.clone(),
            date: Utc::now(),
        });
        AddedThread::new(id, new_thread.title.clone(), owner.clone())
    }

    fn verify_thread_exists(&self, id: &ThreadId) -> BackendResult<()> {
        if self.lock().threads.iter().any(|thread| &thread.id == id) {
            Ok(())
        } else {
            Err(Error::NotFound("thread"))
        }
    }

    fn get_thread_header(&self, id: &ThreadId) -> BackendResult<Thread> {
        let state = self.lock();
        let record = state
            .threads
            .iter()
            .find(|thread| &thread.id == id)
            .ok_or(Error::NotFound("thread"))?;
        Thread::new(
            record.id.clone(),
            record.title.clone(),
            record.body.clone(),
            record.date,
            state.username(&record.owner),
        )
    }
}

impl CommentStore for MemoryForum {
    fn add_comment(&self, new_comment: &NewComment) -> BackendResult<AddedComment> {
        let mut state = self.lock();
        let id = CommentId(state.generate_id("comment"));
        state.comments.push(CommentRecord {
            id: id.clone(),
            content: new_comment.content.clone(),
            owner: new_comment.owner.clone(),
            thread_id: new_comment.thread_id.clone(),
            parent_id: new_comment.parent_id.clone(),
            date: Utc::now(),
            is_delete: false,
        });
        AddedComment::new(id, new_comment.content.clone(), new_comment.owner.clone())
    }

    fn verify_comment_exists(&self, id: &CommentId) -> BackendResult<()> {
        if self.lock().comments.iter().any(|comment| &comment.id == id) {
            Ok(())
        } else {
            Err(Error::NotFound("comment"))
        }
    }

    fn verify_comment_owner(&self, id: &CommentId, owner: &UserId) -> BackendResult<()> {
        if self
            .lock()
            .comments
            .iter()
            .any(|comment| &comment.id == id && &comment.owner == owner)
        {
            Ok(())
        } else {
            Err(Error::Forbidden("comment"))
        }
    }

    fn list_comments_by_thread(&self, thread_id: &ThreadId) -> BackendResult<Vec<CommentRow>> {
        let state = self.lock();
        let mut rows: Vec<CommentRow> = state
            .comments
            .iter()
            .filter(|comment| &comment.thread_id == thread_id)
            .map(|comment| comment.to_row(state.username(&comment.owner)))
            .collect();
        // Stable sort; rows with equal timestamps keep insertion order.
        rows.sort_by_key(|row| row.date);
        Ok(rows)
    }

    fn delete_comment(&self, id: &CommentId) -> BackendResult<()> {
        let mut state = self.lock();
        for comment in &mut state.comments {
            if &comment.id == id {
                comment.is_delete = true;
            }
        }
        Ok(())
    }
}

impl LikeStore for MemoryForum {
    fn toggle_like(&self, user_id: &UserId, comment_id: &CommentId) -> BackendResult<bool> {
        // Check and flip under one lock; no other toggle can interleave.
        let mut state = self.lock();
        let existing = state
            .likes
            .iter()
            .position(|like| &like.user_id == user_id && &like.comment_id == comment_id);
        match existing {
            Some(index) => {
                state.likes.remove(index);
                Ok(false)
            }
            None => {
                state.likes.push(LikeRecord {
                    user_id: user_id.clone(),
                    comment_id: comment_id.clone(),
                });
                Ok(true)
            }
        }
    }

    fn is_liked(&self, user_id: &UserId, comment_id: &CommentId) -> BackendResult<bool> {
        Ok(self
            .lock()
            .likes
            .iter()
            .any(|like| &like.user_id == user_id && &like.comment_id == comment_id))
    }

    fn count_likes_by_comment(
        &self,
        comment_ids: &HashSet<CommentId>,
    ) -> BackendResult<HashMap<CommentId, i64>> {
        let state = self.lock();
        let mut counts = HashMap::new();
        for like in &state.likes {
            if comment_ids.contains(&like.comment_id) {
                *counts.entry(like.comment_id.clone()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}
