use crate::backend::{
    config::MynaConfig,
    database::{comment::DbCommentStore, like::DbLikeStore, thread::DbThreadStore},
    store::{CommentStore, LikeStore, ThreadStore},
    utils::error::BackendResult,
};
use std::sync::Arc;

pub mod config;
pub mod database;
pub mod memory;
pub mod store;
pub mod use_case;
pub mod utils;

/// The stores a running forum is wired to. Cheap to clone; use cases only
/// see the capability traits, so any conforming store can be plugged in.
#[derive(Clone)]
pub struct ForumContext {
    pub threads: Arc<dyn ThreadStore>,
    pub comments: Arc<dyn CommentStore>,
    pub likes: Arc<dyn LikeStore>,
}

/// Builds a context backed by the configured PostgreSQL database.
pub fn build_context(config: &MynaConfig) -> BackendResult<ForumContext> {
    let db_pool = database::connect(&config.database)?;
    Ok(ForumContext {
        threads: Arc::new(DbThreadStore::new(db_pool.clone())),
        comments: Arc::new(DbCommentStore::new(db_pool.clone())),
        likes: Arc::new(DbLikeStore::new(db_pool)),
    })
}
