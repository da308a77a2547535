use crate::backend::{config::MynaConfigDatabase, utils::error::BackendResult};
use diesel::{
    r2d2::{ConnectionManager, Pool},
    PgConnection,
};
use uuid::Uuid;

pub mod comment;
pub mod like;
pub(crate) mod schema;
pub mod thread;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

pub fn connect(config: &MynaConfigDatabase) -> BackendResult<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(&config.connection_url);
    Ok(Pool::builder().max_size(config.pool_size).build(manager)?)
}

/// Row ids carry their table's name as prefix, matching the persisted format.
pub(crate) fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}
