use super::{
    generate_id,
    schema::{threads, users},
    DbPool,
};
use crate::{
    backend::{
        store::ThreadStore,
        utils::error::{BackendResult, Error},
    },
    common::{
        newtypes::{ThreadId, UserId},
        thread::{AddedThread, NewThread, Thread},
    },
};
use chrono::{DateTime, Utc};
use diesel::{
    dsl::insert_into,
    ExpressionMethods,
    Insertable,
    OptionalExtension,
    QueryDsl,
    RunQueryDsl,
};
use std::ops::DerefMut;

#[derive(Insertable, Debug)]
#[diesel(table_name = threads, check_for_backend(diesel::pg::Pg))]
struct DbThreadInsertForm {
    id: ThreadId,
    title: String,
    body: String,
    owner: UserId,
    date: DateTime<Utc>,
}

pub struct DbThreadStore {
    pool: DbPool,
}

impl DbThreadStore {
    pub fn new(pool: DbPool) -> Self {
        DbThreadStore { pool }
    }
}

impl ThreadStore for DbThreadStore {
    fn add_thread(&self, new_thread: &NewThread, owner: &UserId) -> BackendResult<AddedThread> {
        let mut conn = self.pool.get()?;
        let form = DbThreadInsertForm {
            id: ThreadId(generate_id("thread")),
            title: new_thread.title.clone(),
            body: new_thread.body.clone(),
            owner: owner.clone(),
            date: Utc::now(),
        };
        let (id, title, owner) = insert_into(threads::table)
            .values(form)
            .returning((threads::id, threads::title, threads::owner))
            .get_result::<(ThreadId, String, UserId)>(conn.deref_mut())?;
        AddedThread::new(id, title, owner)
    }

    fn verify_thread_exists(&self, id: &ThreadId) -> BackendResult<()> {
        let mut conn = self.pool.get()?;
        threads::table
            .find(id.clone())
            .select(threads::id)
            .first::<ThreadId>(conn.deref_mut())
            .optional()?
            .map(|_| ())
            .ok_or(Error::NotFound("thread"))
    }

    fn get_thread_header(&self, id: &ThreadId) -> BackendResult<Thread> {
        let mut conn = self.pool.get()?;
        let (id, title, body, date, username) = threads::table
            .inner_join(users::table)
            .filter(threads::id.eq(id.clone()))
            .select((
                threads::id,
                threads::title,
                threads::body,
                threads::date,
                users::username,
            ))
            .first::<(ThreadId, String, String, DateTime<Utc>, String)>(conn.deref_mut())
            .optional()?
            .ok_or(Error::NotFound("thread"))?;
        Thread::new(id, title, body, date, username)
    }
}
