use super::{
    generate_id,
    schema::{comments, users},
    DbPool,
};
use crate::{
    backend::{
        store::CommentStore,
        utils::error::{BackendResult, Error},
    },
    common::{
        comment::{AddedComment, CommentRow, NewComment},
        newtypes::{CommentId, ThreadId, UserId},
    },
};
use chrono::{DateTime, Utc};
use diesel::{
    dsl::insert_into,
    update,
    ExpressionMethods,
    Insertable,
    OptionalExtension,
    QueryDsl,
    RunQueryDsl,
};
use std::ops::DerefMut;

#[derive(Insertable, Debug)]
#[diesel(table_name = comments, check_for_backend(diesel::pg::Pg))]
struct DbCommentInsertForm {
    id: CommentId,
    content: String,
    owner: UserId,
    thread_id: ThreadId,
    parent_id: Option<CommentId>,
    date: DateTime<Utc>,
    is_delete: bool,
}

pub struct DbCommentStore {
    pool: DbPool,
}

impl DbCommentStore {
    pub fn new(pool: DbPool) -> Self {
        DbCommentStore { pool }
    }
}

impl CommentStore for DbCommentStore {
    fn add_comment(&self, new_comment: &NewComment) -> BackendResult<AddedComment> {
        let mut conn = self.pool.get()?;
        let form = DbCommentInsertForm {
            id: CommentId(generate_id("comment")),
            content: new_comment.content.clone(),
            owner: new_comment.owner.clone(),
            thread_id: new_comment.thread_id.clone(),
            parent_id: new_comment.parent_id.clone(),
            date: Utc::now(),
            is_delete: false,
        };
        let (id, content, owner) = insert_into(comments::table)
            .values(form)
            .returning((comments::id, comments::content, comments::owner))
            .get_result::<(CommentId, String, UserId)>(conn.deref_mut())?;
        AddedComment::new(id, content, owner)
    }

    fn verify_comment_exists(&self, id: &CommentId) -> BackendResult<()> {
        let mut conn = self.pool.get()?;
        comments::table
            .find(id.clone())
            .select(comments::id)
            .first::<CommentId>(conn.deref_mut())
            .optional()?
            .map(|_| ())
            .ok_or(Error::NotFound("comment"))
    }

    fn verify_comment_owner(&self, id: &CommentId, owner: &UserId) -> BackendResult<()> {
        let mut conn = self.pool.get()?;
        comments::table
            .filter(comments::id.eq(id.clone()))
            .filter(comments::owner.eq(owner.clone()))
            .select(comments::id)
            .first::<CommentId>(conn.deref_mut())
            .optional()?
            .map(|_| ())
            .ok_or(Error::Forbidden("comment"))
    }

    fn list_comments_by_thread(&self, thread_id: &ThreadId) -> BackendResult<Vec<CommentRow>> {
        let mut conn = self.pool.get()?;
        let rows = comments::table
            .inner_join(users::table)
            .filter(comments::thread_id.eq(thread_id.clone()))
            .order((comments::date.asc(), comments::id.asc()))
            .select((
                comments::id,
                comments::content,
                comments::date,
                users::username,
                comments::parent_id,
                comments::is_delete,
            ))
            .load::<(
                CommentId,
                String,
                DateTime<Utc>,
                String,
                Option<CommentId>,
                bool,
            )>(conn.deref_mut())?;

        Ok(rows
            .into_iter()
            .map(
                |(id, content, date, username, parent_id, is_delete)| CommentRow {
                    id,
                    content,
                    date,
                    username,
                    parent_id,
                    is_delete,
                },
            )
            .collect())
    }

    fn delete_comment(&self, id: &CommentId) -> BackendResult<()> {
        let mut conn = self.pool.get()?;
        update(comments::table.find(id.clone()))
            .set(comments::is_delete.eq(true))
            .execute(conn.deref_mut())?;
        Ok(())
    }
}
