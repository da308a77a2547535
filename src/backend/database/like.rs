use super::{generate_id, schema::likes, DbPool};
use crate::{
    backend::{store::LikeStore, utils::error::BackendResult},
    common::newtypes::{CommentId, LikeId, UserId},
};
use diesel::{
    delete,
    dsl::{count_star, insert_into},
    ExpressionMethods,
    OptionalExtension,
    QueryDsl,
    RunQueryDsl,
};
use std::{
    collections::{HashMap, HashSet},
    ops::DerefMut,
};

pub struct DbLikeStore {
    pool: DbPool,
}

impl DbLikeStore {
    pub fn new(pool: DbPool) -> Self {
        DbLikeStore { pool }
    }
}

impl LikeStore for DbLikeStore {
    fn toggle_like(&self, user_id: &UserId, comment_id: &CommentId) -> BackendResult<bool> {
        let mut conn = self.pool.get()?;
        // Both arms are single statements guarded by the unique index over
        // ("userId", "commentId"); there is no separate read to race against.
        let inserted = insert_into(likes::table)
            .values((
                likes::id.eq(generate_id("like")),
                likes::user_id.eq(user_id.clone()),
                likes::comment_id.eq(comment_id.clone()),
            ))
            .on_conflict((likes::user_id, likes::comment_id))
            .do_nothing()
            .execute(conn.deref_mut())?;
        if inserted == 1 {
            return Ok(true);
        }
        delete(
            likes::table
                .filter(likes::user_id.eq(user_id.clone()))
                .filter(likes::comment_id.eq(comment_id.clone())),
        )
        .execute(conn.deref_mut())?;
        Ok(false)
    }

    fn is_liked(&self, user_id: &UserId, comment_id: &CommentId) -> BackendResult<bool> {
        let mut conn = self.pool.get()?;
        let row = likes::table
            .filter(likes::user_id.eq(user_id.clone()))
            .filter(likes::comment_id.eq(comment_id.clone()))
            .select(likes::id)
            .first::<LikeId>(conn.deref_mut())
            .optional()?;
        Ok(row.is_some())
    }

    fn count_likes_by_comment(
        &self,
        comment_ids: &HashSet<CommentId>,
    ) -> BackendResult<HashMap<CommentId, i64>> {
        if comment_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = self.pool.get()?;
        let counts = likes::table
            .filter(likes::comment_id.eq_any(comment_ids.iter().cloned().collect::<Vec<_>>()))
            .group_by(likes::comment_id)
            .select((likes::comment_id, count_star()))
            .load::<(CommentId, i64)>(conn.deref_mut())?;
        Ok(counts.into_iter().collect())
    }
}
