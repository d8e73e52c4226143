use crate::domain::{
    errors::DomainError,
    like::{
        mark::LikeMark,
        store::{CounterDelta, LikeStore, LikeTransaction, MarkInsert},
        target::{LikeTarget, TargetKind},
    },
};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info, instrument};

use super::infrastructure_error;

/// Table layout behind one target kind.
#[derive(Debug, Clone, Copy)]
struct LikeTables {
    targets: &'static str,
    marks: &'static str,
    target_fk: &'static str,
}

const POST_TABLES: LikeTables = LikeTables {
    targets: "posts",
    marks: "post_likes",
    target_fk: "post_id",
};

const COMMENT_TABLES: LikeTables = LikeTables {
    targets: "comments",
    marks: "comment_likes",
    target_fk: "comment_id",
};

fn tables(kind: TargetKind) -> LikeTables {
    match kind {
        TargetKind::Post => POST_TABLES,
        TargetKind::Comment => COMMENT_TABLES,
    }
}

pub struct SqlxLikeRepository {
    pub pool: PgPool,
}

impl SqlxLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxLikeRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl LikeStore for SqlxLikeRepository {
    async fn begin(&self) -> Result<Box<dyn LikeTransaction>, DomainError> {
        let tx = self.pool.begin().await.map_err(infrastructure_error)?;
        Ok(Box::new(PgLikeTransaction { tx }))
    }

    #[instrument(skip(self))]
    async fn has_mark(&self, target: LikeTarget, requester_ip: &str) -> Result<bool, DomainError> {
        let t = tables(target.kind);
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1 AND ip_address = $2)",
            t.marks, t.target_fk
        );
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(target.id)
            .bind(requester_ip)
            .fetch_one(&self.pool)
            .await
            .map_err(infrastructure_error)
    }
}

/// One toggle's unit of work. Rolled back by sqlx when dropped uncommitted.
struct PgLikeTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl LikeTransaction for PgLikeTransaction {
    async fn target_exists(&mut self, target: LikeTarget) -> Result<bool, DomainError> {
        let t = tables(target.kind);
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", t.targets);
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(target.id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(infrastructure_error)
    }

    async fn find_mark(
        &mut self,
        target: LikeTarget,
        requester_ip: &str,
    ) -> Result<Option<LikeMark>, DomainError> {
        let t = tables(target.kind);
        let sql = format!(
            "SELECT id, {fk} AS target_id, ip_address, created_at FROM {marks} \
             WHERE {fk} = $1 AND ip_address = $2",
            fk = t.target_fk,
            marks = t.marks
        );
        sqlx::query_as::<_, LikeMark>(&sql)
            .bind(target.id)
            .bind(requester_ip)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(infrastructure_error)
    }

    async fn insert_mark(
        &mut self,
        target: LikeTarget,
        requester_ip: &str,
    ) -> Result<MarkInsert, DomainError> {
        let t = tables(target.kind);
        // The unique (fk, ip_address) constraint settles concurrent inserts:
        // the loser waits for the winner to commit and gets no row back.
        let sql = format!(
            "INSERT INTO {marks} ({fk}, ip_address) VALUES ($1, $2) \
             ON CONFLICT ({fk}, ip_address) DO NOTHING RETURNING id",
            fk = t.target_fk,
            marks = t.marks
        );
        let inserted = sqlx::query_scalar::<_, i32>(&sql)
            .bind(target.id)
            .bind(requester_ip)
            .fetch_optional(&mut *self.tx)
            .await;

        match inserted {
            Ok(Some(id)) => Ok(MarkInsert::Inserted(id)),
            Ok(None) => {
                debug!(target = %target, "like mark insert hit unique constraint");
                Ok(MarkInsert::AlreadyExists)
            }
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => {
                Err(DomainError::NotFound(format!("{} {}", target.kind, target.id)))
            }
            Err(e) => Err(infrastructure_error(e)),
        }
    }

    async fn delete_mark(&mut self, target: LikeTarget, mark_id: i32) -> Result<bool, DomainError> {
        let t = tables(target.kind);
        let sql = format!("DELETE FROM {} WHERE id = $1", t.marks);
        let result = sqlx::query(&sql)
            .bind(mark_id)
            .execute(&mut *self.tx)
            .await
            .map_err(infrastructure_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn adjust_counter(
        &mut self,
        target: LikeTarget,
        delta: CounterDelta,
    ) -> Result<i32, DomainError> {
        let t = tables(target.kind);
        let expression = match delta {
            CounterDelta::Increment => "like_count + 1",
            CounterDelta::Decrement => "GREATEST(like_count - 1, 0)",
        };
        let sql = format!(
            "UPDATE {} SET like_count = {} WHERE id = $1 RETURNING like_count",
            t.targets, expression
        );
        sqlx::query_scalar::<_, i32>(&sql)
            .bind(target.id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(infrastructure_error)?
            .ok_or_else(|| DomainError::NotFound(format!("{} {}", target.kind, target.id)))
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx.commit().await.map_err(infrastructure_error)
    }
}
