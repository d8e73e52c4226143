use crate::domain::{
    comment::{
        entity::{Comment, NewComment},
        repository::CommentRepository,
    },
    errors::DomainError,
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::infrastructure_error;

pub struct SqlxCommentRepository {
    pub pool: PgPool,
}

impl SqlxCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxCommentRepository with connection pool");
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    #[instrument(skip(self))]
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, author, avatar, content, created_at, like_count \
             FROM comments WHERE post_id = $1 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure_error)
    }

    #[instrument(skip(self, comment), fields(post_id = comment.post_id))]
    async fn create(&self, comment: &NewComment) -> Result<Comment, DomainError> {
        let created = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (post_id, author, avatar, content) VALUES ($1, $2, $3, $4) \
             RETURNING id, post_id, author, avatar, content, created_at, like_count",
        )
        .bind(comment.post_id)
        .bind(&comment.author)
        .bind(&comment.avatar)
        .bind(&comment.content)
        .fetch_one(&self.pool)
        .await;

        match created {
            Ok(row) => {
                info!(comment_id = row.id, "comment created");
                Ok(row)
            }
            // Post deleted between the existence check and the insert.
            Err(sqlx::Error::Database(db)) if db.is_foreign_key_violation() => Err(
                DomainError::NotFound(format!("post {}", comment.post_id)),
            ),
            Err(e) => Err(infrastructure_error(e)),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(infrastructure_error)?;
        Ok(result.rows_affected() > 0)
    }
}
