use crate::domain::{
    errors::DomainError,
    post::{
        entity::{NewPost, Post, PostChanges, PostFilter, PostSort},
        repository::PostRepository,
    },
};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info, instrument};

use super::infrastructure_error;

const POST_COLUMNS: &str = "id, title, slug, excerpt, content, cover_image, tags, \
                            published_at, updated_at, read_time, like_count, views";

pub struct SqlxPostRepository {
    pub pool: PgPool,
}

impl SqlxPostRepository {
    pub fn new(pool: PgPool) -> Self {
        info!("Initializing SqlxPostRepository with connection pool");
        Self { pool }
    }
}

/// Adds the tag filter, ordering and paging clauses to a post listing.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &PostFilter) {
    if let Some(tag) = filter
        .tag
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        debug!("Filtering posts by tag: {}", tag);
        qb.push(" WHERE EXISTS (SELECT 1 FROM unnest(tags) AS t WHERE lower(t) = lower(")
            .push_bind(tag.to_string())
            .push("))");
    }

    qb.push(match filter.sort {
        PostSort::Newest => " ORDER BY published_at DESC, id DESC",
        PostSort::Popular => " ORDER BY views DESC, id DESC",
    });

    qb.push(" LIMIT ")
        .push_bind(filter.page.limit)
        .push(" OFFSET ")
        .push_bind(filter.page.offset);
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    #[instrument(skip(self))]
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, DomainError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {POST_COLUMNS} FROM posts"));
        push_filter(&mut qb, filter);
        qb.build_query_as::<Post>()
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure_error)
    }

    #[instrument(skip(self))]
    async fn view_by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError> {
        let sql = format!(
            "UPDATE posts SET views = views + 1 WHERE slug = $1 RETURNING {POST_COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(infrastructure_error)
    }

    async fn exists(&self, id: i32) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(infrastructure_error)
    }

    #[instrument(skip(self, post), fields(slug = %post.slug))]
    async fn create(&self, post: &NewPost) -> Result<Post, DomainError> {
        let sql = format!(
            "INSERT INTO posts (title, slug, excerpt, content, cover_image, tags, read_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {POST_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Post>(&sql)
            .bind(&post.title)
            .bind(&post.slug)
            .bind(&post.excerpt)
            .bind(&post.content)
            .bind(&post.cover_image)
            .bind(&post.tags)
            .bind(post.read_time)
            .fetch_one(&self.pool)
            .await;

        match created {
            Ok(row) => {
                info!(post_id = row.id, "post created");
                Ok(row)
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                DomainError::AlreadyExists(format!("post with slug '{}'", post.slug)),
            ),
            Err(e) => Err(infrastructure_error(e)),
        }
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, slug: &str, changes: &PostChanges) -> Result<Option<Post>, DomainError> {
        let sql = format!(
            "UPDATE posts SET \
                title = COALESCE($2, title), \
                excerpt = COALESCE($3, excerpt), \
                content = COALESCE($4, content), \
                cover_image = COALESCE($5, cover_image), \
                tags = COALESCE($6, tags), \
                read_time = COALESCE($7, read_time), \
                updated_at = NOW() \
             WHERE slug = $1 RETURNING {POST_COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(slug)
            .bind(&changes.title)
            .bind(&changes.excerpt)
            .bind(&changes.content)
            .bind(&changes.cover_image)
            .bind(&changes.tags)
            .bind(changes.read_time)
            .fetch_optional(&self.pool)
            .await
            .map_err(infrastructure_error)
    }

    #[instrument(skip(self))]
    async fn delete(&self, slug: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(infrastructure_error)?;
        Ok(result.rows_affected() > 0)
    }
}
