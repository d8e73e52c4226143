use crate::{
    application::{
        comments::use_case::CommentsUseCase, likes::service::LikeToggleService,
        posts::use_case::PostsUseCase,
    },
    config::Config,
    infrastructure::repositories::{
        sqlx_comment_repository::SqlxCommentRepository, sqlx_like_repository::SqlxLikeRepository,
        sqlx_post_repository::SqlxPostRepository,
    },
};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub posts: Arc<PostsUseCase>,
    pub comments: Arc<CommentsUseCase>,
    pub likes: Arc<LikeToggleService>,
}

impl AppState {
    /// Wires every use case to its Postgres-backed repository.
    pub fn from_pool(db: PgPool, config: Config) -> Self {
        let post_repo = Arc::new(SqlxPostRepository::new(db.clone()));
        let comment_repo = Arc::new(SqlxCommentRepository::new(db.clone()));
        let like_store = Arc::new(SqlxLikeRepository::new(db.clone()));

        Self {
            posts: Arc::new(PostsUseCase::new(post_repo.clone())),
            comments: Arc::new(CommentsUseCase::new(post_repo, comment_repo)),
            likes: Arc::new(LikeToggleService::with_max_attempts(
                like_store,
                config.like_max_attempts,
            )),
            db,
            config,
        }
    }
}
