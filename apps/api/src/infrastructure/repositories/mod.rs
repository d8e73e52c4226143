use crate::domain::errors::DomainError;

pub mod memory_like_store;
pub mod sqlx_comment_repository;
pub mod sqlx_like_repository;
pub mod sqlx_post_repository;

/// Wraps a driver failure; the detail stays server-side.
pub(crate) fn infrastructure_error(err: sqlx::Error) -> DomainError {
    tracing::error!(database_error = %err, "database operation failed");
    DomainError::InfrastructureError(err.to_string())
}
