use super::entity::{Comment, NewComment};
use crate::domain::errors::DomainError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Newest first.
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<Comment>, DomainError>;
    async fn create(&self, comment: &NewComment) -> Result<Comment, DomainError>;
    async fn delete(&self, id: i32) -> Result<bool, DomainError>;
}
