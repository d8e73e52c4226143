use super::entity::{NewPost, Post, PostChanges, PostFilter};
use crate::domain::errors::DomainError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, DomainError>;
    /// Loads a post by slug and counts the read in the same statement.
    async fn view_by_slug(&self, slug: &str) -> Result<Option<Post>, DomainError>;
    async fn exists(&self, id: i32) -> Result<bool, DomainError>;
    async fn create(&self, post: &NewPost) -> Result<Post, DomainError>;
    async fn update(&self, slug: &str, changes: &PostChanges) -> Result<Option<Post>, DomainError>;
    async fn delete(&self, slug: &str) -> Result<bool, DomainError>;
}
