use super::dto::{CreatePostRequest, ListPostsQuery, UpdatePostRequest};
use crate::domain::{
    errors::DomainError,
    post::{entity::Post, repository::PostRepository},
};
use std::sync::Arc;

pub struct PostsUseCase {
    repository: Arc<dyn PostRepository>,
}

impl PostsUseCase {
    pub fn new(repository: Arc<dyn PostRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: ListPostsQuery) -> Result<Vec<Post>, DomainError> {
        self.repository.list(&query.into_filter()).await
    }

    /// Fetches a post for reading; each call counts as one view.
    pub async fn get(&self, slug: &str) -> Result<Post, DomainError> {
        self.repository
            .view_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post '{}'", slug)))
    }

    pub async fn create(&self, request: CreatePostRequest) -> Result<Post, DomainError> {
        self.repository.create(&request.into()).await
    }

    pub async fn update(&self, slug: &str, request: UpdatePostRequest) -> Result<Post, DomainError> {
        self.repository
            .update(slug, &request.into())
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post '{}'", slug)))
    }

    pub async fn delete(&self, slug: &str) -> Result<(), DomainError> {
        if self.repository.delete(slug).await? {
            Ok(())
        } else {
            Err(DomainError::NotFound(format!("post '{}'", slug)))
        }
    }
}
