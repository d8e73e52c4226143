use super::dto::CreateCommentRequest;
use crate::domain::{
    comment::{entity::Comment, repository::CommentRepository},
    errors::DomainError,
    post::repository::PostRepository,
};
use std::sync::Arc;

pub struct CommentsUseCase {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentsUseCase {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    pub async fn list(&self, post_id: i32) -> Result<Vec<Comment>, DomainError> {
        self.comments.list_for_post(post_id).await
    }

    pub async fn create(&self, request: CreateCommentRequest) -> Result<Comment, DomainError> {
        if !self.posts.exists(request.post_id).await? {
            return Err(DomainError::NotFound(format!("post {}", request.post_id)));
        }
        self.comments.create(&request.into()).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        if self.comments.delete(id).await? {
            Ok(())
        } else {
            Err(DomainError::NotFound(format!("comment {}", id)))
        }
    }
}
