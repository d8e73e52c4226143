use crate::domain::comment::entity::{Comment, NewComment};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateCommentRequest {
    #[validate(range(min = 1))]
    pub post_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub author: String,
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
    #[validate(length(max = 500))]
    pub avatar: Option<String>,
}

impl From<CreateCommentRequest> for NewComment {
    fn from(r: CreateCommentRequest) -> Self {
        NewComment {
            post_id: r.post_id,
            author: r.author,
            avatar: r.avatar,
            content: r.content,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsQuery {
    #[validate(range(min = 1))]
    pub post_id: i32,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommentResponse {
    pub comment: Comment,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommentListResponse {
    pub comments: Vec<Comment>,
}
