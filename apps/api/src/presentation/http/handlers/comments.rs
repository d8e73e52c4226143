use crate::{
    application::comments::dto::{
        CommentListResponse, CommentResponse, CreateCommentRequest, ListCommentsQuery,
    },
    presentation::http::{
        errors::AppError,
        extract::{ValidatedJson, ValidatedQuery},
        state::AppState,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::instrument;

pub async fn list_comments(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListCommentsQuery>,
) -> Result<Json<CommentListResponse>, AppError> {
    let comments = state.comments.list(query.post_id).await?;
    Ok(Json(CommentListResponse { comments }))
}

#[instrument(skip(state, body), fields(post_id = body.post_id))]
pub async fn create_comment(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let comment = state.comments.create(body).await?;
    Ok((StatusCode::CREATED, Json(CommentResponse { comment })))
}

#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id: i32 = id
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid comment ID".into()))?;
    state.comments.delete(id).await?;
    Ok(Json(json!({ "message": "Comment deleted successfully" })))
}
