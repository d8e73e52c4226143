use crate::{
    application::posts::dto::{
        CreatePostRequest, ListPostsQuery, PostListResponse, PostResponse, UpdatePostRequest,
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

pub async fn list_posts(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListPostsQuery>,
) -> Result<Json<PostListResponse>, AppError> {
    let posts = state.posts.list(query).await?;
    Ok(Json(PostListResponse { posts }))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let post = state.posts.get(&slug).await?;
    Ok(Json(PostResponse { post }))
}

#[instrument(skip(state, body), fields(slug = %body.slug))]
pub async fn create_post(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let post = state.posts.create(body).await?;
    Ok((StatusCode::CREATED, Json(PostResponse { post })))
}

/// Serves both PUT and PATCH.
#[instrument(skip(state, body))]
pub async fn update_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let post = state.posts.update(&slug, body).await?;
    Ok(Json(PostResponse { post }))
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.posts.delete(&slug).await?;
    Ok(Json(json!({ "message": "Post deleted successfully" })))
}
