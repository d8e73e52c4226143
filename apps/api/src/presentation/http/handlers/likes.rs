use crate::{
    application::likes::dto::LikeRequest,
    domain::like::target::LikeStatus,
    presentation::http::{
        errors::AppError,
        extract::{ValidatedJson, ValidatedQuery},
        middleware::client_ip::ClientIp,
        state::AppState,
    },
};
use axum::{Json, extract::State};

/// `POST /api/likes`: flips the caller's like on a post or comment.
pub async fn toggle_like(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    ValidatedJson(body): ValidatedJson<LikeRequest>,
) -> Result<Json<LikeStatus>, AppError> {
    let status = state.likes.toggle(body.target(), &ip).await?;
    Ok(Json(status))
}

/// `GET /api/likes?type=&id=`: whether the caller currently likes the target.
pub async fn like_status(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    ValidatedQuery(query): ValidatedQuery<LikeRequest>,
) -> Result<Json<LikeStatus>, AppError> {
    let status = state.likes.check_status(query.target(), &ip).await?;
    Ok(Json(status))
}
