use crate::api::AppState;
use crate::api::extract::{ValidJson, ValidQuery};
use crate::api::middleware::AuthUser;
use crate::api::schemas::Envelope;
use crate::api::schemas::posts::{CategoryResponse, ListPosts, PostInput, PostListResponse, PostResponse};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

pub async fn list_posts(State(state): State<AppState>, ValidQuery(query): ValidQuery<ListPosts>) -> Result<impl IntoResponse> {
    let (filter, page) = query.into_parts();
    let page = state.post_service.list(filter, page).await?;
    Ok(Json(Envelope::data(PostListResponse::from(page))))
}

pub async fn get_post(State(state): State<AppState>, Path(slug): Path<String>) -> Result<impl IntoResponse> {
    let post = state.post_service.get(&slug).await?;
    Ok(Json(Envelope::data(PostResponse::from(post))))
}

pub async fn list_categories(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let categories: Vec<CategoryResponse> =
        state.post_service.categories().await?.into_iter().map(Into::into).collect();
    Ok(Json(Envelope::data(categories)))
}

pub async fn create_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<PostInput>,
) -> Result<impl IntoResponse> {
    let post = state.post_service.create(auth_user.user_id, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(Envelope::with_message("Post has been created", PostResponse::from(post)))))
}

pub async fn update_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ValidJson(payload): ValidJson<PostInput>,
) -> Result<impl IntoResponse> {
    let post = state.post_service.update(auth_user.user_id, &slug, payload.into()).await?;
    Ok(Json(Envelope::data(PostResponse::from(post))))
}

pub async fn delete_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    state.post_service.delete(auth_user.user_id, &slug).await?;
    Ok(Json(Envelope::message("Post deleted")))
}
