use crate::api::AppState;
use crate::api::extract::ValidJson;
use crate::api::middleware::AuthUser;
use crate::api::schemas::Envelope;
use crate::api::schemas::users::{CheckUsername, UpdateProfile, UserResponse};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

pub async fn get_profile(State(state): State<AppState>, Path(username): Path<String>) -> Result<impl IntoResponse> {
    let user = state.user_service.get_profile(&username).await?;
    Ok(Json(Envelope::data(UserResponse::public(user))))
}

pub async fn check_username(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CheckUsername>,
) -> Result<impl IntoResponse> {
    state.user_service.check_username(&payload.username).await?;
    Ok(Json(Envelope::message("Username is available")))
}

pub async fn update_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    ValidJson(payload): ValidJson<UpdateProfile>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.update_profile(auth_user.user_id, &username, payload.into()).await?;
    Ok(Json(Envelope::data(UserResponse::private(user))))
}
