use crate::api::AppState;
use crate::api::extract::ValidJson;
use crate::api::schemas::Envelope;
use crate::api::schemas::auth::{AuthSession, Login, Registration};
use crate::api::schemas::users::UserResponse;
use crate::error::{AppError, Result};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const REFRESH_COOKIE: &str = "refresh_token";
const REFRESH_COOKIE_PATH: &str = "/api/auth";

pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<Registration>,
) -> Result<impl IntoResponse> {
    state.auth_service.register(&payload.username, &payload.email, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(Envelope::message("User successfully registered"))))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidJson(payload): ValidJson<Login>,
) -> Result<impl IntoResponse> {
    let session = state.auth_service.login(&payload.email, &payload.password).await?;

    let max_age = time::Duration::try_from(state.config.auth.refresh_token_ttl()).unwrap_or(time::Duration::MAX);
    let cookie = Cookie::build((REFRESH_COOKIE, session.refresh_token))
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.config.server.production)
        .max_age(max_age);

    let body = AuthSession { user: UserResponse::private(session.user), access_token: session.access_token };
    Ok((jar.add(cookie), Json(Envelope::data(body))))
}

pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Result<impl IntoResponse> {
    let refresh_token = jar.get(REFRESH_COOKIE).ok_or(AppError::MissingToken)?.value();
    let session = state.auth_service.refresh(refresh_token).await?;

    let body = AuthSession { user: UserResponse::private(session.user), access_token: session.access_token };
    Ok(Json(Envelope::data(body)))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<impl IntoResponse> {
    let refresh_token = jar.get(REFRESH_COOKIE).ok_or(AppError::MissingToken)?.value();
    state.auth_service.logout(refresh_token).await?;

    let jar = jar.remove(Cookie::build(REFRESH_COOKIE).path(REFRESH_COOKIE_PATH));
    Ok((jar, Json(Envelope::message("Logged out"))))
}
