use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domains::Account;
use serde::Serialize;
use services::auth::{Credentials, PasswordChange};

use crate::envelope::Envelope;
use crate::web::auth::Authenticated;
use crate::web::error::ApiResult;
use crate::web::handlers::message;
use crate::web::state::AppState;

#[derive(Serialize)]
struct UserData {
    user: Account,
}

/// `POST /api/auth/signup`
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(credentials) = payload?;
    let session = state.auth.signup(credentials).await?;
    let body = Envelope::success(UserData { user: session.account }).with_token(session.token);
    Ok((StatusCode::CREATED, Json(body)))
}

/// `POST /api/auth/signin`
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(credentials) = payload?;
    let session = state.auth.signin(credentials).await?;
    Ok(Json(Envelope::ok().with_token(session.token)))
}

/// `POST /api/auth/logout`. Tokens are stateless; the client drops its copy.
pub async fn logout() -> impl IntoResponse {
    message("Logged out successfully. Please clear your token.")
}

/// `PATCH /api/auth/change-password`
pub async fn change_password(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    payload: Result<Json<PasswordChange>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(change) = payload?;
    let session = state.auth.change_password(&identity, change).await?;
    Ok(Json(
        Envelope::ok()
            .with_token(session.token)
            .with_message("Password changed successfully!"),
    ))
}
