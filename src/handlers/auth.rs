use axum::{extract::State, response::Json};
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::extract::AppJson;
use crate::models::user::{
    LoginRequest, LoginResponse, ResetPasswordRequest, SignupRequest, SignupResponse, UserResponse,
};
use crate::models::MessageResponse;
use crate::state::AppState;

pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignupRequest>,
) -> Result<Json<SignupResponse>> {
    payload.validate().map_err(AppError::from_validation)?;

    state
        .directory
        .register(
            &payload.name,
            &payload.email,
            &payload.password,
            &payload.confirm,
        )
        .await?;

    tracing::info!("new account registered");

    Ok(Json(SignupResponse {
        message: "Signup successful".to_string(),
        redirect: "/home".to_string(),
    }))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let name = state
        .directory
        .authenticate(&payload.email, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        name,
        redirect: "/landing-page".to_string(),
    }))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let users = state.directory.list().await?;
    Ok(Json(users))
}

pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .directory
        .reset_password(&payload.email, &payload.password, &payload.confirm)
        .await?;

    tracing::info!("password reset completed");

    Ok(Json(MessageResponse::new("Password reset successful")))
}
