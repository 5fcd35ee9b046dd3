use axum::{extract::State, response::Json};
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::extract::AppJson;
use crate::models::otp::{SendOtpRequest, VerifyOtpRequest};
use crate::models::MessageResponse;
use crate::state::AppState;

pub async fn send_otp(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SendOtpRequest>,
) -> Result<Json<MessageResponse>> {
    payload.validate().map_err(AppError::from_validation)?;

    // The code is persisted before dispatch; a failed send leaves the
    // issuance in place and reports the fault to the caller.
    let code = state.otp_ledger.issue(&payload.email).await?;

    let mailer = state
        .mailer
        .as_ref()
        .ok_or_else(|| AppError::dispatch("Mail service not configured"))?;
    mailer.send_otp(&payload.email, &code).await?;

    tracing::info!("otp issued and dispatched");

    Ok(Json(MessageResponse::new(
        "An OTP has been sent to your email",
    )))
}

pub async fn verify_otp(
    State(state): State<AppState>,
    AppJson(payload): AppJson<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .otp_ledger
        .verify(&payload.email, &payload.otp)
        .await?;

    tracing::info!("otp verified");

    Ok(Json(MessageResponse::new("OTP verified")))
}
