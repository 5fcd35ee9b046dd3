use axum::{routing::post, Router};

use crate::{handlers::otp, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        // Issue a code and mail it out
        .route("/send-otp", post(otp::send_otp))
        // Check a submitted code
        .route("/verify-otp", post(otp::verify_otp))
}
