use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(crate::handlers::auth::signup))
        .route("/login", post(crate::handlers::auth::login))
        .route("/users", get(crate::handlers::auth::list_users))
        .route("/reset-password", post(crate::handlers::auth::reset_password))
}
