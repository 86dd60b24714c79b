pub mod auth;
#[cfg(test)]
pub mod test_support;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::handle_signup))
        .route("/login", post(auth::handle_login))
        .route("/refresh", post(auth::handle_refresh))
        .route("/logout", post(auth::handle_logout))
        .route("/verify", post(auth::handle_verify))
        .route("/forgot-password", post(auth::handle_forgot_password))
        .route("/reset-password", post(auth::handle_reset_password))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/me",
        get(users::handle_get_me)
            .patch(users::handle_update_me)
            .delete(users::handle_delete_me),
    )
}
