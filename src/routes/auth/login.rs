use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{routes::auth::guards::LocalAuth, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: Uuid,
}

pub async fn handle_login(State(state): State<AppState>, LocalAuth(user): LocalAuth) -> Response {
    let access_token = match state.auth.generate_access_token(&user) {
        Ok(token) => token,
        Err(err) => return err.into_response(),
    };
    let refresh_token = match state.auth.generate_refresh_token(&user).await {
        Ok(token) => token,
        Err(err) => return err.into_response(),
    };

    tracing::info!(user_id = %user.id, "user logged in");
    Json(LoginResponse {
        access_token,
        refresh_token,
        user_id: user.id,
    })
    .into_response()
}
