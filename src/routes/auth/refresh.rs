use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{routes::auth::guards::RefreshAuth, state::AppState};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Issues a new access token. The refresh token itself is not rotated.
pub async fn handle_refresh(
    State(state): State<AppState>,
    RefreshAuth(user): RefreshAuth,
) -> Response {
    match state.auth.generate_access_token(&user) {
        Ok(access_token) => Json(RefreshResponse { access_token }).into_response(),
        Err(err) => err.into_response(),
    }
}
