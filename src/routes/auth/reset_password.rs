use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{responses::JsonResponse, state::AppState};

#[derive(Deserialize, Serialize)]
pub struct ResetPasswordPayload {
    pub token: String,
    pub password: String,
}

pub async fn handle_reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Response {
    if payload.password.is_empty() {
        return JsonResponse::bad_request("A new password is required").into_response();
    }

    match state
        .auth
        .reset_password(&payload.token, &payload.password)
        .await
    {
        Ok(()) => JsonResponse::success("Password has been reset").into_response(),
        Err(err) => err.into_response(),
    }
}
