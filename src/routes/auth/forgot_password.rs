use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{responses::JsonResponse, state::AppState};

#[derive(Deserialize, Serialize)]
pub struct ForgotPasswordPayload {
    pub email: String,
}

pub async fn handle_forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Response {
    if let Err(err) = state.auth.forgot_password(&payload.email).await {
        tracing::error!(%err, "forgot-password request failed");
    }

    JsonResponse::success("If that email is registered, a reset link has been sent.")
        .into_response()
}
