use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    models::{signup::SignupPayload, user::PublicUser},
    responses::JsonResponse,
    state::AppState,
};

pub async fn handle_signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Response {
    let payload = payload.normalized();
    if let Some(field) = payload.missing_field() {
        return JsonResponse::bad_request(&format!("A valid {field} is required")).into_response();
    }

    match state.auth.signup(payload).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "user signed up");
            (StatusCode::CREATED, Json(PublicUser::from(user))).into_response()
        }
        Err(err) => err.into_response(),
    }
}
