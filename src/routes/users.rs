use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};

use crate::{
    models::user::{PublicUser, UpdateUserPayload},
    responses::JsonResponse,
    routes::auth::session::AuthSession,
    state::AppState,
};

pub async fn handle_get_me(State(state): State<AppState>, session: AuthSession) -> Response {
    let user_id = match session.user_id() {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    match state.users.find_by_id(user_id).await {
        Ok(Some(user)) => Json(PublicUser::from(user)).into_response(),
        Ok(None) => JsonResponse::not_found("User not found").into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn handle_update_me(
    State(state): State<AppState>,
    session: AuthSession,
    Json(payload): Json<UpdateUserPayload>,
) -> Response {
    let user_id = match session.user_id() {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    let payload = UpdateUserPayload {
        username: payload.username.map(|v| v.trim().to_string()),
        name: payload.name.map(|v| v.trim().to_string()),
    };
    if matches!(payload.username.as_deref(), Some("")) || matches!(payload.name.as_deref(), Some(""))
    {
        return JsonResponse::bad_request("Fields cannot be empty").into_response();
    }

    match state.users.update(user_id, payload).await {
        Ok(user) => Json(PublicUser::from(user)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn handle_delete_me(State(state): State<AppState>, session: AuthSession) -> Response {
    let user_id = match session.user_id() {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    match state.users.delete(user_id).await {
        Ok(()) => JsonResponse::success("Account deleted").into_response(),
        Err(err) => err.into_response(),
    }
}
