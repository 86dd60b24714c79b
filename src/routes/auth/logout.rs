use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{responses::JsonResponse, routes::auth::session::AuthSession, state::AppState};

pub async fn handle_logout(State(state): State<AppState>, session: AuthSession) -> Response {
    let user_id = match session.user_id() {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };

    match state.auth.logout(user_id).await {
        Ok(()) => JsonResponse::success("Logged out").into_response(),
        Err(err) => err.into_response(),
    }
}
