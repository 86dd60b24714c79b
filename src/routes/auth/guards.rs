use axum::{
    extract::{FromRequest, FromRequestParts, Json, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    models::user::User, responses::JsonResponse, routes::auth::session::bearer_token,
    state::AppState,
};

#[derive(Deserialize, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Resolves the user behind an `{email, password}` body.
pub struct LocalAuth(pub User);

impl FromRequest<AppState> for LocalAuth {
    type Rejection = Response;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<LoginPayload>::from_request(req, state)
            .await
            .map_err(|rejection| JsonResponse::bad_request(&rejection.body_text()).into_response())?;

        state
            .auth
            .validate_user(&payload.email, &payload.password)
            .await
            .map(LocalAuth)
            .map_err(IntoResponse::into_response)
    }
}

/// Resolves the user behind a refresh token sent as `Authorization: Bearer`.
/// The token must match the hash currently stored for that user.
pub struct RefreshAuth(pub User);

impl FromRequestParts<AppState> for RefreshAuth {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state).await?;
        state
            .auth
            .validate_refresh_token(&token)
            .await
            .map(RefreshAuth)
            .map_err(IntoResponse::into_response)
    }
}
