use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::{responses::JsonResponse, routes::auth::claims::Claims, state::AppState};

/// Claims of a valid access token presented as `Authorization: Bearer`.
#[derive(Debug, PartialEq)]
pub struct AuthSession(pub Claims);

impl AuthSession {
    pub fn user_id(&self) -> Result<Uuid, Response> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| JsonResponse::unauthorized("Invalid or expired token").into_response())
    }
}

pub(crate) async fn bearer_token(parts: &mut Parts, state: &AppState) -> Result<String, Response> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| JsonResponse::unauthorized("Missing bearer token").into_response())?;
    Ok(bearer.token().to_string())
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state).await?;
        let claims = state
            .auth
            .validate_access_token(&token)
            .map_err(IntoResponse::into_response)?;

        Ok(AuthSession(claims))
    }
}
