use axum::{
    extract::{Json, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{models::user::PublicUser, state::AppState};

#[derive(Deserialize, Serialize)]
pub struct VerifyPayload {
    pub email: String,
    pub code: String,
}

pub async fn handle_verify(
    State(state): State<AppState>,
    Json(payload): Json<VerifyPayload>,
) -> Response {
    match state.auth.verify_email(&payload.email, &payload.code).await {
        Ok(user) => Json(PublicUser::from(user)).into_response(),
        Err(err) => {
            tracing::warn!(%err, "email verification rejected");
            err.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use time::OffsetDateTime;
    use tower::ServiceExt;

    use crate::routes::test_support::{body_json, json_request, test_app};

    #[tokio::test]
    async fn test_verify_activates_account() {
        let app = test_app();
        let user = app.signup("a@x.com", "alice", "p1").await;
        let code = app.verification_code(&user);

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/auth/verify",
                json!({"email": "a@x.com", "code": code}),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["isActive"], true);
        assert_eq!(body["isVerifiedEmail"], true);
        assert!(app.db.verifications.lock().unwrap().get(&user.id).is_none());
    }

    #[tokio::test]
    async fn test_verify_wrong_code_rejected() {
        let app = test_app();
        let user = app.signup("a@x.com", "alice", "p1").await;
        let code = app.verification_code(&user);
        let wrong = if code == "000000" { "111111" } else { "000000" };

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/auth/verify",
                json!({"email": "a@x.com", "code": wrong}),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!app.db.user(user.id).unwrap().is_active);
    }

    #[tokio::test]
    async fn test_verify_expired_code_rejected() {
        let app = test_app();
        let user = app.signup("a@x.com", "alice", "p1").await;
        let code = app.verification_code(&user);
        app.db.set_verification_expiry(
            user.id,
            OffsetDateTime::now_utc() - time::Duration::minutes(5),
        );

        let response = app
            .router
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/auth/verify",
                json!({"email": "a@x.com", "code": code}),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Verification code has expired");
    }
}
