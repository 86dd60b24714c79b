use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    response::Response,
    Router,
};
use serde_json::Value;

use crate::{
    db::mock_db::MockDb,
    models::{signup::SignupPayload, user::User},
    routes::{auth_routes, user_routes},
    services::smtp_mailer::MockMailer,
    state::{test_state, AppState},
};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub db: Arc<MockDb>,
    pub mailer: Arc<MockMailer>,
}

pub fn test_app() -> TestApp {
    let db = Arc::new(MockDb::default());
    let mailer = Arc::new(MockMailer::default());
    let state = test_state(db.clone(), mailer.clone());
    let router = Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .with_state(state.clone());

    TestApp {
        router,
        state,
        db,
        mailer,
    }
}

impl TestApp {
    pub async fn signup(&self, email: &str, username: &str, password: &str) -> User {
        self.state
            .auth
            .signup(SignupPayload {
                email: email.into(),
                username: username.into(),
                name: "Test User".into(),
                password: password.into(),
            })
            .await
            .expect("signup should succeed")
    }

    pub fn verification_code(&self, user: &User) -> String {
        self.db
            .verifications
            .lock()
            .unwrap()
            .get(&user.id)
            .map(|v| v.verification_code.clone())
            .expect("verification row should exist")
    }
}

pub fn json_request(method: Method, uri: &str, body: Value, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: Method, uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
