use std::sync::Arc;

use crate::config::Config;
use crate::db::user_repository::UserRepository;
use crate::services::{auth::AuthService, smtp_mailer::Mailer, users::UserService};
use crate::utils::jwt::JwtSecretError;

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(
        db: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
        config: &Config,
    ) -> Result<Self, JwtSecretError> {
        let users = UserService::new(db, mailer.clone(), config.verification_code_ttl_hours);
        let auth = AuthService::new(users.clone(), mailer, config)?;

        Ok(AppState { users, auth })
    }
}

#[cfg(test)]
pub fn test_config() -> Config {
    use crate::config::{JwtRefreshSettings, JwtSettings};

    Config {
        database_url: String::new(),
        frontend_origin: "http://localhost".into(),
        app_host: "127.0.0.1".into(),
        app_port: 3000,
        verification_code_ttl_hours: 1,
        jwt: JwtSettings {
            secret: "0123456789abcdef0123456789abcdef".into(),
            issuer: "test-issuer".into(),
            audience: "test-audience".into(),
            expires_in_seconds: 900,
        },
        jwt_refresh: JwtRefreshSettings {
            secret: "fedcba9876543210fedcba9876543210".into(),
            expires_in_seconds: 7 * 24 * 60 * 60,
        },
    }
}

#[cfg(test)]
pub fn test_state(
    db: Arc<crate::db::mock_db::MockDb>,
    mailer: Arc<crate::services::smtp_mailer::MockMailer>,
) -> AppState {
    AppState::new(db, mailer, &test_config()).expect("test JWT secrets should be valid")
}
