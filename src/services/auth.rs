use std::sync::Arc;

use chrono::{Duration, Utc};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    config::Config,
    models::{reset_password::ResetPasswordUpdate, signup::SignupPayload, user::User},
    routes::auth::claims::{Claims, TokenUse},
    services::{errors::AuthError, smtp_mailer::Mailer, users::UserService},
    utils::{
        codes::generate_reset_token,
        jwt::{create_jwt, decode_jwt, JwtKeys, JwtSecretError},
        password::{hash_password, verify_password},
    },
};

pub const RESET_TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    mailer: Arc<dyn Mailer>,
    access_keys: Arc<JwtKeys>,
    refresh_keys: Arc<JwtKeys>,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: UserService,
        mailer: Arc<dyn Mailer>,
        config: &Config,
    ) -> Result<Self, JwtSecretError> {
        Ok(Self {
            users,
            mailer,
            access_keys: Arc::new(JwtKeys::from_secret(&config.jwt.secret)?),
            refresh_keys: Arc::new(JwtKeys::from_secret(&config.jwt_refresh.secret)?),
            issuer: config.jwt.issuer.clone(),
            audience: config.jwt.audience.clone(),
            access_ttl: Duration::seconds(config.jwt.expires_in_seconds),
            refresh_ttl: Duration::seconds(config.jwt_refresh.expires_in_seconds),
        })
    }

    pub async fn signup(&self, payload: SignupPayload) -> Result<User, AuthError> {
        Ok(self.users.create(payload).await?)
    }

    /// Credential check behind the login guard.
    pub async fn validate_user(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if verify_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    fn claims_for(&self, user: &User, token_use: TokenUse, ttl: Duration) -> Claims {
        let now = Utc::now();
        Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp() as usize,
            exp: (now + ttl).timestamp() as usize,
            iss: String::new(),
            aud: String::new(),
            token_use,
        }
    }

    pub fn generate_access_token(&self, user: &User) -> Result<String, AuthError> {
        let claims = self.claims_for(user, TokenUse::Access, self.access_ttl);
        Ok(create_jwt(
            claims,
            &self.access_keys,
            &self.issuer,
            &self.audience,
        )?)
    }

    /// Mints a refresh token and stores its hash, which invalidates every
    /// refresh token issued to this user before it.
    pub async fn generate_refresh_token(&self, user: &User) -> Result<String, AuthError> {
        let claims = self.claims_for(user, TokenUse::Refresh, self.refresh_ttl);
        let token = create_jwt(claims, &self.refresh_keys, &self.issuer, &self.audience)?;
        let hash = hash_password(&token)?;
        self.users
            .update_hash_refresh_token(user.id, Some(&hash))
            .await?;
        Ok(token)
    }

    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode_jwt(
            token,
            &self.access_keys,
            &self.issuer,
            &self.audience,
            TokenUse::Access,
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
    }

    /// Refresh guard: signature, expiry and a match against the stored hash.
    pub async fn validate_refresh_token(&self, token: &str) -> Result<User, AuthError> {
        let data = decode_jwt(
            token,
            &self.refresh_keys,
            &self.issuer,
            &self.audience,
            TokenUse::Refresh,
        )
        .map_err(|_| AuthError::InvalidToken)?;

        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let Some(stored_hash) = user.refresh_token.as_deref() else {
            return Err(AuthError::InvalidToken);
        };

        match verify_password(token, stored_hash) {
            Ok(true) => Ok(user),
            Ok(false) => Err(AuthError::InvalidToken),
            Err(err) => {
                tracing::warn!(%err, %user_id, "stored refresh token hash is unreadable");
                Err(AuthError::InvalidToken)
            }
        }
    }

    pub async fn logout(&self, user_id: Uuid) -> Result<(), AuthError> {
        self.users.update_hash_refresh_token(user_id, None).await?;
        Ok(())
    }

    /// Activates the account when `code` matches the stored, unexpired code.
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<User, AuthError> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(AuthError::InvalidCode);
        };

        if user.is_active && user.is_verified_email {
            return Err(AuthError::AlreadyVerified);
        }

        let Some(verification) = self.users.find_account_verification(user.id).await? else {
            return Err(AuthError::InvalidCode);
        };

        if verification.verification_code != code.trim() {
            return Err(AuthError::InvalidCode);
        }
        if verification.is_expired(OffsetDateTime::now_utc()) {
            return Err(AuthError::CodeExpired);
        }

        self.users.active_account(user.id).await?;
        Ok(self.users.find_by_id(user.id).await?.unwrap_or(user))
    }

    /// Unknown addresses succeed silently so callers cannot probe for accounts.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Ok(());
        };

        let token = generate_reset_token();
        let expires_at = OffsetDateTime::now_utc() + time::Duration::minutes(RESET_TOKEN_TTL_MINUTES);
        self.users
            .update_reset_password(
                user.id,
                ResetPasswordUpdate {
                    reset_token: Some(token.clone()),
                    expires_at: Some(expires_at),
                },
            )
            .await?;

        if let Err(err) = self.mailer.send_reset_email(&user.email, &token).await {
            tracing::error!(%err, user_id = %user.id, "failed to send reset email");
        }
        Ok(())
    }

    /// Consumes a reset token, sets the new password and drops any refresh
    /// session. A token is accepted at most once.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let Some(user_id) = self
            .users
            .complete_password_reset(token.trim(), new_password)
            .await?
        else {
            return Err(AuthError::InvalidToken);
        };

        tracing::info!(%user_id, "password reset completed");
        Ok(())
    }
}
