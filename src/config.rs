use std::env;

use thiserror::Error;

pub const DEFAULT_APP_PORT: u16 = 3000;
pub const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 15 * 60;
pub const DEFAULT_REFRESH_TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
pub const DEFAULT_VERIFICATION_CODE_TTL_HOURS: i64 = 1;
pub const DEFAULT_JWT_ISSUER: &str = "inkwell";
pub const DEFAULT_JWT_AUDIENCE: &str = "inkwell-api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expires_in_seconds: i64,
}

#[derive(Clone, Debug)]
pub struct JwtRefreshSettings {
    pub secret: String,
    pub expires_in_seconds: i64,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub frontend_origin: String,
    pub app_host: String,
    pub app_port: u16,
    pub verification_code_ttl_hours: i64,
    pub jwt: JwtSettings,
    pub jwt_refresh: JwtRefreshSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok(); // Load .env file

        let database_url = required("DATABASE_URL")?;
        let frontend_origin = required("FRONTEND_ORIGIN")?;
        let app_host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let app_port = parsed_or("APP_PORT", DEFAULT_APP_PORT)?;
        let verification_code_ttl_hours = parsed_or(
            "VERIFICATION_CODE_TTL_HOURS",
            DEFAULT_VERIFICATION_CODE_TTL_HOURS,
        )?;

        let jwt = JwtSettings {
            secret: required("JWT_SECRET")?,
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_JWT_ISSUER.to_string()),
            audience: env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| DEFAULT_JWT_AUDIENCE.to_string()),
            expires_in_seconds: parsed_or(
                "JWT_EXPIRES_IN_SECONDS",
                DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
            )?,
        };

        let jwt_refresh = JwtRefreshSettings {
            secret: required("JWT_REFRESH_SECRET")?,
            expires_in_seconds: parsed_or(
                "JWT_REFRESH_EXPIRES_IN_SECONDS",
                DEFAULT_REFRESH_TOKEN_TTL_SECONDS,
            )?,
        };

        Ok(Config {
            database_url,
            frontend_origin,
            app_host,
            app_port,
            verification_code_ttl_hours,
            jwt,
            jwt_refresh,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parsed_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}
