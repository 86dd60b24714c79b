use rand::{distr::Alphanumeric, Rng};
use time::{Duration, OffsetDateTime};

pub const VERIFICATION_CODE_LENGTH: usize = 6;
pub const RESET_TOKEN_LENGTH: usize = 32;

/// Numeric one-time code mailed to the user at signup.
pub fn generate_verification_code() -> String {
    let mut rng = rand::rng();
    (0..VERIFICATION_CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

pub fn generate_reset_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

pub fn expires_in_hours(hours: i64) -> OffsetDateTime {
    OffsetDateTime::now_utc() + Duration::hours(hours)
}
