pub mod auth;
pub mod errors;
pub mod smtp_mailer;
pub mod users;
