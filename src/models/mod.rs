pub mod account_verification;
pub mod reset_password;
pub mod signup;
pub mod user;
