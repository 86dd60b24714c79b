pub mod claims;
pub mod forgot_password;
pub mod guards;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod reset_password;
pub mod session;
pub mod signup;
pub mod verify;

pub use forgot_password::handle_forgot_password;
pub use login::handle_login;
pub use logout::handle_logout;
pub use refresh::handle_refresh;
pub use reset_password::handle_reset_password;
pub use signup::handle_signup;
pub use verify::handle_verify;
