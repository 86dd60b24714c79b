use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SignupPayload {
    pub email: String,
    pub username: String,
    pub name: String,
    pub password: String,
}

impl SignupPayload {
    /// Trims whitespace and lowercases the email so uniqueness checks are stable.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_lowercase();
        self.username = self.username.trim().to_string();
        self.name = self.name.trim().to_string();
        self
    }

    pub fn missing_field(&self) -> Option<&'static str> {
        if self.email.is_empty() || !self.email.contains('@') {
            Some("email")
        } else if self.username.is_empty() {
            Some("username")
        } else if self.name.is_empty() {
            Some("name")
        } else if self.password.is_empty() {
            Some("password")
        } else {
            None
        }
    }
}
