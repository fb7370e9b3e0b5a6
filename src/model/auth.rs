use serde::{Deserialize, Serialize};

use super::{otp::Code, session::AccountStatus};

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Raw login credentials, as typed in on the login form.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A new candidate account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A new returning officer account, created by an administrator.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewOfficer {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForgotPassword {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub email: String,
    pub otp: Code,
    pub new_password: String,
}

/// Body of the account activation toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatusChange {
    pub status: AccountStatus,
}

/// The acknowledgement most mutating endpoints respond with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}

/// Very loose email check; the backend does the real validation.
pub fn looks_like_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}
