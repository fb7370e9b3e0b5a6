use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::id::ApiId;

/// Different privilege levels a logged-in user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Officer,
    Candidate,
}

impl Display for Role {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}",
            match self {
                Self::Admin => "administrator",
                Self::Officer => "returning officer",
                Self::Candidate => "candidate",
            }
        )
    }
}

/// Whether an account may currently use the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

/// The user record cached alongside the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: ApiId,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub status: AccountStatus,
}

impl User {
    /// Officers can be switched off by an administrator; their session must
    /// then be diverted to the deactivation notice.
    pub fn is_deactivated_officer(&self) -> bool {
        self.role == Role::Officer && self.status == AccountStatus::Inactive
    }
}

/// A logged-in session, as returned by the login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}
