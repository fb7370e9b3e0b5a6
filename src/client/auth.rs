use crate::model::{
    auth::{Acknowledgement, Credentials, ForgotPassword, PasswordReset, Registration},
    Session,
};

use super::{ApiClient, Result};

impl ApiClient {
    /// Exchange credentials for a session. The caller decides whether to store it.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        self.post("/auth/login", credentials).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<Acknowledgement> {
        self.post("/auth/register", registration).await
    }

    /// Ask for a password reset code to be sent.
    pub async fn forgot_password(&self, email: &str) -> Result<Acknowledgement> {
        let body = ForgotPassword {
            email: email.trim().to_string(),
        };
        self.post("/auth/forgot-password", &body).await
    }

    pub async fn reset_password(&self, reset: &PasswordReset) -> Result<Acknowledgement> {
        self.post("/auth/reset-password", reset).await
    }
}
