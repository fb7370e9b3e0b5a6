use crate::model::{
    auth::{Acknowledgement, NewOfficer, StatusChange},
    AccountStatus, ApiId, User,
};

use super::{ApiClient, ApiRequest, Result};

impl ApiClient {
    /// Returning officer accounts, for the administrator.
    pub async fn officers(&self) -> Result<Vec<User>> {
        self.fetch(ApiRequest::get("/users").query("role", "OFFICER"))
            .await
    }

    pub async fn create_officer(&self, officer: &NewOfficer) -> Result<User> {
        self.post("/users", officer).await
    }

    pub async fn set_user_status(&self, id: &ApiId, status: AccountStatus) -> Result<Acknowledgement> {
        self.patch(&format!("/users/{id}/status"), &StatusChange { status })
            .await
    }
}
