use crate::model::{
    auth::Acknowledgement,
    nomination::{NewNomination, Nomination, NominationStatus, Rejection},
    ApiId,
};

use super::{ApiClient, ApiRequest, Result};

impl ApiClient {
    /// Every nomination in the given review state.
    pub async fn nominations(&self, status: NominationStatus) -> Result<Vec<Nomination>> {
        self.fetch(ApiRequest::get("/candidates").query("status", status.as_query()))
            .await
    }

    /// The calling candidate's own nominations.
    pub async fn my_nominations(&self) -> Result<Vec<Nomination>> {
        self.get("/candidates/my-nominations").await
    }

    pub async fn nominate(&self, nomination: &NewNomination) -> Result<Nomination> {
        self.post("/candidates/nominate", nomination).await
    }

    pub async fn approve_nomination(&self, id: &ApiId) -> Result<Acknowledgement> {
        self.patch(&format!("/candidates/{id}/approve"), &()).await
    }

    pub async fn reject_nomination(&self, id: &ApiId, reason: &str) -> Result<Acknowledgement> {
        let body = Rejection {
            reason: reason.to_string(),
        };
        self.patch(&format!("/candidates/{id}/reject"), &body).await
    }
}
