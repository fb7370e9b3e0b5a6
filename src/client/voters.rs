use crate::model::{
    auth::Acknowledgement,
    otp::{Code, RegistrationNumber},
    voter::{BallotGrant, ImportSummary, OtpConfirmation, OtpRequest, Voter},
};

use super::{ApiClient, ApiRequest, Result, Upload};

impl ApiClient {
    pub async fn voters(&self) -> Result<Vec<Voter>> {
        self.get("/voters").await
    }

    /// Upload a voter roll.
    pub async fn import_voters(&self, upload: Upload) -> Result<ImportSummary> {
        self.fetch(ApiRequest::post("/voters/import").file(upload))
            .await
    }

    /// Ask the backend to send a one-time code to the voter.
    pub async fn request_voter_otp(
        &self,
        registration_number: &RegistrationNumber,
    ) -> Result<Acknowledgement> {
        let body = OtpRequest {
            registration_number: registration_number.clone(),
        };
        self.post("/voter/request-otp", &body).await
    }

    /// Trade a one-time code for a ballot token.
    pub async fn confirm_voter_otp(
        &self,
        registration_number: &RegistrationNumber,
        otp: Code,
    ) -> Result<BallotGrant> {
        let body = OtpConfirmation {
            registration_number: registration_number.clone(),
            otp,
        };
        self.post("/voter/verify-otp", &body).await
    }
}
