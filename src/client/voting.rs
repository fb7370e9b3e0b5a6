use crate::model::{
    auth::Acknowledgement,
    ballot::{Ballot, CastBallot},
};

use super::{ApiClient, ApiRequest, Result};

/// Header carrying the voter's ballot token.
pub const BALLOT_TOKEN_HEADER: &str = "X-Ballot-Token";

impl ApiClient {
    pub async fn ballot(&self, ballot_token: &str) -> Result<Ballot> {
        self.fetch(ApiRequest::get("/vote/ballot").header(BALLOT_TOKEN_HEADER, ballot_token))
            .await
    }

    pub async fn cast_ballot(&self, cast: &CastBallot) -> Result<Acknowledgement> {
        self.post("/vote/cast", cast).await
    }
}
