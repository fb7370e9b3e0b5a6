use serde::{Deserialize, Serialize};

use super::{id::ApiId, otp::RegistrationNumber};

/// A registered voter as listed to officers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    pub id: ApiId,
    pub registration_number: RegistrationNumber,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub has_voted: bool,
}

/// Outcome of a CSV voter import.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    #[serde(default)]
    pub imported: u64,
    #[serde(default)]
    pub skipped: u64,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Body of the voter OTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequest {
    pub registration_number: RegistrationNumber,
}

/// Body of the voter OTP confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpConfirmation {
    pub registration_number: RegistrationNumber,
    pub otp: super::otp::Code,
}

/// The credential handed out after a successful OTP confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotGrant {
    pub ballot_token: String,
}
