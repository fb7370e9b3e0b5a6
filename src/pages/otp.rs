use log::info;

use super::{AppContext, Error, Result};
use crate::client::ApiError;
use crate::model::otp::{Code, CodeParseError, RegistrationNumber};
use crate::router::Route;

/// Second step of voter entry: confirm the one-time code.
pub struct OtpPage {
    ctx: AppContext,
    registration_number: RegistrationNumber,
    pub code: String,
    pub error: Option<String>,
    /// Seconds the backend asked us to wait before resending.
    pub retry_after: Option<u64>,
}

impl OtpPage {
    /// Open the page for the registration number carried in navigation state.
    /// Without one there is nothing to confirm, so the visitor goes back to login.
    pub fn open(ctx: AppContext) -> Option<Self> {
        let Some(registration_number) = ctx.navigator().current().registration_number().cloned()
        else {
            ctx.navigator().replace(Route::Login);
            return None;
        };
        Some(Self {
            ctx,
            registration_number,
            code: String::new(),
            error: None,
            retry_after: None,
        })
    }

    pub fn registration_number(&self) -> &RegistrationNumber {
        &self.registration_number
    }

    /// Exchange the code for a ballot token and go to the ballot.
    pub async fn submit(&mut self) -> Result<()> {
        self.error = None;
        let code: Code = self
            .code
            .parse()
            .map_err(|e: CodeParseError| Error::invalid("otp", e.to_string()))?;

        let grant = match self
            .ctx
            .api()
            .confirm_voter_otp(&self.registration_number, code)
            .await
        {
            Ok(grant) => grant,
            Err(e) => {
                self.error = Some(e.to_string());
                return Err(e.into());
            }
        };
        self.ctx.session().set_ballot_token(&grant.ballot_token)?;
        info!("Ballot token issued for {}", self.registration_number);
        self.code.clear();
        self.ctx.navigator().push(Route::Vote);
        Ok(())
    }

    /// Ask for a fresh code.
    pub async fn resend(&mut self) -> Result<()> {
        self.error = None;
        match self.ctx.api().request_voter_otp(&self.registration_number).await {
            Ok(_) => {
                self.retry_after = None;
                self.ctx.toasts().info("A new code has been sent.");
                Ok(())
            }
            Err(e) => {
                if let ApiError::RateLimited { retry_after, .. } = &e {
                    self.retry_after = *retry_after;
                }
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }
}
