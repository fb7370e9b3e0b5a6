//! The single entry point for staff (email and password) and voters
//! (registration number).

use chrono::Utc;
use log::{info, warn};

use super::{AppContext, Error, Result};
use crate::client::ApiError;
use crate::model::auth::{looks_like_email, Credentials};
use crate::model::banner::WelcomeBanner;
use crate::model::otp::RegistrationNumber;
use crate::model::Role;
use crate::router::{Location, NavState, Route};
use crate::ui::FieldErrors;

const DEACTIVATED_MESSAGE: &str =
    "Your account has been deactivated. Please contact the election administrator.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub registration_number: String,
}

/// Which of the two ways in the visitor filled out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginMode {
    Password { email: String, password: String },
    Voter(RegistrationNumber),
}

impl LoginForm {
    /// Work out the login mode. Exactly one of the two must be complete.
    pub fn mode(&self) -> std::result::Result<LoginMode, FieldErrors> {
        let email = self.email.trim();
        let has_email = !email.is_empty();
        let has_password = !self.password.is_empty();
        let mut errors = FieldErrors::new();

        if let Ok(reg_no) = self.registration_number.parse::<RegistrationNumber>() {
            if has_email || has_password {
                errors.add(
                    "form",
                    "Enter either your email and password or your registration number, not both.",
                );
                return Err(errors);
            }
            return Ok(LoginMode::Voter(reg_no));
        }

        match (has_email, has_password) {
            (false, false) => errors.add(
                "form",
                "Enter your email and password, or your voter registration number.",
            ),
            (true, _) if !looks_like_email(email) => {
                errors.add("email", "Enter a valid email address.")
            }
            (true, false) => errors.add("password", "Password is required."),
            (false, true) => errors.add("email", "Email is required."),
            (true, true) => {
                return Ok(LoginMode::Password {
                    email: email.to_string(),
                    password: self.password.clone(),
                })
            }
        }
        Err(errors)
    }
}

/// Where a successful submission led.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Dashboard(Role),
    OtpSent(RegistrationNumber),
}

pub struct LoginPage {
    ctx: AppContext,
    pub form: LoginForm,
    pub errors: FieldErrors,
    pub error: Option<String>,
}

impl LoginPage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            form: LoginForm::default(),
            errors: FieldErrors::new(),
            error: None,
        }
    }

    pub async fn submit(&mut self) -> Result<LoginOutcome> {
        self.errors = FieldErrors::new();
        self.error = None;

        let result = match self.form.mode() {
            Ok(LoginMode::Password { email, password }) => self.log_in(email, password).await,
            Ok(LoginMode::Voter(reg_no)) => self.request_otp(reg_no).await,
            Err(errors) => {
                self.errors = errors.clone();
                Err(Error::Validation(errors))
            }
        };
        if let Err(e) = &result {
            if e.field_errors().is_none() {
                self.error = Some(e.to_string());
            }
        }
        result
    }

    async fn log_in(&mut self, email: String, password: String) -> Result<LoginOutcome> {
        let session = match self.ctx.api().login(&Credentials { email, password }).await {
            Ok(session) => session,
            Err(ApiError::Deactivated(message)) => {
                self.discard_session();
                return Err(ApiError::Deactivated(message).into());
            }
            Err(e) => return Err(e.into()),
        };

        if session.user.is_deactivated_officer() {
            warn!("Deactivated officer {} tried to log in", session.user.email);
            self.discard_session();
            return Err(ApiError::Deactivated(DEACTIVATED_MESSAGE.to_string()).into());
        }

        let role = session.user.role;
        self.ctx.session().save_session(&session)?;
        let banner = WelcomeBanner::new(format!("Welcome back, {}!", session.user.name), Utc::now());
        self.ctx.session().write_banner(&banner)?;
        info!("{} logged in as {role}", session.user.email);

        self.form.password.clear();
        self.ctx.navigator().push(Route::dashboard(role));
        Ok(LoginOutcome::Dashboard(role))
    }

    async fn request_otp(&mut self, reg_no: RegistrationNumber) -> Result<LoginOutcome> {
        self.ctx.api().request_voter_otp(&reg_no).await?;
        info!("One-time code requested for {reg_no}");
        self.ctx
            .toasts()
            .info("A one-time code has been sent to your registered contact.");
        self.ctx.navigator().push(Location::with_state(
            Route::LoginOtp,
            NavState::RegistrationNumber(reg_no.clone()),
        ));
        Ok(LoginOutcome::OtpSent(reg_no))
    }

    fn discard_session(&self) {
        if let Err(e) = self.ctx.session().clear_session() {
            warn!("Failed to discard session: {e}");
        }
    }
}
