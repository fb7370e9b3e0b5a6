//! Forgotten password: request a code by email, then set a new password with it.

use log::info;

use super::register::check_password;
use super::{AppContext, Error, Result};
use crate::model::auth::{looks_like_email, PasswordReset};
use crate::model::otp::Code;
use crate::router::{Location, NavState, Route};
use crate::ui::FieldErrors;

pub struct ForgotPasswordPage {
    ctx: AppContext,
    pub email: String,
    pub errors: FieldErrors,
}

impl ForgotPasswordPage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            email: String::new(),
            errors: FieldErrors::new(),
        }
    }

    pub async fn submit(&mut self) -> Result<()> {
        let email = self.email.trim().to_string();
        self.errors = FieldErrors::new();
        if !looks_like_email(&email) {
            self.errors.add("email", "Enter a valid email address.");
            return Err(Error::Validation(self.errors.clone()));
        }

        if let Err(e) = self.ctx.api().forgot_password(&email).await {
            let error = Error::from(e);
            self.ctx.report(&error);
            return Err(error);
        }
        info!("Password reset code requested for {email}");
        self.ctx
            .toasts()
            .info("If that account exists, a reset code is on its way.");
        self.ctx
            .navigator()
            .push(Location::with_state(Route::ResetPassword, NavState::Email(email)));
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResetForm {
    pub email: String,
    pub code: String,
    pub password: String,
    pub confirm_password: String,
}

impl ResetForm {
    pub fn validate(&self) -> std::result::Result<PasswordReset, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = self.email.trim();
        if !looks_like_email(email) {
            errors.add("email", "Enter a valid email address.");
        }
        check_password(&mut errors, &self.password, &self.confirm_password);

        match self.code.parse::<Code>() {
            Ok(otp) if errors.is_empty() => Ok(PasswordReset {
                email: email.to_string(),
                otp,
                new_password: self.password.clone(),
            }),
            Ok(_) => Err(errors),
            Err(e) => {
                errors.add("code", e.to_string());
                Err(errors)
            }
        }
    }
}

pub struct ResetPasswordPage {
    ctx: AppContext,
    pub form: ResetForm,
    pub errors: FieldErrors,
}

impl ResetPasswordPage {
    /// The email is prefilled when arriving from the forgot-password page.
    pub fn open(ctx: AppContext) -> Self {
        let email = ctx
            .navigator()
            .current()
            .email()
            .map(str::to_string)
            .unwrap_or_default();
        Self {
            ctx,
            form: ResetForm {
                email,
                ..ResetForm::default()
            },
            errors: FieldErrors::new(),
        }
    }

    pub async fn submit(&mut self) -> Result<()> {
        let reset = self.form.validate().map_err(|errors| {
            self.errors = errors.clone();
            Error::Validation(errors)
        })?;
        self.errors = FieldErrors::new();

        if let Err(e) = self.ctx.api().reset_password(&reset).await {
            let error = Error::from(e);
            self.ctx.report(&error);
            return Err(error);
        }
        info!("Password reset for {}", reset.email);
        self.ctx
            .toasts()
            .success("Password updated. Please log in with your new password.");
        self.ctx.navigator().push(Route::Login);
        Ok(())
    }
}
