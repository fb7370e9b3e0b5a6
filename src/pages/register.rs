use log::info;

use super::{AppContext, Error, Result};
use crate::model::auth::{looks_like_email, Registration, MIN_PASSWORD_LENGTH};
use crate::router::Route;
use crate::ui::FieldErrors;

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> std::result::Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = self.name.trim();
        let email = self.email.trim();

        if name.is_empty() {
            errors.add("name", "Name is required.");
        }
        if !looks_like_email(email) {
            errors.add("email", "Enter a valid email address.");
        }
        check_password(&mut errors, &self.password, &self.confirm_password);

        errors.into_result().map(|()| Registration {
            name: name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

/// Shared by registration and password reset.
pub(crate) fn check_password(errors: &mut FieldErrors, password: &str, confirmation: &str) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters."),
        );
    }
    if password != confirmation {
        errors.add("confirm_password", "Passwords do not match.");
    }
}

/// Candidate self-registration.
pub struct RegisterPage {
    ctx: AppContext,
    pub form: RegisterForm,
    pub errors: FieldErrors,
}

impl RegisterPage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            form: RegisterForm::default(),
            errors: FieldErrors::new(),
        }
    }

    pub async fn submit(&mut self) -> Result<()> {
        let registration = self.form.validate().map_err(|errors| {
            self.errors = errors.clone();
            Error::Validation(errors)
        })?;
        self.errors = FieldErrors::new();

        if let Err(e) = self.ctx.api().register(&registration).await {
            let error = Error::from(e);
            self.ctx.report(&error);
            return Err(error);
        }
        info!("Registered {}", registration.email);
        self.ctx
            .toasts()
            .success("Registration successful. You can now log in.");
        self.ctx.navigator().push(Route::Login);
        Ok(())
    }
}
