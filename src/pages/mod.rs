//! Screen controllers. Each page holds its transient state and drives the
//! backend and navigator; rendering is left to whoever owns the page.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{info, warn};
use thiserror::Error;

use crate::client::{ApiClient, ApiError, Upload};
use crate::config::ClientConfig;
use crate::guard::{self, Decision};
use crate::model::banner::ShownBanner;
use crate::model::report::{ExportFormat, ExportKind};
use crate::model::voter::ImportSummary;
use crate::router::{Location, Navigator, Route};
use crate::storage::{SessionStore, Storage, StorageError};
use crate::ui::{FieldErrors, Toasts};

pub mod admin;
pub mod candidate;
pub mod deactivated;
pub mod login;
pub mod officer;
pub mod otp;
pub mod password;
pub mod register;
pub mod reports;
pub mod vote;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Shown next to the offending form fields, never as a toast.
    #[error("{0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Could not access {}: {source}", .path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("This ballot has already been used. Please verify your identity again.")]
    BallotUsed,
    #[error("This ballot is no longer valid. Please verify your identity again.")]
    BallotInvalid,
    #[error("{}", voting_closed_message(.0))]
    VotingClosed(Vec<String>),
}

impl Error {
    /// A single-field validation failure.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

fn voting_closed_message(positions: &[String]) -> String {
    if positions.is_empty() {
        "Voting is not open for one or more positions on this ballot.".to_string()
    } else {
        format!("Voting is not open for: {}", positions.join(", "))
    }
}

/// Everything a page needs: the backend, the session, navigation and toasts.
///
/// Cloning is cheap and clones share state.
#[derive(Clone)]
pub struct AppContext {
    api: ApiClient,
    toasts: Toasts,
}

impl AppContext {
    pub fn new(api: ApiClient, toasts: Toasts) -> Self {
        Self { api, toasts }
    }

    /// A context talking HTTP to the configured backend, persisting to `storage`.
    pub fn from_config(config: &ClientConfig, storage: impl Storage + 'static) -> Result<Self> {
        let api = ApiClient::from_config(config, SessionStore::new(storage), Navigator::default())?;
        Ok(Self::new(api, Toasts::new()))
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &SessionStore {
        self.api.session()
    }

    pub fn navigator(&self) -> &Navigator {
        self.api.navigator()
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    /// Navigate to `location`, or wherever the route guard sends the visitor
    /// instead. Returns the route actually opened.
    pub fn open(&self, location: impl Into<Location>) -> Route {
        let location = location.into();
        match guard::check(location.route, self.session()) {
            Decision::Render => {
                let route = location.route;
                self.navigator().push(location);
                route
            }
            Decision::Redirect(route) => {
                self.navigator().replace(route);
                route
            }
        }
    }

    /// Forget the session, any ballot token and any pending banner.
    pub fn logout(&self) -> Result<()> {
        self.session().clear_all()?;
        info!("Logged out");
        self.toasts.info("You have been logged out.");
        self.navigator().push(Route::Login);
        Ok(())
    }

    /// Surface a failure as a toast. Validation errors are left to the form.
    pub fn report(&self, error: &Error) {
        if error.field_errors().is_none() {
            self.toasts.error(error.to_string());
        }
    }

    /// Report `error` and hand it back, for use in `map_err`.
    pub(crate) fn fail(&self, error: impl Into<Error>) -> Error {
        let error = error.into();
        self.report(&error);
        error
    }

    /// Consume the welcome banner, if one is waiting and still fresh.
    pub(crate) fn take_banner(&self, now: DateTime<Utc>) -> Option<ShownBanner> {
        self.session().take_banner(now).unwrap_or_else(|e| {
            warn!("Could not read welcome banner: {e}");
            None
        })
    }

    /// Upload a CSV file of voters.
    pub(crate) async fn import_voters(&self, path: &Path) -> Result<ImportSummary> {
        let bytes = rocket::tokio::fs::read(path)
            .await
            .map_err(|source| Error::File {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "voters.csv".to_string());
        let summary = self.api.import_voters(Upload::csv(file_name, bytes)).await?;
        info!("Imported {} voters, skipped {}", summary.imported, summary.skipped);
        self.toasts.success(format!(
            "Imported {} voter{} ({} skipped)",
            summary.imported,
            if summary.imported != 1 { "s" } else { "" },
            summary.skipped
        ));
        Ok(summary)
    }

    /// Download an export and save it in `dir`. Returns where it was written.
    pub(crate) async fn save_export(
        &self,
        kind: ExportKind,
        format: ExportFormat,
        dir: &Path,
    ) -> Result<PathBuf> {
        let export = self.api.export(kind, format).await?;
        let path = dir.join(&export.file_name);
        rocket::tokio::fs::write(&path, &export.bytes)
            .await
            .map_err(|source| Error::File {
                path: path.clone(),
                source,
            })?;
        info!("Saved {} export to {}", kind.slug(), path.display());
        self.toasts.success(format!("Saved {}", export.file_name));
        Ok(path)
    }
}
