//! The one configured HTTP client every page talks to the backend through.

use std::sync::Arc;

use chrono::{Duration, Utc};
use log::{debug, warn};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::ClientConfig;
use crate::router::{Navigator, Route};
use crate::storage::SessionStore;

mod auth;
mod candidates;
mod error;
mod positions;
mod reports;
mod transport;
mod users;
mod voters;
mod voting;

pub use error::{ApiError, ErrorBody, ErrorCode, Result};
pub use transport::{
    ApiRequest, ApiResponse, Body, HttpTransport, Method, Transport, TransportError, Upload,
};

/// How long to leave the "session expired" message up before going to the login page.
pub const SESSION_EXPIRED_REDIRECT_MS: i64 = 1500;

/// Name of the cache-busting query parameter added to every GET.
pub const TIMESTAMP_PARAM: &str = "_t";

/// Authenticated access to the backend.
///
/// Cloning is cheap; clones share the transport, session store and navigator.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionStore,
    navigator: Navigator,
}

impl ApiClient {
    pub fn new(transport: impl Transport + 'static, session: SessionStore, navigator: Navigator) -> Self {
        Self {
            transport: Arc::new(transport),
            session,
            navigator,
        }
    }

    /// A client talking HTTP to the configured backend.
    pub fn from_config(
        config: &ClientConfig,
        session: SessionStore,
        navigator: Navigator,
    ) -> Result<Self> {
        Ok(Self::new(HttpTransport::new(config)?, session, navigator))
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Send a request, decorating it with the stored credentials and handling
    /// authentication failures centrally.
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        if let Some(token) = self.session.token() {
            request
                .headers
                .push(("Authorization".into(), format!("Bearer {token}")));
        }
        if request.method == Method::Get {
            request.query.push((
                TIMESTAMP_PARAM.into(),
                Utc::now().timestamp_millis().to_string(),
            ));
        }

        let method = request.method;
        let path = request.path.clone();
        debug!("-> {} {path}", method.as_str());
        let response = self.transport.send(request).await.map_err(|e| {
            warn!("{} {path} failed: {e}", method.as_str());
            e
        })?;
        debug!("<- {} {} {path}", response.status, method.as_str());

        if response.is_success() {
            return Ok(response);
        }
        let body: ErrorBody = serde_json::from_slice(&response.body).unwrap_or_default();
        warn!(
            "{} {path} returned {}: {}",
            method.as_str(),
            response.status,
            body.text().unwrap_or("no message")
        );
        Err(self.failure(response.status, body))
    }

    /// Map a failed response to an error, tearing down the session on 401s.
    fn failure(&self, status: u16, body: ErrorBody) -> ApiError {
        if status != 401 {
            return ApiError::from_status(status, body);
        }

        match body.classify(status) {
            Some(ErrorCode::AccountDeactivated) => {
                // Keep the user so the deactivation notice knows who it is talking to.
                if let Err(e) = self.session.mark_deactivated() {
                    warn!("Failed to record deactivation: {e}");
                }
                if self.session.user().is_some() {
                    self.navigator.replace(Route::AccountDeactivated);
                }
                ApiError::from_status(status, body)
            }
            Some(ErrorCode::TokenExpired | ErrorCode::TokenInvalid) => {
                self.clear_session();
                if self.navigator.current().route != Route::Login {
                    self.navigator.schedule(
                        Route::Login,
                        Duration::milliseconds(SESSION_EXPIRED_REDIRECT_MS),
                    );
                }
                ApiError::SessionExpired
            }
            _ => {
                self.clear_session();
                ApiError::from_status(status, body)
            }
        }
    }

    fn clear_session(&self) {
        if let Err(e) = self.session.clear_session() {
            warn!("Failed to clear session: {e}");
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch(ApiRequest::get(path)).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.fetch(ApiRequest::post(path).json(body)?).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        self.fetch(ApiRequest::patch(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch(ApiRequest::delete(path)).await
    }

    /// Send and decode the JSON response.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.send(request).await?;
        Ok(response.json()?)
    }
}
