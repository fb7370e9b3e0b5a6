use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::model::{
    banner::{ShownBanner, WelcomeBanner},
    AccountStatus, Session, User,
};

use super::{Result, Storage};

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";
const BALLOT_TOKEN_KEY: &str = "ballotToken";
const WELCOME_KEY: &str = "welcomeMessage";

/// Typed access to everything the front end keeps in local storage.
///
/// Cloning is cheap; all clones share the same underlying storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    /// The stored bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.storage.get_item(TOKEN_KEY)
    }

    /// The cached user record.
    ///
    /// A record that cannot be decoded is treated as absent, and wipes storage
    /// so the next login starts clean.
    pub fn user(&self) -> Option<User> {
        let raw = self.storage.get_item(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding malformed stored user: {e}");
                if let Err(e) = self.storage.clear() {
                    warn!("Failed to clear storage: {e}");
                }
                None
            }
        }
    }

    /// The full session: only present when both token and user are.
    pub fn session(&self) -> Option<Session> {
        let user = self.user()?;
        let token = self.token()?;
        Some(Session { token, user })
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        self.storage.set_item(TOKEN_KEY, session.token.clone())?;
        self.storage
            .set_item(USER_KEY, serde_json::to_string(&session.user)?)?;
        debug!("Stored session for {}", session.user.email);
        Ok(())
    }

    /// Forget the bearer token but keep the user record, so a page can still
    /// say who was signed out and why.
    pub fn clear_token(&self) -> Result<()> {
        self.storage.remove_item(TOKEN_KEY)
    }

    /// Drop the token and flag the cached user as inactive, so the route guard
    /// diverts them to the deactivation notice until the session is cleared.
    pub fn mark_deactivated(&self) -> Result<()> {
        self.clear_token()?;
        if let Some(mut user) = self.user() {
            user.status = AccountStatus::Inactive;
            self.storage.set_item(USER_KEY, serde_json::to_string(&user)?)?;
        }
        Ok(())
    }

    pub fn clear_session(&self) -> Result<()> {
        self.storage.remove_item(TOKEN_KEY)?;
        self.storage.remove_item(USER_KEY)
    }

    pub fn ballot_token(&self) -> Option<String> {
        self.storage.get_item(BALLOT_TOKEN_KEY)
    }

    pub fn set_ballot_token(&self, token: &str) -> Result<()> {
        self.storage.set_item(BALLOT_TOKEN_KEY, token.to_string())
    }

    pub fn clear_ballot_token(&self) -> Result<()> {
        self.storage.remove_item(BALLOT_TOKEN_KEY)
    }

    pub fn write_banner(&self, banner: &WelcomeBanner) -> Result<()> {
        self.storage
            .set_item(WELCOME_KEY, serde_json::to_string(banner)?)
    }

    /// Consume the stored banner, returning it for display if it is still fresh.
    pub fn take_banner(&self, now: DateTime<Utc>) -> Result<Option<ShownBanner>> {
        let Some(raw) = self.storage.get_item(WELCOME_KEY) else {
            return Ok(None);
        };
        self.storage.remove_item(WELCOME_KEY)?;
        Ok(serde_json::from_str::<WelcomeBanner>(&raw)
            .ok()
            .and_then(|banner| banner.show(now)))
    }

    /// Logout: everything goes.
    pub fn clear_all(&self) -> Result<()> {
        self.storage.clear()
    }
}
