//! URL paths, the pages they map to, and a browser-style history.

use std::fmt::Display;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::model::{otp::RegistrationNumber, Role};

/// Every screen of the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    LoginOtp,
    Register,
    ForgotPassword,
    ResetPassword,
    Vote,
    VoteSuccess,
    AdminDashboard,
    OfficerDashboard,
    CandidateDashboard,
    Reports,
    AccountDeactivated,
    NotFound,
}

/// Who may see a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Roles(&'static [Role]),
}

impl Route {
    /// Resolve a URL path. Trailing slashes and query strings are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');
        match path {
            "" | "/login" => Self::Login,
            // Older entry points from before the unified login page.
            "/admin/login" | "/candidate/login" | "/voter/login" => Self::Login,
            "/login/otp" | "/voter/otp" => Self::LoginOtp,
            "/register" => Self::Register,
            "/forgot-password" => Self::ForgotPassword,
            "/reset-password" => Self::ResetPassword,
            "/vote" => Self::Vote,
            "/vote/success" => Self::VoteSuccess,
            "/admin" | "/admin/dashboard" => Self::AdminDashboard,
            "/officer" | "/officer/dashboard" => Self::OfficerDashboard,
            "/candidate" | "/candidate/dashboard" => Self::CandidateDashboard,
            "/reports" => Self::Reports,
            "/account-deactivated" => Self::AccountDeactivated,
            _ => Self::NotFound,
        }
    }

    /// The canonical path for this route.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::LoginOtp => "/login/otp",
            Self::Register => "/register",
            Self::ForgotPassword => "/forgot-password",
            Self::ResetPassword => "/reset-password",
            Self::Vote => "/vote",
            Self::VoteSuccess => "/vote/success",
            Self::AdminDashboard => "/admin/dashboard",
            Self::OfficerDashboard => "/officer/dashboard",
            Self::CandidateDashboard => "/candidate/dashboard",
            Self::Reports => "/reports",
            Self::AccountDeactivated => "/account-deactivated",
            Self::NotFound => "/404",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Self::AdminDashboard => Access::Roles(&[Role::Admin]),
            Self::OfficerDashboard => Access::Roles(&[Role::Officer]),
            Self::CandidateDashboard => Access::Roles(&[Role::Candidate]),
            Self::Reports => Access::Roles(&[Role::Admin, Role::Officer]),
            _ => Access::Public,
        }
    }

    /// The landing page for a role.
    pub fn dashboard(role: Role) -> Self {
        match role {
            Role::Admin => Self::AdminDashboard,
            Role::Officer => Self::OfficerDashboard,
            Role::Candidate => Self::CandidateDashboard,
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Data carried from one page to the next, outside the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NavState {
    #[default]
    None,
    RegistrationNumber(RegistrationNumber),
    Email(String),
}

/// A route plus its navigation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub route: Route,
    pub state: NavState,
}

impl Location {
    pub fn with_state(route: Route, state: NavState) -> Self {
        Self { route, state }
    }

    pub fn registration_number(&self) -> Option<&RegistrationNumber> {
        match &self.state {
            NavState::RegistrationNumber(reg_no) => Some(reg_no),
            _ => None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match &self.state {
            NavState::Email(email) => Some(email),
            _ => None,
        }
    }
}

impl From<Route> for Location {
    fn from(route: Route) -> Self {
        Self {
            route,
            state: NavState::None,
        }
    }
}

#[derive(Debug)]
struct History {
    entries: Vec<Location>,
    scheduled: Option<(Location, DateTime<Utc>)>,
}

/// Browser-style navigation history shared by the API client and the pages.
///
/// Cloning is cheap; all clones share the same history.
#[derive(Debug, Clone)]
pub struct Navigator {
    history: Arc<Mutex<History>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::starting_at(Route::Login)
    }
}

impl Navigator {
    pub fn starting_at(location: impl Into<Location>) -> Self {
        Self {
            history: Arc::new(Mutex::new(History {
                entries: vec![location.into()],
                scheduled: None,
            })),
        }
    }

    pub fn current(&self) -> Location {
        let history = self.history.lock().unwrap();
        // There is always at least the starting entry.
        history.entries.last().cloned().unwrap_or_else(|| Route::Login.into())
    }

    /// Navigate now, cancelling any scheduled navigation.
    pub fn push(&self, location: impl Into<Location>) {
        let location = location.into();
        debug!("Navigating to {}", location.route);
        let mut history = self.history.lock().unwrap();
        history.scheduled = None;
        history.entries.push(location);
    }

    /// Navigate now, replacing the current entry.
    pub fn replace(&self, location: impl Into<Location>) {
        let location = location.into();
        debug!("Redirecting to {}", location.route);
        let mut history = self.history.lock().unwrap();
        history.scheduled = None;
        history.entries.pop();
        history.entries.push(location);
    }

    /// Navigate once `delay` has passed; applied by [`Navigator::poll`].
    pub fn schedule(&self, location: impl Into<Location>, delay: Duration) {
        let location = location.into();
        debug!("Scheduling navigation to {} in {delay}", location.route);
        self.history.lock().unwrap().scheduled = Some((location, Utc::now() + delay));
    }

    pub fn scheduled(&self) -> Option<(Location, DateTime<Utc>)> {
        self.history.lock().unwrap().scheduled.clone()
    }

    /// Apply a scheduled navigation if it is due. Returns whether one was applied.
    pub fn poll(&self, now: DateTime<Utc>) -> bool {
        let mut history = self.history.lock().unwrap();
        match history.scheduled.take() {
            Some((location, due)) if due <= now => {
                debug!("Navigating to {}", location.route);
                history.entries.push(location);
                true
            }
            still_pending => {
                history.scheduled = still_pending;
                false
            }
        }
    }

    pub fn back(&self) {
        let mut history = self.history.lock().unwrap();
        if history.entries.len() > 1 {
            history.entries.pop();
        }
    }
}
