use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How old a stored banner may be and still be shown at all.
pub const MAX_AGE_SECS: i64 = 30;

/// How long a banner stays on screen once shown.
pub const DISPLAY_SECS: i64 = 10;

/// A short-lived greeting written at login and shown once on the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeBanner {
    pub message: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl WelcomeBanner {
    pub fn new(message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            message: message.into(),
            timestamp: now,
        }
    }

    /// Has this banner been sitting in storage too long to be worth showing?
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now - self.timestamp >= Duration::seconds(MAX_AGE_SECS)
    }

    /// Begin displaying the banner at `now`, unless it is stale.
    pub fn show(self, now: DateTime<Utc>) -> Option<ShownBanner> {
        (!self.is_stale(now)).then_some(ShownBanner {
            message: self.message,
            shown_at: now,
        })
    }
}

/// A banner that is on screen and will dismiss itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownBanner {
    pub message: String,
    pub shown_at: DateTime<Utc>,
}

impl ShownBanner {
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        now - self.shown_at < Duration::seconds(DISPLAY_SECS)
    }
}
