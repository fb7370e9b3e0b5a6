use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// A backend-assigned identifier.
///
/// The backend may hand out either numeric or string identifiers; we never
/// interpret them, so the original representation is preserved and echoed
/// back unchanged in request bodies.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiId {
    Number(u64),
    Text(String),
}

impl Debug for ApiId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for ApiId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for ApiId {
    fn from(id: u64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for ApiId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for ApiId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}
