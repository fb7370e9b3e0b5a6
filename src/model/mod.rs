pub mod auth;
pub mod ballot;
pub mod banner;
pub mod id;
pub mod nomination;
pub mod otp;
pub mod position;
pub mod report;
pub mod session;
pub mod voter;

pub use id::ApiId;
pub use session::{AccountStatus, Role, Session, User};
