use log::error;
use rocket::{http::Status, response::Responder, serde::json::Json};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found")]
    NotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    fn status(&self) -> Status {
        match self {
            Self::NotFound => Status::NotFound,
            Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound => Status::NotFound,
            Self::Io(_) => Status::InternalServerError,
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        let message = match status.code {
            404 => "Not found".to_string(),
            _ => {
                error!("{} {}: {self}", req.method(), req.uri());
                "Internal server error".to_string()
            }
        };
        (status, Json(json!({ "error": message }))).respond_to(req)
    }
}
