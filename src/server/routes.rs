use std::path::PathBuf;

use rocket::{Route, State};

use super::assets::{AcceptsGzip, Asset};
use super::error::{Error, Result};
use crate::config::ServerConfig;

pub fn routes() -> Vec<Route> {
    routes![
        api_get,
        api_post,
        api_put,
        api_patch,
        api_delete,
        bundle
    ]
}

// The backend is served elsewhere; anything under `/api` that reaches us is a miss.

#[get("/api/<_..>", rank = 1)]
fn api_get() -> Error {
    Error::NotFound
}

#[post("/api/<_..>", rank = 1)]
fn api_post() -> Error {
    Error::NotFound
}

#[put("/api/<_..>", rank = 1)]
fn api_put() -> Error {
    Error::NotFound
}

#[patch("/api/<_..>", rank = 1)]
fn api_patch() -> Error {
    Error::NotFound
}

#[delete("/api/<_..>", rank = 1)]
fn api_delete() -> Error {
    Error::NotFound
}

/// A file from the bundle, or the SPA entry document for anything else.
#[get("/<path..>", rank = 2)]
async fn bundle(path: PathBuf, config: &State<ServerConfig>, gzip: AcceptsGzip) -> Result<Asset> {
    let file = config.dist_dir().join(&path);
    if path.as_os_str().is_empty() || !file.is_file() {
        return Asset::load(&config.index_file(), gzip).await;
    }
    Asset::load(&file, gzip).await
}
