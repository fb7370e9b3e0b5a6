//! The static file server that ships the built front end bundle.

use rocket::{
    figment::{providers::Env, Figment},
    Build, Rocket,
};

use crate::config::ConfigFairing;
use crate::logging::LoggerFairing;

pub mod assets;
pub mod error;
mod routes;

pub use error::{Error, Result};

/// Rocket's usual configuration sources, plus a bare `PORT` variable as set by
/// most hosting platforms.
pub fn figment() -> Figment {
    rocket::Config::figment().merge(Env::raw().only(&["port"]))
}

pub fn build() -> Rocket<Build> {
    build_from(figment())
}

pub fn build_from(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .mount("/", routes::routes())
        .attach(ConfigFairing)
        .attach(LoggerFairing)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::config::ServerConfig;

    #[test]
    fn port_from_environment() {
        // Local clients never bind, so other tests don't care about the port.
        std::env::set_var("PORT", "8080");
        let port: u16 = figment().extract_inner("port").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn dist_dir() {
        let config: ServerConfig = figment().extract().unwrap();
        assert_eq!(config.dist_dir(), Path::new("dist"));

        let config: ServerConfig = figment().merge(("dist_dir", "public")).extract().unwrap();
        assert_eq!(config.dist_dir(), Path::new("public"));
        assert_eq!(config.index_file(), Path::new("public/index.html"));
    }
}
