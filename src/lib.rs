#[macro_use]
extern crate rocket;

pub mod client;
pub mod config;
pub mod guard;
pub mod logging;
pub mod model;
pub mod pages;
pub mod router;
pub mod server;
pub mod storage;
pub mod ui;

#[cfg(test)]
mod mock_backend;

pub use server::build;
