//! `client` crate: the HTTP transport to the demo backend.
//!
//! [`HttpDispatcher`] implements `commands::CommandDispatcher` by POSTing to
//! the backend's routes. Each route answers with the full cluster JSON.

pub mod config;
pub mod error;
pub mod http;

pub use config::ClientConfig;
pub use error::ClientError;
pub use http::{command_path, HttpDispatcher};
