//! A Rust client for the [Axiom] logging and analytics API.
//!
//! The crate covers dataset management, event ingestion, and user
//! identity lookup, on top of a blocking HTTP session with baked-in
//! authentication and automatic retry of transient server failures.
//!
//! ## Quick start
//! - Configure credentials via `AXIOM_TOKEN` (and, for personal tokens,
//!   `AXIOM_ORG_ID`), or pass them explicitly to [`Client::new`].
//! - Use the [`Client`]'s sub-clients to call the API.
//!
//! ```no_run
//! use axiom_client::Client;
//! use serde_json::json;
//!
//! fn main() -> Result<(), axiom_client::Error> {
//!     let client = Client::from_env()?;
//!
//!     let status = client.datasets().ingest_events(
//!         "my-dataset",
//!         &[json!({ "service": "api", "level": "error" })],
//!     )?;
//!     println!("ingested {} event(s)", status.ingested);
//!
//!     let user = client.users().current()?;
//!     println!("authenticated as {}", user.name);
//!     Ok(())
//! }
//! ```
//!
//! Failed calls surface as [`Error`]; the HTTP status and the decoded
//! server message are available via [`Error::status`] and
//! [`Error::message`].
//!
//! [Axiom]: https://axiom.co

#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
mod http;
mod util;

pub mod datasets;
pub mod users;

pub use client::{AXIOM_URL, Client};
pub use error::{ApiError, ApiErrorBody, Error, ErrorDetails, Result};
pub use http::RetryPolicy;
