//! # Nfield Client Library
//!
//! Authenticated access to the Nfield survey API. Callers hand in loosely
//! shaped parameters; the client checks them against a per-operation schema,
//! keeps the bearer token fresh and sends the request.
//!
//! Modules:
//! - `params` — parameter schemas, the normalizer, typed request records
//! - `operations` — the operation catalog and path templating
//! - `cache` — the session token and its single-flight refresh
//! - `auth` — credentials and the sign-in exchange
//! - `dispatch` — authenticated dispatch and the background refresher
//! - `transport` — the HTTP seam and its reqwest implementation
//! - `client` — `NfieldClient` / `ConnectedClient`

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod observability;
pub mod operations;
pub mod params;
pub mod transport;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::auth::Credentials;
pub use crate::client::{ConnectedClient, NfieldClient};
pub use crate::config::{ClientSettings, SettingsOverrides};
pub use crate::error::{NfieldError, Result};
pub use crate::operations::Operation;
pub use crate::params::records;
pub use crate::transport::{HttpTransport, RequestDescriptor, Transport, TransportResponse};
