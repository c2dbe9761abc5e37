//! `pay-service-client` is the resilient HTTP client the payments portal uses
//! to reach its downstream services.
//!
//! - [`ServiceClient`] wraps one named service: it normalizes failures into
//!   [`ClientError`], retries requests whose connection was reset, and reports
//!   every attempt to configurable [`Hooks`].
//! - [`LedgerClient`] and [`ConnectorClient`] are typed clients built on it.
//! - [`credentials`] picks the active and switching credentials of a
//!   gateway account.

mod client;
mod error;
mod hooks;
mod options;
mod types;
mod wire;

pub mod connector;
pub mod credentials;
pub mod ledger;

pub use client::{join_url, ServiceClient, CORRELATION_HEADER};
pub use connector::ConnectorClient;
pub use error::ClientError;
pub use hooks::{FailureMetadata, Hooks, RequestMetadata, SuccessMetadata};
pub use ledger::LedgerClient;
pub use options::ClientOptions;
pub use reqwest::Method;
pub use types::{ClientResponse, RequestOptions};

pub type Result<T> = std::result::Result<T, ClientError>;
