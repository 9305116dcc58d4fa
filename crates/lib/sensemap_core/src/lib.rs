//! # sensemap_core
//!
//! Client-side adapter for the openSenseMap REST API.
//!
//! [`SenseMapProxy`] turns the local data-transfer types in [`models`] into
//! upstream calls and maps upstream outcomes back into [`ProxyResult`]s.

pub mod config;
pub mod error;
pub mod models;
pub mod proxy;

pub use config::{ConfigError, ProxyConfig};
pub use error::{ProxyError, ProxyResult};
pub use proxy::SenseMapProxy;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
