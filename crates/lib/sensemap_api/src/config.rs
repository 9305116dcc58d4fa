//! API server configuration.

use sensemap_core::ProxyConfig;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:5080").
    pub bind_addr: String,
    /// Upstream openSenseMap API root.
    pub upstream: ProxyConfig,
}
