//! SenseMap proxy server binary.
//!
//! Serves the local API and forwards every call to the configured
//! openSenseMap instance.

use std::time::Duration;

use clap::Parser;
use sensemap_core::{ProxyConfig, SenseMapProxy};
use tracing::info;

/// CLI arguments for the proxy server.
#[derive(Parser, Debug)]
#[command(name = "sensemap_api_server", about = "openSenseMap proxy server")]
struct Args {
    /// Interface to bind.
    #[arg(long, env = "BIND_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on (0 = ephemeral).
    #[arg(long, env = "PORT", default_value_t = 5080)]
    port: u16,

    /// Upstream openSenseMap API root (e.g. https://api.opensensemap.org).
    #[arg(long, env = "OPENSENSEMAP_BASE_URL")]
    upstream_url: String,

    /// Per-request timeout for upstream calls, in seconds. Unset = no timeout.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("info,sensemap_api=debug,sensemap_core=debug")
            }),
        )
        .init();

    let args = Args::parse();

    let upstream = ProxyConfig::new(&args.upstream_url)?;
    info!(upstream = %upstream.base_url, port = args.port, "starting sensemap_api_server");

    let mut client = reqwest::Client::builder()
        .user_agent(concat!("sensemap-proxy/", env!("CARGO_PKG_VERSION")));
    if let Some(secs) = args.request_timeout_secs {
        info!(timeout_secs = secs, "upstream request timeout enabled");
        client = client.timeout(Duration::from_secs(secs));
    }
    let proxy = SenseMapProxy::new(client.build()?, upstream.clone());

    let config = sensemap_api::config::ApiConfig {
        bind_addr: format!("{}:{}", args.host, args.port),
        upstream,
    };

    let state = sensemap_api::AppState {
        proxy,
        config: config.clone(),
    };

    let app = sensemap_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
