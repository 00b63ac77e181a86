//! NutriGate Server - OAuth 1.0a signing proxy for the FatSecret API.
//!
//! This binary hosts the local proxy that signs and forwards nutrition-data
//! calls on behalf of the web panel and mobile app. Each inbound call is
//! validated, canonicalized, signed with a fresh nonce/timestamp pair, and
//! relayed to the provider; the provider's reply comes back verbatim.
//!
//! # Usage
//!
//! ```text
//! FATSECRET_CONSUMER_KEY=... FATSECRET_CONSUMER_SECRET=... nutrigate-server
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FATSECRET_CONSUMER_KEY` | *(required)* | OAuth consumer key |
//! | `FATSECRET_CONSUMER_SECRET` | *(required)* | OAuth consumer secret |
//! | `PROXY_LISTEN` | `0.0.0.0:8787` | Bind address |
//! | `FATSECRET_API_URL` | platform endpoint | Upstream endpoint override |
//! | `UPSTREAM_TIMEOUT_SECS` | `30` | Upstream request timeout |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use nutrigate_core::{FatSecretProxy, ProxyConfig};
use nutrigate_http::ProxyHttpService;

/// Server version reported in startup logs.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Run the accept loop, serving connections until a shutdown signal is received.
async fn serve(listener: TcpListener, service: ProxyHttpService<FatSecretProxy>) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, draining connections");
    };

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    // Wait for in-flight requests to complete.
    graceful.shutdown().await;
    info!("all connections drained, exiting");

    Ok(())
}

/// Perform a health check by connecting to the listener and requesting the
/// health endpoint.
///
/// Exits with code 0 if the response is 200 OK and reports a running
/// service, 1 otherwise.
async fn run_health_check(addr: &str) -> Result<()> {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("cannot connect to {addr}"))?;

    let (mut reader, mut writer) = stream.into_split();

    let request = format!("GET /health HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    writer.write_all(request.as_bytes()).await?;
    writer.shutdown().await?;

    let mut response = String::new();
    reader.read_to_string(&mut response).await?;

    if response.contains("200 OK") && response.contains("\"running\"") {
        Ok(())
    } else {
        anyhow::bail!("unhealthy response from {addr}")
    }
}

/// The loopback address the `--health-check` flag should probe.
fn health_check_addr() -> String {
    std::env::var("PROXY_LISTEN")
        .unwrap_or_else(|_| ProxyConfig::DEFAULT_LISTEN.to_owned())
        .replace("0.0.0.0", "127.0.0.1")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --health-check flag for Docker HEALTHCHECK.
    if std::env::args().any(|a| a == "--health-check") {
        let healthy = run_health_check(&health_check_addr()).await.is_ok();
        std::process::exit(i32::from(!healthy));
    }

    // Credentials are validated here; the listener never binds with a
    // key/secret it cannot sign with.
    let config = ProxyConfig::from_env().context("invalid proxy configuration")?;
    init_tracing(&config.log_level)?;

    let proxy = FatSecretProxy::new(&config).context("failed to initialize proxy")?;
    let service = ProxyHttpService::new(Arc::new(proxy));

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(
        %addr,
        upstream = %config.upstream_url,
        upstream_timeout_secs = config.upstream_timeout.as_secs(),
        version = VERSION,
        "starting NutriGate proxy",
    );

    serve(listener, service).await
}
