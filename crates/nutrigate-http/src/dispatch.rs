//! Proxy handler trait and command dispatch.

use std::future::Future;
use std::pin::Pin;

use nutrigate_model::{ProxyCommand, ProxyError};

use crate::body::ProxyResponseBody;

/// Trait that the proxy business logic must implement.
///
/// The handler receives a validated command and returns a complete HTTP
/// response (normally a verbatim relay of the upstream reply). This trait is
/// the boundary between the HTTP transport layer and the signing/forwarding
/// pipeline.
pub trait ProxyHandler: Send + Sync + 'static {
    /// Handle a proxy command and produce an HTTP response.
    fn handle_command(
        &self,
        command: ProxyCommand,
    ) -> Pin<Box<dyn Future<Output = Result<http::Response<ProxyResponseBody>, ProxyError>> + Send>>;
}

/// Dispatch a proxy command to the handler.
pub async fn dispatch_command<H: ProxyHandler>(
    handler: &H,
    command: ProxyCommand,
) -> Result<http::Response<ProxyResponseBody>, ProxyError> {
    tracing::debug!(operation = %command.operation(), "dispatching proxy command");
    handler.handle_command(command).await
}
