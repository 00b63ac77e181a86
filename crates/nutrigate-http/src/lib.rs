//! HTTP ingress layer for the NutriGate proxy.
//!
//! Request flow:
//!
//! ```text
//! hyper connection
//!   -> ProxyHttpService (one task per connection)
//!     -> CORS preflight / health interception
//!     -> resolve_route (path + method)
//!     -> collect body, parse ProxyCommand
//!     -> ProxyHandler (business logic boundary)
//!   <- response with CORS headers + request ID
//! ```
//!
//! The crate owns everything HTTP-shaped: routing, body buffering, response
//! serialization, CORS. Signing and forwarding live behind the
//! [`dispatch::ProxyHandler`] trait.

pub mod body;
pub mod dispatch;
pub mod response;
pub mod router;
pub mod service;

pub use body::ProxyResponseBody;
pub use dispatch::ProxyHandler;
pub use router::{PROXY_PATH, Route, resolve_route};
pub use service::ProxyHttpService;
