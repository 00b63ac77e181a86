//! Business core of the NutriGate proxy.
//!
//! Ties the pieces together into the per-request pipeline:
//!
//! ```text
//! ProxyCommand -> application params -> fresh protocol params
//!   -> canonical string -> base string -> signature
//!   -> form body -> upstream POST -> verbatim relay
//! ```
//!
//! plus the process configuration loaded once at startup.

pub mod config;
pub mod forwarder;
pub mod handler;
pub mod request;

pub use config::{ConfigError, ProxyConfig};
pub use forwarder::{UpstreamForwarder, UpstreamResponse};
pub use handler::FatSecretProxy;
