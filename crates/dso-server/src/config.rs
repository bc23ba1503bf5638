//! Server configuration.
//!
//! A [`ServerConfig`] is built once at startup from command-line arguments and
//! environment variables, then shared read-only with every connection.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use dso_types::Limits;

use crate::cors::CorsPolicy;

/// Default listening port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 5000;

/// Default bind address.
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Default upper bound on request body size in bytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Default time allowed for a client to send its full request.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Origins allowed to call the API when none are configured.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "https://dso-one.vercel.app",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

/// Static configuration for the HTTP transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: IpAddr,
    /// Port to bind.
    pub port: u16,
    /// Cross-origin policy.
    pub cors: CorsPolicy,
    /// Request validation limits.
    pub limits: Limits,
    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
    /// Deadline for reading one request; slower clients get 408.
    pub read_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            cors: CorsPolicy::default(),
            limits: Limits::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Socket address the server binds to.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
