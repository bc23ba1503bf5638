//! DSO backend library.
//!
//! This crate hosts the transport around the waveform synthesizer: a small
//! HTTP/1.1 server exposing `POST /modulate`, its cross-origin policy, the
//! server configuration, and the offline `synth` command used by the `dso`
//! binary.

pub mod config;
pub mod cors;
pub mod http;
pub mod render;
pub mod server;

pub use config::ServerConfig;
pub use cors::CorsPolicy;
