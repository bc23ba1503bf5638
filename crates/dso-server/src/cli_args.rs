//! CLI argument definitions for the `dso` binary.

use std::net::IpAddr;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use dso_server::config::{
    DEFAULT_HOST, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT, DEFAULT_READ_TIMEOUT,
};
use dso_server::render::RenderOutput;
use dso_server::{CorsPolicy, ServerConfig};
use dso_types::request::{
    DEFAULT_AMPLITUDE, DEFAULT_BITSTREAM, DEFAULT_FREQUENCY, DEFAULT_MAX_BITS, DEFAULT_TYPE,
};
use dso_types::{Limits, ModulateRequest, NumberOrString};

/// DSO - digital modulation waveform backend
#[derive(Parser)]
#[command(name = "dso")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Start the HTTP server exposing POST /modulate
    Serve(ServeArgs),

    /// Render one modulation request and print the result
    Synth(SynthArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value_t = DEFAULT_HOST)]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Origin allowed to call the API (repeatable; defaults to the frontend origins)
    #[arg(long = "allowed-origin", env = "DSO_ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Maximum number of bits accepted per request
    #[arg(long, default_value_t = DEFAULT_MAX_BITS)]
    pub max_bits: usize,

    /// Maximum request body size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Seconds a client has to send its full request
    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT.as_secs())]
    pub read_timeout_secs: u64,
}

impl ServeArgs {
    pub fn into_config(self) -> ServerConfig {
        let cors = if self.allowed_origins.is_empty() {
            CorsPolicy::default()
        } else {
            CorsPolicy::new(self.allowed_origins)
        };
        ServerConfig {
            host: self.host,
            port: self.port,
            cors,
            limits: Limits {
                max_bits: self.max_bits,
            },
            max_body_bytes: self.max_body_bytes,
            read_timeout: Duration::from_secs(self.read_timeout_secs),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct SynthArgs {
    /// Modulation type (ASK, FSK, PSK, PAM, PWM, PPM)
    #[arg(short = 't', long = "type", default_value = DEFAULT_TYPE)]
    pub modulation_type: String,

    /// Carrier amplitude
    #[arg(short, long, default_value_t = DEFAULT_AMPLITUDE.to_string())]
    pub amplitude: String,

    /// Carrier frequency in Hz
    #[arg(short, long, default_value_t = DEFAULT_FREQUENCY.to_string())]
    pub frequency: String,

    /// Bitstream of '0' and '1' characters
    #[arg(short, long, default_value = DEFAULT_BITSTREAM)]
    pub bitstream: String,

    /// Pretty-print the output JSON
    #[arg(short, long)]
    pub pretty: bool,

    /// Print only the BLAKE3 content hash of the four signals
    #[arg(long, conflicts_with = "pretty")]
    pub hash: bool,

    /// Maximum number of bits accepted
    #[arg(long, default_value_t = DEFAULT_MAX_BITS)]
    pub max_bits: usize,
}

impl SynthArgs {
    pub fn request(&self) -> ModulateRequest {
        ModulateRequest {
            modulation_type: self.modulation_type.clone(),
            amplitude: NumberOrString::Text(self.amplitude.clone()),
            frequency: NumberOrString::Text(self.frequency.clone()),
            bitstream: self.bitstream.clone(),
        }
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_bits: self.max_bits,
        }
    }

    pub fn output(&self) -> RenderOutput {
        if self.hash {
            RenderOutput::Hash
        } else if self.pretty {
            RenderOutput::PrettyJson
        } else {
            RenderOutput::Json
        }
    }
}
