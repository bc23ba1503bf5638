//! Offline rendering for the `synth` command.
//!
//! Runs one request through the same validation and synthesis path as the
//! server and prints the result to stdout.

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use dso_types::{Limits, ModulateRequest};
use dso_synth::{synthesize, WaveformSet};

/// What to print for a rendered request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutput {
    /// Compact JSON response body.
    Json,
    /// Indented JSON response body.
    PrettyJson,
    /// BLAKE3 content hash only.
    Hash,
}

/// Validates and synthesizes a request.
pub fn render(request: ModulateRequest, limits: &Limits) -> Result<WaveformSet> {
    let params = request
        .into_params(limits)
        .context("Invalid modulation request")?;
    let waves = synthesize(&params).context("Synthesis failed")?;
    Ok(waves)
}

/// Formats a waveform set for output.
pub fn format_output(waves: &WaveformSet, output: RenderOutput) -> Result<String> {
    let text = match output {
        RenderOutput::Json => serde_json::to_string(waves)?,
        RenderOutput::PrettyJson => serde_json::to_string_pretty(waves)?,
        RenderOutput::Hash => waves.content_hash(),
    };
    Ok(text)
}

/// Renders a request and writes it to stdout.
///
/// # Returns
/// Exit code: 0 on success
pub fn run(request: ModulateRequest, limits: &Limits, output: RenderOutput) -> Result<ExitCode> {
    let waves = render(request, limits)?;
    let text = format_output(&waves, output)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).context("Failed to write to stdout")?;

    Ok(ExitCode::SUCCESS)
}
