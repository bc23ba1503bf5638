//! DSO Waveform Synthesizer
//!
//! This crate turns validated modulation parameters into four co-indexed
//! sample sequences for plotting:
//!
//! - **time** - seconds, evenly spaced over `[0, N)` at 1000 samples per second
//! - **digital** - the bitstream as a step signal
//! - **carrier** - `amplitude * sin(2 * pi * frequency * t)`
//! - **modulated** - the carrier or a pulse train shaped per bit by one of six schemes
//!
//! # Determinism
//!
//! Synthesis is a pure function of its inputs. The same parameters always
//! produce bit-identical output, which [`WaveformSet::content_hash`] makes easy
//! to check.
//!
//! # Example
//!
//! ```
//! use dso_types::{Limits, ModulateRequest};
//! use dso_synth::synthesize;
//!
//! let params = ModulateRequest::default().into_params(&Limits::default()).unwrap();
//! let waves = synthesize(&params).unwrap();
//!
//! assert_eq!(waves.len(), 8 * 1000);
//! assert_eq!(waves.time.len(), waves.modulated.len());
//! ```
//!
//! # Crate Structure
//!
//! - [`synthesize()`] - Main entry point
//! - [`timebase`] - Sampling constants and the time axis
//! - [`signals`] - Digital step and carrier builders
//! - [`modulation`] - Per-sample rules for keying and pulse schemes
//! - [`waveform`] - The output record and its content hash

pub mod error;
pub mod generate;
pub mod modulation;
pub mod signals;
pub mod timebase;
pub mod waveform;

pub use error::{SynthError, SynthResult};
pub use generate::synthesize;
pub use timebase::Timebase;
pub use waveform::WaveformSet;
