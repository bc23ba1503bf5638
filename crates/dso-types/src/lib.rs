//! DSO Request Model
//!
//! This crate provides the parameter types, parsing, and validation for DSO
//! modulation requests. A request names a modulation scheme, a carrier
//! amplitude and frequency, and a bitstream; once validated it becomes a
//! [`ModulateParams`] that the synthesizer consumes.
//!
//! # Example
//!
//! ```
//! use dso_types::{Limits, ModulateRequest, ModulationType};
//!
//! let request: ModulateRequest = serde_json::from_str(
//!     r#"{"type": "PSK", "amplitude": 2, "frequency": "4", "bitstream": "1011"}"#,
//! ).unwrap();
//!
//! let params = request.into_params(&Limits::default()).unwrap();
//! assert_eq!(params.modulation, ModulationType::Psk);
//! assert_eq!(params.bits.len(), 4);
//! ```
//!
//! # Modules
//!
//! - [`bits`]: Bit and bit sequence types
//! - [`error`]: Error codes and error types
//! - [`modulation`]: The closed set of supported modulation schemes
//! - [`request`]: Wire request shape, defaults, and validation

pub mod bits;
pub mod error;
pub mod modulation;
pub mod request;

pub use bits::{Bit, BitSequence};
pub use error::{ErrorCode, RequestError, RequestResult, ValidationError};
pub use modulation::ModulationType;
pub use request::{Limits, ModulateParams, ModulateRequest, NumberOrString};
