//! vs-core: shared foundation for the virtusense signal generator.
//!
//! Contains:
//! - adc (12-bit reading range, clamp, clamped sample type)
//! - error (shared error types)

pub mod adc;
pub mod error;

pub use adc::{ADC_MAX, ADC_MIN, AdcSample, clamp_adc, ensure_range};
pub use error::{CoreError, CoreResult};
