//! Typed views over the Pump.fun program accounts

pub mod bonding_curve;
pub mod global;
pub mod token;

pub use bonding_curve::BondingCurveAccount;
pub use global::GlobalAccount;
pub use token::{mint_decimals, TokenAccount};

use crate::error::DecodeError;

/// Account layouts have a fixed size; anything else belongs to another layout
fn check_len(buffer: &[u8], expected: usize) -> Result<(), DecodeError> {
    match buffer.len() {
        actual if actual < expected => Err(DecodeError::TooShort { expected, actual }),
        actual if actual > expected => Err(DecodeError::LengthMismatch { expected, actual }),
        _ => Ok(()),
    }
}
