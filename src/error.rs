//! Error types for the SDK
//!
//! Decoding, pricing and event errors are kept apart so callers can tell a
//! malformed ledger blob from a quote that cannot be produced. `ClientError`
//! wraps all of them together with the collaborator failures (RPC, websocket,
//! configuration).

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::common::layout::FieldType;

/// Errors raised while turning raw bytes into typed records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("buffer too short: need {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },

    #[error("record length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("discriminator mismatch: expected {expected:?}, got {actual:?}")]
    DiscriminatorMismatch { expected: [u8; 8], actual: [u8; 8] },

    #[error("invalid utf-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("field {index} does not hold a {expected:?} value")]
    FieldType { index: usize, expected: FieldType },
}

/// Errors raised by the pricing engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("bonding curve is complete")]
    CurveComplete,

    #[error("slippage of {slippage_basis_points} bps on {amount} produces a negative bound")]
    NegativeBound { amount: u64, slippage_basis_points: u64 },

    #[error("fee basis points {0} exceed 10000")]
    InvalidFeeBasisPoints(u64),

    #[error("bonding curve has empty virtual reserves")]
    EmptyReserves,

    #[error("arithmetic overflow")]
    Overflow,
}

/// Errors raised while decoding an event payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("unknown event discriminator {0:?}")]
    UnknownVariant([u8; 8]),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Top level error returned by the client facing API
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error("account not found: {0}")]
    AccountNotFound(Pubkey),

    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("subscription error: {0}")]
    Subscription(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
