//! SPL token account and mint views
//!
//! Only the leading fields the SDK reports are decoded. Token-2022 accounts
//! append extensions after the base layout, so longer buffers are accepted.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::common::layout::{decode_record, Field, FieldType};
use crate::error::DecodeError;

/// Base SPL token account layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccount {
    pub mint: Pubkey,
    pub owner: Pubkey,
    /// Balance in base units
    pub amount: u64,
}

impl TokenAccount {
    pub const LEN: usize = 165;

    pub const SCHEMA: &'static [Field] = &[
        Field::new("mint", FieldType::Pubkey),
        Field::new("owner", FieldType::Pubkey),
        Field::new("amount", FieldType::U64),
    ];

    pub fn from_buffer(buffer: &[u8]) -> Result<Self, DecodeError> {
        if buffer.len() < Self::LEN {
            return Err(DecodeError::TooShort { expected: Self::LEN, actual: buffer.len() });
        }

        let mut fields = decode_record(buffer, 0, Self::SCHEMA)?.reader();
        Ok(Self { mint: fields.pubkey()?, owner: fields.pubkey()?, amount: fields.u64()? })
    }
}

/// Mint account: `COption<Pubkey>` authority (36), supply (8), then decimals
const MINT_DECIMALS_OFFSET: usize = 44;
pub const MINT_LEN: usize = 82;

/// Reads the decimals of an SPL mint
pub fn mint_decimals(buffer: &[u8]) -> Result<u8, DecodeError> {
    if buffer.len() < MINT_LEN {
        return Err(DecodeError::TooShort { expected: MINT_LEN, actual: buffer.len() });
    }
    Ok(buffer[MINT_DECIMALS_OFFSET])
}
