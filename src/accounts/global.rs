//! Global account for the Pump.fun Solana Program
//!
//! The global account stores the protocol-wide configuration: who may change
//! it, where trading fees go, the reserves every new bonding curve starts
//! with, and the fee rate charged on sells.
//!
//! # Fields
//!
//! - `discriminator`: Unique identifier for the global account
//! - `initialized`: Whether the global account has been initialized
//! - `authority`: Authority pubkey that can modify settings
//! - `fee_recipient`: Account that receives fees
//! - `initial_virtual_token_reserves`: Initial virtual token reserves for price calculations
//! - `initial_virtual_sol_reserves`: Initial virtual SOL reserves for price calculations
//! - `initial_real_token_reserves`: Initial actual token reserves available for trading
//! - `token_total_supply`: Total supply of tokens
//! - `fee_basis_points`: Fee in basis points (1/100th of a percent)

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::common::discriminator::{self, Discriminator, RecordType, DISCRIMINATOR_LEN};
use crate::common::layout::{decode_record, encode, Field, FieldType, FieldValue};
use crate::error::DecodeError;

/// Represents the global configuration account for token pricing and fees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalAccount {
    /// Unique identifier for the global account
    pub discriminator: Discriminator,
    /// Whether the global account has been initialized
    pub initialized: bool,
    /// Authority that can modify global settings
    pub authority: Pubkey,
    /// Account that receives fees
    pub fee_recipient: Pubkey,
    /// Initial virtual token reserves for price calculations
    pub initial_virtual_token_reserves: u64,
    /// Initial virtual SOL reserves for price calculations
    pub initial_virtual_sol_reserves: u64,
    /// Initial actual token reserves available for trading
    pub initial_real_token_reserves: u64,
    /// Total supply of tokens
    pub token_total_supply: u64,
    /// Fee in basis points (1/100th of a percent)
    pub fee_basis_points: u64,
}

impl GlobalAccount {
    pub const LEN: usize = DISCRIMINATOR_LEN
        + 1 // initialized
        + 32 // authority
        + 32 // fee_recipient
        + 8 // initial_virtual_token_reserves
        + 8 // initial_virtual_sol_reserves
        + 8 // initial_real_token_reserves
        + 8 // token_total_supply
        + 8; // fee_basis_points

    pub const SCHEMA: &'static [Field] = &[
        Field::new("initialized", FieldType::Bool),
        Field::new("authority", FieldType::Pubkey),
        Field::new("fee_recipient", FieldType::Pubkey),
        Field::new("initial_virtual_token_reserves", FieldType::U64),
        Field::new("initial_virtual_sol_reserves", FieldType::U64),
        Field::new("initial_real_token_reserves", FieldType::U64),
        Field::new("token_total_supply", FieldType::U64),
        Field::new("fee_basis_points", FieldType::U64),
    ];

    /// Decodes the raw account data fetched from the ledger
    ///
    /// # Arguments
    /// * `buffer` - Account data, discriminator included
    ///
    /// # Returns
    /// The decoded account, or the first layout violation found
    pub fn from_buffer(buffer: &[u8]) -> Result<Self, DecodeError> {
        discriminator::require(buffer, RecordType::Global)?;
        super::check_len(buffer, Self::LEN)?;

        let mut fields = decode_record(buffer, DISCRIMINATOR_LEN, Self::SCHEMA)?.reader();
        Ok(Self {
            discriminator: RecordType::Global.discriminator(),
            initialized: fields.bool()?,
            authority: fields.pubkey()?,
            fee_recipient: fields.pubkey()?,
            initial_virtual_token_reserves: fields.u64()?,
            initial_virtual_sol_reserves: fields.u64()?,
            initial_real_token_reserves: fields.u64()?,
            token_total_supply: fields.u64()?,
            fee_basis_points: fields.u64()?,
        })
    }

    /// Wire form of the account, discriminator included
    pub fn to_bytes(&self) -> Vec<u8> {
        let values = [
            FieldValue::Bool(self.initialized),
            FieldValue::Pubkey(self.authority),
            FieldValue::Pubkey(self.fee_recipient),
            FieldValue::U64(self.initial_virtual_token_reserves),
            FieldValue::U64(self.initial_virtual_sol_reserves),
            FieldValue::U64(self.initial_real_token_reserves),
            FieldValue::U64(self.token_total_supply),
            FieldValue::U64(self.fee_basis_points),
        ];

        let mut out = Vec::with_capacity(Self::LEN);
        out.extend_from_slice(&self.discriminator);
        for value in &values {
            encode(value, &mut out);
        }
        out
    }

    /// Calculates the initial amount of tokens received for a given SOL amount
    ///
    /// # Arguments
    /// * `amount` - Amount of SOL to spend
    ///
    /// # Returns
    /// Amount of tokens that would be received
    pub fn get_initial_buy_price(&self, amount: u64) -> u64 {
        if amount == 0 {
            return 0;
        }

        let n: u128 = (self.initial_virtual_sol_reserves as u128)
            * (self.initial_virtual_token_reserves as u128);
        let i: u128 = (self.initial_virtual_sol_reserves as u128) + (amount as u128);
        let r: u128 = n / i + 1;
        let s: u128 = (self.initial_virtual_token_reserves as u128).saturating_sub(r);

        if s < (self.initial_real_token_reserves as u128) {
            s as u64
        } else {
            self.initial_real_token_reserves
        }
    }
}
