//! Bonding curve account for the Pump.fun Solana Program
//!
//! One bonding curve exists per mint. Its virtual reserves drive the
//! constant-product price; once `complete` is set the token has graduated and
//! the curve no longer trades.

use serde::{Deserialize, Serialize};

use crate::common::discriminator::{self, Discriminator, RecordType, DISCRIMINATOR_LEN};
use crate::common::layout::{decode_record, encode, Field, FieldType, FieldValue};
use crate::error::{DecodeError, PricingError};
use crate::utils::calc;

/// Represents a bonding curve for token pricing and liquidity management
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondingCurveAccount {
    /// Unique identifier for the bonding curve
    pub discriminator: Discriminator,
    /// Virtual token reserves used for price calculations
    pub virtual_token_reserves: u64,
    /// Virtual SOL reserves used for price calculations
    pub virtual_sol_reserves: u64,
    /// Actual token reserves available for trading
    pub real_token_reserves: u64,
    /// Actual SOL reserves available for trading
    pub real_sol_reserves: u64,
    /// Total supply of tokens
    pub token_total_supply: u64,
    /// Whether the bonding curve is complete/finalized
    pub complete: bool,
}

impl BondingCurveAccount {
    pub const LEN: usize = DISCRIMINATOR_LEN
        + 8 // virtual_token_reserves
        + 8 // virtual_sol_reserves
        + 8 // real_token_reserves
        + 8 // real_sol_reserves
        + 8 // token_total_supply
        + 1; // complete

    pub const SCHEMA: &'static [Field] = &[
        Field::new("virtual_token_reserves", FieldType::U64),
        Field::new("virtual_sol_reserves", FieldType::U64),
        Field::new("real_token_reserves", FieldType::U64),
        Field::new("real_sol_reserves", FieldType::U64),
        Field::new("token_total_supply", FieldType::U64),
        Field::new("complete", FieldType::Bool),
    ];

    pub fn from_buffer(buffer: &[u8]) -> Result<Self, DecodeError> {
        discriminator::require(buffer, RecordType::BondingCurve)?;
        super::check_len(buffer, Self::LEN)?;

        let mut fields = decode_record(buffer, DISCRIMINATOR_LEN, Self::SCHEMA)?.reader();
        Ok(Self {
            discriminator: RecordType::BondingCurve.discriminator(),
            virtual_token_reserves: fields.u64()?,
            virtual_sol_reserves: fields.u64()?,
            real_token_reserves: fields.u64()?,
            real_sol_reserves: fields.u64()?,
            token_total_supply: fields.u64()?,
            complete: fields.bool()?,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let values = [
            FieldValue::U64(self.virtual_token_reserves),
            FieldValue::U64(self.virtual_sol_reserves),
            FieldValue::U64(self.real_token_reserves),
            FieldValue::U64(self.real_sol_reserves),
            FieldValue::U64(self.token_total_supply),
            FieldValue::Bool(self.complete),
        ];

        let mut out = Vec::with_capacity(Self::LEN);
        out.extend_from_slice(&self.discriminator);
        for value in &values {
            encode(value, &mut out);
        }
        out
    }

    /// Whether the curve still accepts trades
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.complete
    }

    /// Tokens received for `amount` lamports, see [`calc::pumpfun::get_buy_price`]
    #[inline]
    pub fn get_buy_price(&self, amount: u64) -> Result<u64, PricingError> {
        calc::pumpfun::get_buy_price(self, amount)
    }

    /// Lamports received for `amount` tokens, see [`calc::pumpfun::get_sell_price`]
    #[inline]
    pub fn get_sell_price(&self, amount: u64, fee_basis_points: u64) -> Result<u64, PricingError> {
        calc::pumpfun::get_sell_price(self, amount, fee_basis_points)
    }

    #[inline]
    pub fn get_market_cap_sol(&self) -> Result<u64, PricingError> {
        calc::pumpfun::get_market_cap_sol(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::layout::schema_width;

    fn hand_built(complete: u8) -> Vec<u8> {
        let mut data = vec![23, 183, 248, 55, 96, 216, 172, 96];
        for value in
            [1_000_000_000_000u64, 30_000_000_000, 793_100_000_000_000, 0, 1_000_000_000_000_000]
        {
            data.extend_from_slice(&value.to_le_bytes());
        }
        data.push(complete);
        data
    }

    #[test]
    fn test_len_matches_schema() {
        assert_eq!(BondingCurveAccount::LEN, 49);
        assert_eq!(
            Some(BondingCurveAccount::LEN),
            schema_width(BondingCurveAccount::SCHEMA).map(|w| w + DISCRIMINATOR_LEN)
        );
    }

    #[test]
    fn test_from_buffer_hand_built() {
        let curve = BondingCurveAccount::from_buffer(&hand_built(0)).unwrap();
        assert_eq!(curve.virtual_token_reserves, 1_000_000_000_000);
        assert_eq!(curve.virtual_sol_reserves, 30_000_000_000);
        assert_eq!(curve.real_token_reserves, 793_100_000_000_000);
        assert_eq!(curve.real_sol_reserves, 0);
        assert_eq!(curve.token_total_supply, 1_000_000_000_000_000);
        assert!(!curve.complete);
        assert!(curve.is_active());

        // any nonzero byte reads as true
        let curve = BondingCurveAccount::from_buffer(&hand_built(2)).unwrap();
        assert!(curve.complete);
    }

    #[test]
    fn test_round_trip() {
        let curve = BondingCurveAccount::from_buffer(&hand_built(1)).unwrap();
        let bytes = curve.to_bytes();
        assert_eq!(bytes, hand_built(1));
        assert_eq!(BondingCurveAccount::from_buffer(&bytes).unwrap(), curve);
    }

    #[test]
    fn test_discriminator_gate_ignores_body() {
        for body_byte in [0u8, 1, 0xff] {
            let mut data = vec![body_byte; BondingCurveAccount::LEN];
            data[..8].copy_from_slice(&RecordType::Global.discriminator());
            assert!(matches!(
                BondingCurveAccount::from_buffer(&data),
                Err(DecodeError::DiscriminatorMismatch { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_truncated_buffer() {
        let data = hand_built(0);
        assert_eq!(
            BondingCurveAccount::from_buffer(&data[..48]),
            Err(DecodeError::TooShort { expected: 49, actual: 48 })
        );
        assert_eq!(
            BondingCurveAccount::from_buffer(&data[..4]),
            Err(DecodeError::TooShort { expected: 8, actual: 4 })
        );
    }
}
