//! Floating point views of a curve, for display only. Quotes never go
//! through here.

use crate::accounts::BondingCurveAccount;
use crate::constants::pumpfun::global_constants::{LAMPORTS_PER_SOL, SCALE};

/// Spot price of one whole token in SOL, 0 when the curve holds no tokens
pub fn price_token_in_sol(virtual_sol_reserves: u64, virtual_token_reserves: u64) -> f64 {
    if virtual_token_reserves == 0 {
        return 0.0;
    }
    let sol = virtual_sol_reserves as f64 / LAMPORTS_PER_SOL as f64;
    let tokens = virtual_token_reserves as f64 / SCALE as f64;
    sol / tokens
}

#[inline]
pub fn price_token_in_sol_with_bonding_curve(curve: &BondingCurveAccount) -> f64 {
    price_token_in_sol(curve.virtual_sol_reserves, curve.virtual_token_reserves)
}

/// Relative spot price move, in basis points, caused by buying with
/// `sol_amount` lamports
///
/// # Returns
/// `None` if the buy cannot be priced (complete or empty curve)
pub fn buy_price_impact_bps(curve: &BondingCurveAccount, sol_amount: u64) -> Option<f64> {
    let before = price_token_in_sol_with_bonding_curve(curve);
    let tokens_out = curve.get_buy_price(sol_amount).ok()?;
    if before == 0.0 {
        return None;
    }
    let after = price_token_in_sol(
        curve.virtual_sol_reserves.checked_add(sol_amount)?,
        curve.virtual_token_reserves - tokens_out,
    );
    Some((after / before - 1.0) * 10_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::discriminator::RecordType;

    fn curve() -> BondingCurveAccount {
        BondingCurveAccount {
            discriminator: RecordType::BondingCurve.discriminator(),
            virtual_token_reserves: 1_073_000_000_000_000,
            virtual_sol_reserves: 30_000_000_000,
            real_token_reserves: 793_100_000_000_000,
            real_sol_reserves: 0,
            token_total_supply: 1_000_000_000_000_000,
            complete: false,
        }
    }

    #[test]
    fn test_price_token_in_sol() {
        // 30 SOL against 1.073B tokens
        let price = price_token_in_sol_with_bonding_curve(&curve());
        assert!((price - 2.795_899_347_6e-8).abs() < 1e-15);
        assert_eq!(price_token_in_sol(30_000_000_000, 0), 0.0);
    }

    #[test]
    fn test_buy_price_impact() {
        let impact = buy_price_impact_bps(&curve(), 3_000_000_000).unwrap();
        // constant product: (33/30)^2 - 1 = 21%
        assert!((impact - 2_100.0).abs() < 1.0);
        assert_eq!(buy_price_impact_bps(&curve(), 0), Some(0.0));

        let mut complete = curve();
        complete.complete = true;
        assert_eq!(buy_price_impact_bps(&complete, 1), None);
    }
}
