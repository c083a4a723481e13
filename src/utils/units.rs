//! Conversions between human readable amounts and on-chain base units

use crate::constants::pumpfun::global_constants::LAMPORTS_PER_SOL;

/// Converts a human readable amount to base units, e.g. `1.5` with 6
/// decimals becomes `1_500_000`
///
/// Rounds to the nearest unit so values such as `0.3 SOL` do not lose a
/// lamport to binary float representation. Negative and NaN inputs give 0.
pub fn ui_amount_to_base_units(amount: f64, decimals: u32) -> u64 {
    (amount * 10f64.powi(decimals as i32)).round() as u64
}

pub fn base_units_to_ui_amount(amount: u64, decimals: u32) -> f64 {
    amount as f64 / 10f64.powi(decimals as i32)
}

#[inline]
pub fn sol_to_lamports(sol: f64) -> u64 {
    (sol * LAMPORTS_PER_SOL as f64).round() as u64
}

#[inline]
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_amount_conversions() {
        assert_eq!(ui_amount_to_base_units(1.5, 6), 1_500_000);
        assert_eq!(ui_amount_to_base_units(-1.0, 6), 0);
        assert_eq!(base_units_to_ui_amount(1_500_000, 6), 1.5);
    }

    #[test]
    fn test_sol_conversions() {
        assert_eq!(sol_to_lamports(0.3), 300_000_000);
        assert_eq!(sol_to_lamports(1.0), LAMPORTS_PER_SOL);
        assert_eq!(lamports_to_sol(2_500_000_000), 2.5);
    }
}
