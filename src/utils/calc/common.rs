use crate::constants::pumpfun::global_constants::{BASIS_POINTS_DENOMINATOR, MAX_FEE_BASIS_POINTS};
use crate::error::PricingError;

/// Floor of `a * b / denominator` with a 128-bit intermediate product
///
/// # Returns
/// `None` if `denominator` is zero or the quotient does not fit in a `u64`
#[inline]
pub fn mul_div_floor(a: u64, b: u64, denominator: u128) -> Option<u64> {
    let product = (a as u128) * (b as u128);
    let quotient = product.checked_div(denominator)?;
    u64::try_from(quotient).ok()
}

/// Calculate transaction fee based on amount and fee basis points
///
/// # Parameters
/// * `amount` - Transaction amount
/// * `fee_basis_points` - Fee basis points, 1 basis point = 0.01%
///
/// # Returns
/// `floor(amount * fee_basis_points / 10000)`; the program rounds fees down
///
/// # Examples
/// * fee_basis_points = 1   -> 0.01% fee
/// * fee_basis_points = 100 -> 1% fee
pub fn compute_fee(amount: u64, fee_basis_points: u64) -> Result<u64, PricingError> {
    if fee_basis_points > MAX_FEE_BASIS_POINTS {
        return Err(PricingError::InvalidFeeBasisPoints(fee_basis_points));
    }
    mul_div_floor(amount, fee_basis_points, BASIS_POINTS_DENOMINATOR as u128)
        .ok_or(PricingError::Overflow)
}

fn slippage_margin(amount: u64, basis_points: u64) -> u128 {
    (amount as u128) * (basis_points as u128) / (BASIS_POINTS_DENOMINATOR as u128)
}

/// Calculate buy amount with slippage protection
/// Add slippage percentage to the amount to ensure successful purchase
///
/// # Parameters
/// * `amount` - Quoted SOL cost
/// * `basis_points` - Slippage basis points, 1 basis point = 0.01%
///
/// # Returns
/// `amount + floor(amount * basis_points / 10000)`, the most the buyer pays
///
/// # Examples
/// * basis_points = 100 -> 1% slippage
/// * basis_points = 500 -> 5% slippage
pub fn with_slippage_buy(amount: u64, basis_points: u64) -> Result<u64, PricingError> {
    let total = (amount as u128) + slippage_margin(amount, basis_points);
    u64::try_from(total).map_err(|_| PricingError::Overflow)
}

/// Calculate sell amount with slippage protection
/// Subtract slippage percentage from the amount to ensure successful sale
///
/// # Parameters
/// * `amount` - Quoted SOL output
/// * `basis_points` - Slippage basis points, 1 basis point = 0.01%
///
/// # Returns
/// `amount - floor(amount * basis_points / 10000)`, the least the seller
/// accepts. Fails with `NegativeBound` when the margin exceeds the amount.
pub fn with_slippage_sell(amount: u64, basis_points: u64) -> Result<u64, PricingError> {
    let margin = slippage_margin(amount, basis_points);
    (amount as u128)
        .checked_sub(margin)
        .map(|bound| bound as u64)
        .ok_or(PricingError::NegativeBound { amount, slippage_basis_points: basis_points })
}
