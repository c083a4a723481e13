use crate::{
    accounts::BondingCurveAccount, error::PricingError, utils::calc::common::compute_fee,
    utils::calc::common::mul_div_floor,
};

fn ensure_tradable(curve: &BondingCurveAccount) -> Result<(), PricingError> {
    if curve.complete {
        return Err(PricingError::CurveComplete);
    }
    if curve.virtual_token_reserves == 0 || curve.virtual_sol_reserves == 0 {
        return Err(PricingError::EmptyReserves);
    }
    Ok(())
}

/// Calculates the amount of tokens that can be purchased with a given SOL amount
/// using the constant product formula.
///
/// # Arguments
/// * `curve` - Bonding curve snapshot
/// * `amount` - SOL amount to spend (in lamports)
///
/// # Returns
/// `floor(virtual_token_reserves * amount / (virtual_sol_reserves + amount))`.
/// Buys carry no fee.
pub fn get_buy_price(curve: &BondingCurveAccount, amount: u64) -> Result<u64, PricingError> {
    if curve.complete {
        return Err(PricingError::CurveComplete);
    }
    if amount == 0 {
        return Ok(0);
    }
    ensure_tradable(curve)?;

    let denominator = (curve.virtual_sol_reserves as u128) + (amount as u128);
    mul_div_floor(curve.virtual_token_reserves, amount, denominator).ok_or(PricingError::Overflow)
}

/// Calculates the amount of SOL that will be received when selling a given token amount
/// using the constant product formula with the protocol fee deducted.
///
/// # Arguments
/// * `curve` - Bonding curve snapshot
/// * `amount` - Token amount to sell (in token's smallest unit)
/// * `fee_basis_points` - Fee rate from the global account
///
/// # Returns
/// The amount of SOL that will be received after fees (in lamports)
pub fn get_sell_price(
    curve: &BondingCurveAccount,
    amount: u64,
    fee_basis_points: u64,
) -> Result<u64, PricingError> {
    if curve.complete {
        return Err(PricingError::CurveComplete);
    }
    if amount == 0 {
        return Ok(0);
    }
    ensure_tradable(curve)?;

    let denominator = (curve.virtual_token_reserves as u128) + (amount as u128);
    let sol_output = mul_div_floor(curve.virtual_sol_reserves, amount, denominator)
        .ok_or(PricingError::Overflow)?;
    let fee = compute_fee(sol_output, fee_basis_points)?;

    Ok(sol_output - fee)
}

/// Market capitalisation of the whole supply at the current virtual price
///
/// # Returns
/// `floor(token_total_supply * virtual_sol_reserves / virtual_token_reserves)`
/// in lamports, 0 for a curve without virtual token reserves
pub fn get_market_cap_sol(curve: &BondingCurveAccount) -> Result<u64, PricingError> {
    if curve.virtual_token_reserves == 0 {
        return Ok(0);
    }
    mul_div_floor(
        curve.token_total_supply,
        curve.virtual_sol_reserves,
        curve.virtual_token_reserves as u128,
    )
    .ok_or(PricingError::Overflow)
}
