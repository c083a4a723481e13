use log::debug;
use once_cell::sync::Lazy;
use solana_sdk::pubkey::Pubkey;

use crate::{
    accounts::{BondingCurveAccount, GlobalAccount},
    common::AccountReader,
    constants::pumpfun::{accounts, seeds},
    error::{ClientError, ClientResult},
};

#[inline]
pub fn get_global_pda() -> Pubkey {
    static GLOBAL_PDA: Lazy<Pubkey> = Lazy::new(|| {
        Pubkey::find_program_address(&[seeds::GLOBAL_SEED], &accounts::PUMPFUN).0
    });
    *GLOBAL_PDA
}

#[inline]
pub fn get_bonding_curve_pda(mint: &Pubkey) -> Option<Pubkey> {
    let curve_seeds: &[&[u8]; 2] = &[seeds::BONDING_CURVE_SEED, mint.as_ref()];
    Pubkey::try_find_program_address(curve_seeds, &accounts::PUMPFUN).map(|(pda, _)| pda)
}

pub(crate) async fn fetch_existing(
    reader: &dyn AccountReader,
    address: &Pubkey,
) -> ClientResult<Vec<u8>> {
    reader
        .fetch_account_bytes(address)
        .await?
        .ok_or(ClientError::AccountNotFound(*address))
}

/// Fetches and decodes the global account
///
/// The decoder accepts exactly [`GlobalAccount::LEN`] bytes. Accounts the
/// live program reallocated with trailing space fail with
/// `DecodeError::LengthMismatch`; slice the data before decoding if that
/// tail is known to be padding.
pub async fn fetch_global_account(reader: &dyn AccountReader) -> ClientResult<GlobalAccount> {
    let address = get_global_pda();
    let data = fetch_existing(reader, &address).await?;
    let global = GlobalAccount::from_buffer(&data)?;
    debug!("Global account {}: fee {} bps", address, global.fee_basis_points);
    Ok(global)
}

/// Fetches and decodes the bonding curve of `mint`
///
/// Same length rule as [`fetch_global_account`]: only
/// [`BondingCurveAccount::LEN`] bytes decode, larger allocations (newer
/// curves carry a creator field and padding) report
/// `DecodeError::LengthMismatch`.
///
/// # Returns
/// The curve together with its address
pub async fn fetch_bonding_curve_account(
    reader: &dyn AccountReader,
    mint: &Pubkey,
) -> ClientResult<(BondingCurveAccount, Pubkey)> {
    let address = get_bonding_curve_pda(mint).ok_or(ClientError::AccountNotFound(*mint))?;
    let data = fetch_existing(reader, &address).await?;
    let curve = BondingCurveAccount::from_buffer(&data)?;
    Ok((curve, address))
}
