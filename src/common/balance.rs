//! Wallet balances read through an [`AccountReader`]

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;

use crate::accounts::{mint_decimals, TokenAccount};
use crate::common::ledger::AccountReader;
use crate::error::{ClientError, ClientResult};
use crate::utils::units::{base_units_to_ui_amount, lamports_to_sol};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolBalance {
    pub owner: Pubkey,
    pub lamports: u64,
    pub sol: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub owner: Pubkey,
    pub mint: Pubkey,
    /// Associated token account the balance was read from
    pub token_account: Pubkey,
    /// Base units
    pub amount: u64,
    pub decimals: u8,
    pub ui_amount: f64,
}

pub async fn get_sol_balance(
    reader: &dyn AccountReader,
    owner: &Pubkey,
) -> ClientResult<SolBalance> {
    let lamports = reader.fetch_lamports(owner).await?;
    Ok(SolBalance { owner: *owner, lamports, sol: lamports_to_sol(lamports) })
}

/// Reads the balance of `owner`'s associated token account for `mint`
///
/// # Returns
/// The balance, zero when the associated token account does not exist yet
///
/// # Errors
/// - `AccountNotFound` if the mint does not exist
/// - `Decode` if the mint or the token account is malformed
pub async fn get_token_balance(
    reader: &dyn AccountReader,
    owner: &Pubkey,
    mint: &Pubkey,
) -> ClientResult<TokenBalance> {
    let mint_data =
        reader.fetch_account_bytes(mint).await?.ok_or(ClientError::AccountNotFound(*mint))?;
    let decimals = mint_decimals(&mint_data)?;

    let token_account = get_associated_token_address(owner, mint);
    let amount = match reader.fetch_account_bytes(&token_account).await? {
        Some(data) => TokenAccount::from_buffer(&data)?.amount,
        None => 0,
    };

    Ok(TokenBalance {
        owner: *owner,
        mint: *mint,
        token_account,
        amount,
        decimals,
        ui_amount: base_units_to_ui_amount(amount, decimals as u32),
    })
}
