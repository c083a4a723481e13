//! Trade quotes
//!
//! A quote carries everything the transaction builder needs to emit a buy or
//! sell instruction: the exact amounts, the slippage-adjusted bound and the
//! accounts the instruction references.

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::{
    accounts::{BondingCurveAccount, GlobalAccount},
    common::AccountReader,
    error::{ClientResult, PricingError},
    pumpfun::common::{fetch_bonding_curve_account, fetch_global_account},
    utils::calc::common::{with_slippage_buy, with_slippage_sell},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub side: TradeSide,
    pub mint: Pubkey,
    /// Lamports spent on a buy, tokens sold on a sell
    pub amount_in: u64,
    /// Tokens received on a buy, lamports received after fees on a sell
    pub amount_out: u64,
    /// Max SOL cost on a buy, min SOL output on a sell
    pub bound: u64,
    pub slippage_basis_points: u64,
    pub fee_recipient: Pubkey,
    pub bonding_curve: Pubkey,
}

impl Quote {
    /// Buy quote for `sol_amount` lamports against a curve snapshot
    pub fn buy(
        global: &GlobalAccount,
        curve: &BondingCurveAccount,
        mint: Pubkey,
        bonding_curve: Pubkey,
        sol_amount: u64,
        slippage_basis_points: u64,
    ) -> Result<Self, PricingError> {
        let amount_out = curve.get_buy_price(sol_amount)?;
        let bound = with_slippage_buy(sol_amount, slippage_basis_points)?;
        Ok(Self {
            side: TradeSide::Buy,
            mint,
            amount_in: sol_amount,
            amount_out,
            bound,
            slippage_basis_points,
            fee_recipient: global.fee_recipient,
            bonding_curve,
        })
    }

    /// Sell quote for `token_amount` base units against a curve snapshot
    pub fn sell(
        global: &GlobalAccount,
        curve: &BondingCurveAccount,
        mint: Pubkey,
        bonding_curve: Pubkey,
        token_amount: u64,
        slippage_basis_points: u64,
    ) -> Result<Self, PricingError> {
        let amount_out = curve.get_sell_price(token_amount, global.fee_basis_points)?;
        let bound = with_slippage_sell(amount_out, slippage_basis_points)?;
        Ok(Self {
            side: TradeSide::Sell,
            mint,
            amount_in: token_amount,
            amount_out,
            bound,
            slippage_basis_points,
            fee_recipient: global.fee_recipient,
            bonding_curve,
        })
    }
}

/// Global and curve state of one mint, read once
///
/// Quotes and display figures derived from the same snapshot agree with each
/// other even if the curve trades between reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub mint: Pubkey,
    pub bonding_curve: Pubkey,
    pub global: GlobalAccount,
    pub curve: BondingCurveAccount,
}

impl QuoteSnapshot {
    pub fn buy(&self, sol_amount: u64, slippage_basis_points: u64) -> Result<Quote, PricingError> {
        Quote::buy(
            &self.global,
            &self.curve,
            self.mint,
            self.bonding_curve,
            sol_amount,
            slippage_basis_points,
        )
    }

    pub fn sell(
        &self,
        token_amount: u64,
        slippage_basis_points: u64,
    ) -> Result<Quote, PricingError> {
        Quote::sell(
            &self.global,
            &self.curve,
            self.mint,
            self.bonding_curve,
            token_amount,
            slippage_basis_points,
        )
    }
}

/// Fetches the bonding curve of `mint` and the global account
///
/// # Errors
/// `AccountNotFound` or `Decode` for whichever account is missing or malformed
pub async fn fetch_snapshot(
    reader: &dyn AccountReader,
    mint: &Pubkey,
) -> ClientResult<QuoteSnapshot> {
    let (curve, bonding_curve) = fetch_bonding_curve_account(reader, mint).await?;
    let global = fetch_global_account(reader).await?;
    Ok(QuoteSnapshot { mint: *mint, bonding_curve, global, curve })
}

/// Fetches both accounts and quotes a buy of `sol_amount` lamports
pub async fn quote_buy(
    reader: &dyn AccountReader,
    mint: &Pubkey,
    sol_amount: u64,
    slippage_basis_points: u64,
) -> ClientResult<Quote> {
    Ok(fetch_snapshot(reader, mint).await?.buy(sol_amount, slippage_basis_points)?)
}

/// Fetches both accounts and quotes a sell of `token_amount` base units
pub async fn quote_sell(
    reader: &dyn AccountReader,
    mint: &Pubkey,
    token_amount: u64,
    slippage_basis_points: u64,
) -> ClientResult<Quote> {
    Ok(fetch_snapshot(reader, mint).await?.sell(token_amount, slippage_basis_points)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::discriminator::RecordType;
    use crate::common::MemoryAccountReader;
    use crate::error::ClientError;
    use crate::pumpfun::common::{get_bonding_curve_pda, get_global_pda};

    fn global(fee_basis_points: u64) -> GlobalAccount {
        GlobalAccount {
            discriminator: RecordType::Global.discriminator(),
            initialized: true,
            authority: Pubkey::new_unique(),
            fee_recipient: Pubkey::new_unique(),
            initial_virtual_token_reserves: 1_073_000_000_000_000,
            initial_virtual_sol_reserves: 30_000_000_000,
            initial_real_token_reserves: 793_100_000_000_000,
            token_total_supply: 1_000_000_000_000_000,
            fee_basis_points,
        }
    }

    fn curve(complete: bool) -> BondingCurveAccount {
        BondingCurveAccount {
            discriminator: RecordType::BondingCurve.discriminator(),
            virtual_token_reserves: 1_000_000_000_000,
            virtual_sol_reserves: 30_000_000_000,
            real_token_reserves: 793_100_000_000_000,
            real_sol_reserves: 0,
            token_total_supply: 1_000_000_000_000_000,
            complete,
        }
    }

    fn ledger(
        global: &GlobalAccount,
        curve: &BondingCurveAccount,
        mint: &Pubkey,
    ) -> MemoryAccountReader {
        let reader = MemoryAccountReader::new();
        reader.insert(get_global_pda(), global.to_bytes());
        if let Some(address) = get_bonding_curve_pda(mint) {
            reader.insert(address, curve.to_bytes());
        }
        reader
    }

    #[tokio::test]
    async fn test_quote_buy() {
        let mint = Pubkey::new_unique();
        let global = global(100);
        let reader = ledger(&global, &curve(false), &mint);

        let quote = quote_buy(&reader, &mint, 1_000_000_000, 500).await.unwrap();
        assert_eq!(quote.side, TradeSide::Buy);
        assert_eq!(quote.amount_in, 1_000_000_000);
        assert_eq!(quote.amount_out, 32_258_064_516);
        assert_eq!(quote.bound, 1_050_000_000);
        assert_eq!(quote.fee_recipient, global.fee_recipient);
        assert_eq!(Some(quote.bonding_curve), get_bonding_curve_pda(&mint));
    }

    #[tokio::test]
    async fn test_quote_sell_uses_global_fee() {
        let mint = Pubkey::new_unique();
        let reader = ledger(&global(100), &curve(false), &mint);

        let quote = quote_sell(&reader, &mint, 32_258_064_516, 500).await.unwrap();
        assert_eq!(quote.side, TradeSide::Sell);
        assert_eq!(quote.amount_out, 928_125_000);
        // 928_125_000 - floor(928_125_000 * 500 / 10000)
        assert_eq!(quote.bound, 881_718_750);
    }

    #[tokio::test]
    async fn test_quote_rejects_complete_curve() {
        let mint = Pubkey::new_unique();
        let reader = ledger(&global(100), &curve(true), &mint);

        assert!(matches!(
            quote_buy(&reader, &mint, 1_000, 500).await,
            Err(ClientError::Pricing(PricingError::CurveComplete))
        ));
        assert!(matches!(
            quote_sell(&reader, &mint, 1_000, 500).await,
            Err(ClientError::Pricing(PricingError::CurveComplete))
        ));
    }

    #[tokio::test]
    async fn test_quote_requires_global_account() {
        let mint = Pubkey::new_unique();
        let reader = ledger(&global(100), &curve(false), &mint);
        reader.remove(&get_global_pda());

        match quote_buy(&reader, &mint, 1_000, 500).await {
            Err(ClientError::AccountNotFound(address)) => assert_eq!(address, get_global_pda()),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_snapshot_is_stable_across_ledger_updates() {
        let mint = Pubkey::new_unique();
        let reader = ledger(&global(100), &curve(false), &mint);
        let snapshot = fetch_snapshot(&reader, &mint).await.unwrap();

        let mut traded = curve(false);
        traded.virtual_sol_reserves = 60_000_000_000;
        reader.insert(snapshot.bonding_curve, traded.to_bytes());

        let quote = snapshot.buy(1_000_000_000, 500).unwrap();
        assert_eq!(quote.amount_out, 32_258_064_516);
        assert_eq!(snapshot.sell(32_258_064_516, 500).unwrap().amount_out, 928_125_000);

        let fresh = quote_buy(&reader, &mint, 1_000_000_000, 500).await.unwrap();
        assert!(fresh.amount_out < quote.amount_out);
    }
}
