pub mod accounts;
pub mod common;
pub mod config;
pub mod constants;
pub mod error;
pub mod event_parser;
pub mod pumpfun;
pub mod utils;

use std::sync::Arc;

use log::info;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature};

use crate::accounts::{BondingCurveAccount, GlobalAccount};
use crate::common::{
    balance, logs_subscribe::logs_subscription, AccountReader, SolBalance, SolanaRpcClient,
    SubscriptionHandle, TokenBalance, TransactionReader, TransactionStatus,
};
use crate::config::SdkConfig;
use crate::constants::trade::trade::{DEFAULT_BUY_SLIPPAGE, DEFAULT_SELL_SLIPPAGE};
use crate::error::{ClientError, ClientResult};
use crate::event_parser::{EventDispatcher, EventMetadata, ListenerId, PumpFunEventType};
use crate::pumpfun::{Quote, QuoteSnapshot};

/// Entry point of the SDK: reads protocol state through an
/// [`AccountReader`], quotes trades and routes decoded events to listeners
#[derive(Clone)]
pub struct PumpFunSdk {
    reader: Arc<dyn AccountReader>,
    transactions: Arc<dyn TransactionReader>,
    events: Arc<EventDispatcher>,
    ws_url: Option<String>,
    commitment: CommitmentConfig,
    default_buy_slippage_bps: u64,
    default_sell_slippage_bps: u64,
}

impl PumpFunSdk {
    /// Creates an SDK over an arbitrary ledger
    ///
    /// No websocket endpoint is configured, so [`PumpFunSdk::subscribe_events`]
    /// fails until one is set with [`PumpFunSdk::with_ws_url`]. Events can
    /// still be fed by hand through [`PumpFunSdk::events`].
    pub fn new<L>(ledger: Arc<L>) -> Self
    where
        L: AccountReader + TransactionReader + 'static,
    {
        Self {
            reader: ledger.clone(),
            transactions: ledger,
            events: Arc::new(EventDispatcher::new()),
            ws_url: None,
            commitment: CommitmentConfig::confirmed(),
            default_buy_slippage_bps: DEFAULT_BUY_SLIPPAGE,
            default_sell_slippage_bps: DEFAULT_SELL_SLIPPAGE,
        }
    }

    /// Creates an SDK backed by the nonblocking RPC client
    ///
    /// # Arguments
    /// * `config` - Endpoints, commitment and default slippage
    ///
    /// # Returns
    /// The SDK, or `ClientError::Config` if `config` does not validate
    pub fn from_config(config: &SdkConfig) -> ClientResult<Self> {
        config.validate()?;
        let commitment = config.commitment_config()?;
        let rpc =
            Arc::new(SolanaRpcClient::new_with_commitment(config.rpc_url.clone(), commitment));
        info!("PumpFun SDK using {} ({})", config.rpc_url, config.commitment);

        Ok(Self {
            reader: rpc.clone(),
            transactions: rpc,
            events: Arc::new(EventDispatcher::new()),
            ws_url: Some(config.ws_url.clone()),
            commitment,
            default_buy_slippage_bps: config.default_buy_slippage_bps,
            default_sell_slippage_bps: config.default_sell_slippage_bps,
        })
    }

    pub fn with_ws_url(mut self, ws_url: impl Into<String>, commitment: CommitmentConfig) -> Self {
        self.ws_url = Some(ws_url.into());
        self.commitment = commitment;
        self
    }

    pub fn with_default_slippage(mut self, buy_basis_points: u64, sell_basis_points: u64) -> Self {
        self.default_buy_slippage_bps = buy_basis_points;
        self.default_sell_slippage_bps = sell_basis_points;
        self
    }

    pub fn events(&self) -> &Arc<EventDispatcher> {
        &self.events
    }

    pub fn default_buy_slippage_bps(&self) -> u64 {
        self.default_buy_slippage_bps
    }

    pub fn default_sell_slippage_bps(&self) -> u64 {
        self.default_sell_slippage_bps
    }

    pub async fn get_global_account(&self) -> ClientResult<GlobalAccount> {
        pumpfun::fetch_global_account(self.reader.as_ref()).await
    }

    pub async fn get_bonding_curve_account(
        &self,
        mint: &Pubkey,
    ) -> ClientResult<BondingCurveAccount> {
        let (curve, _) = pumpfun::fetch_bonding_curve_account(self.reader.as_ref(), mint).await?;
        Ok(curve)
    }

    /// Reads the global and curve accounts of `mint` once, for callers that
    /// derive several figures from the same state
    pub async fn fetch_snapshot(&self, mint: &Pubkey) -> ClientResult<QuoteSnapshot> {
        pumpfun::fetch_snapshot(self.reader.as_ref(), mint).await
    }

    pub async fn get_sol_balance(&self, owner: &Pubkey) -> ClientResult<SolBalance> {
        balance::get_sol_balance(self.reader.as_ref(), owner).await
    }

    /// Balance of `owner`'s associated token account for `mint`
    ///
    /// # Arguments
    /// * `owner` - Wallet address
    /// * `mint` - Token mint
    ///
    /// # Returns
    /// Base units and the UI amount scaled by the mint's decimals, zero if
    /// the associated token account does not exist
    pub async fn get_token_balance(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> ClientResult<TokenBalance> {
        balance::get_token_balance(self.reader.as_ref(), owner, mint).await
    }

    /// Looks up a landed transaction
    ///
    /// # Returns
    /// Slot, success flag, fee and log messages, or `None` if the node does
    /// not know the signature at the configured commitment
    pub async fn get_transaction_status(
        &self,
        signature: &Signature,
    ) -> ClientResult<Option<TransactionStatus>> {
        self.transactions.fetch_transaction_status(signature).await
    }

    /// Quotes a buy of `sol_amount` lamports of `mint`
    ///
    /// # Arguments
    /// * `mint` - Token mint
    /// * `sol_amount` - Lamports to spend
    /// * `slippage_basis_points` - Slippage tolerance, the configured default if `None`
    ///
    /// # Returns
    /// Tokens out and the maximum SOL cost to put in the buy instruction
    ///
    /// # Errors
    /// - `AccountNotFound` if the curve or the global account is missing
    /// - `Pricing(CurveComplete)` once the token has graduated
    pub async fn quote_buy(
        &self,
        mint: &Pubkey,
        sol_amount: u64,
        slippage_basis_points: Option<u64>,
    ) -> ClientResult<Quote> {
        let slippage = slippage_basis_points.unwrap_or(self.default_buy_slippage_bps);
        pumpfun::quote_buy(self.reader.as_ref(), mint, sol_amount, slippage).await
    }

    /// Quotes a sell of `token_amount` base units of `mint`
    ///
    /// # Returns
    /// SOL out after the protocol fee and the minimum SOL output to put in
    /// the sell instruction
    pub async fn quote_sell(
        &self,
        mint: &Pubkey,
        token_amount: u64,
        slippage_basis_points: Option<u64>,
    ) -> ClientResult<Quote> {
        let slippage = slippage_basis_points.unwrap_or(self.default_sell_slippage_bps);
        pumpfun::quote_sell(self.reader.as_ref(), mint, token_amount, slippage).await
    }

    pub fn add_event_listener<E, F>(&self, callback: F) -> ListenerId
    where
        E: PumpFunEventType,
        F: Fn(&E, &EventMetadata) + Send + Sync + 'static,
    {
        self.events.add_listener::<E, F>(callback)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.events.remove_listener(id)
    }

    /// Starts streaming program logs into the registered listeners
    ///
    /// # Example
    ///
    /// ```ignore
    /// let sdk = PumpFunSdk::from_config(&SdkConfig::from_env()?)?;
    /// sdk.add_event_listener::<TradeEvent, _>(|trade, meta| {
    ///     println!("{} {} lamports at slot {}", trade.mint, trade.sol_amount, meta.slot);
    /// });
    /// let handle = sdk.subscribe_events().await?;
    /// // ...
    /// handle.shutdown().await;
    /// ```
    pub async fn subscribe_events(&self) -> ClientResult<SubscriptionHandle> {
        let ws_url = self
            .ws_url
            .as_deref()
            .ok_or_else(|| ClientError::Config("no websocket endpoint configured".to_string()))?;
        logs_subscription(ws_url, self.commitment, Arc::clone(&self.events)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::discriminator::RecordType;
    use crate::accounts::token::tests::{mint_bytes, token_account_bytes};
    use crate::common::MemoryAccountReader;
    use crate::error::PricingError;
    use crate::event_parser::{encode_event, PumpFunEvent, TradeEvent};
    use crate::pumpfun::{get_bonding_curve_pda, get_global_pda, TradeSide};
    use std::sync::atomic::{AtomicU64, Ordering};

    fn sdk_with_curve(mint: &Pubkey, virtual_sol_reserves: u64) -> PumpFunSdk {
        let reader = MemoryAccountReader::new();
        let global = GlobalAccount {
            discriminator: RecordType::Global.discriminator(),
            initialized: true,
            authority: Pubkey::new_unique(),
            fee_recipient: Pubkey::new_unique(),
            initial_virtual_token_reserves: 1_073_000_000_000_000,
            initial_virtual_sol_reserves: 30_000_000_000,
            initial_real_token_reserves: 793_100_000_000_000,
            token_total_supply: 1_000_000_000_000_000,
            fee_basis_points: 100,
        };
        let curve = BondingCurveAccount {
            discriminator: RecordType::BondingCurve.discriminator(),
            virtual_token_reserves: 1_000_000_000_000,
            virtual_sol_reserves,
            real_token_reserves: 0,
            real_sol_reserves: 0,
            token_total_supply: 1_000_000_000_000_000,
            complete: false,
        };
        reader.insert(get_global_pda(), global.to_bytes());
        if let Some(address) = get_bonding_curve_pda(mint) {
            reader.insert(address, curve.to_bytes());
        }
        PumpFunSdk::new(Arc::new(reader))
    }

    #[tokio::test]
    async fn test_quotes_use_default_slippage() {
        let mint = Pubkey::new_unique();
        let sdk = sdk_with_curve(&mint, 30_000_000_000);

        let buy = sdk.quote_buy(&mint, 1_000_000, None).await.unwrap();
        assert_eq!(buy.side, TradeSide::Buy);
        assert_eq!(buy.slippage_basis_points, 500);
        assert_eq!(buy.bound, 1_050_000);

        let sell = sdk.quote_sell(&mint, 32_258_064_516, None).await.unwrap();
        assert_eq!(sell.slippage_basis_points, 9999);
        assert_eq!(sell.amount_out, 928_125_000);
        // 928_125_000 - floor(928_125_000 * 9999 / 10000)
        assert_eq!(sell.bound, 92_813);

        let sdk = sdk.with_default_slippage(100, 100);
        let buy = sdk.quote_buy(&mint, 1_000_000, None).await.unwrap();
        assert_eq!(buy.bound, 1_010_000);
    }

    #[tokio::test]
    async fn test_quote_with_explicit_slippage_can_fail() {
        let mint = Pubkey::new_unique();
        let sdk = sdk_with_curve(&mint, 30_000_000_000);
        assert!(matches!(
            sdk.quote_sell(&mint, 1_000_000_000, Some(10_001)).await,
            Err(ClientError::Pricing(PricingError::NegativeBound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_account_getters() {
        let mint = Pubkey::new_unique();
        let sdk = sdk_with_curve(&mint, 42_000_000_000);

        let curve = sdk.get_bonding_curve_account(&mint).await.unwrap();
        assert_eq!(curve.virtual_sol_reserves, 42_000_000_000);
        assert_eq!(sdk.get_global_account().await.unwrap().fee_basis_points, 100);

        assert!(matches!(
            sdk.get_bonding_curve_account(&Pubkey::new_unique()).await,
            Err(ClientError::AccountNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_snapshot_and_default_slippage() {
        let mint = Pubkey::new_unique();
        let sdk = sdk_with_curve(&mint, 30_000_000_000);
        assert_eq!(sdk.default_buy_slippage_bps(), 500);
        assert_eq!(sdk.default_sell_slippage_bps(), 9999);

        let snapshot = sdk.fetch_snapshot(&mint).await.unwrap();
        let quote = snapshot.buy(1_000_000, sdk.default_buy_slippage_bps()).unwrap();
        assert_eq!(quote, sdk.quote_buy(&mint, 1_000_000, None).await.unwrap());
    }

    #[tokio::test]
    async fn test_balances() {
        let ledger = Arc::new(MemoryAccountReader::new());
        let (owner, mint) = (Pubkey::new_unique(), Pubkey::new_unique());
        ledger.set_lamports(owner, 1_250_000_000);
        ledger.insert(mint, mint_bytes(6));
        ledger.insert(
            spl_associated_token_account::get_associated_token_address(&owner, &mint),
            token_account_bytes(&mint, &owner, 3_000_000),
        );
        let sdk = PumpFunSdk::new(Arc::clone(&ledger));

        let sol = sdk.get_sol_balance(&owner).await.unwrap();
        assert_eq!(sol.lamports, 1_250_000_000);
        assert_eq!(sol.sol, 1.25);

        let tokens = sdk.get_token_balance(&owner, &mint).await.unwrap();
        assert_eq!(tokens.amount, 3_000_000);
        assert_eq!(tokens.ui_amount, 3.0);
    }

    #[tokio::test]
    async fn test_transaction_status() {
        let ledger = Arc::new(MemoryAccountReader::new());
        let (landed, unknown) = (Signature::new_unique(), Signature::new_unique());
        let status = TransactionStatus {
            signature: landed.to_string(),
            slot: 280_000_000,
            block_time: None,
            success: false,
            error: Some("custom program error: 0x1772".to_string()),
            fee: Some(5_000),
            logs: Vec::new(),
        };
        ledger.insert_transaction(landed, status.clone());
        let sdk = PumpFunSdk::new(ledger);

        assert_eq!(sdk.get_transaction_status(&landed).await.unwrap(), Some(status));
        assert_eq!(sdk.get_transaction_status(&unknown).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_event_listeners() {
        let sdk = sdk_with_curve(&Pubkey::new_unique(), 30_000_000_000);
        let total = Arc::new(AtomicU64::new(0));
        let sink = Arc::clone(&total);
        let id = sdk.add_event_listener::<TradeEvent, _>(move |trade, _| {
            sink.fetch_add(trade.sol_amount, Ordering::SeqCst);
        });

        let payload = encode_event(&PumpFunEvent::Trade(TradeEvent {
            mint: Pubkey::new_unique(),
            sol_amount: 5,
            token_amount: 1,
            is_buy: true,
            user: Pubkey::new_unique(),
            timestamp: 0,
            virtual_sol_reserves: 1,
            virtual_token_reserves: 1,
        }))
        .unwrap();

        sdk.events().dispatch(&payload, 1, "sig").unwrap();
        assert!(sdk.remove_event_listener(id));
        sdk.events().dispatch(&payload, 2, "sig").unwrap();
        assert_eq!(total.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_subscribe_requires_ws_url() {
        let sdk = sdk_with_curve(&Pubkey::new_unique(), 30_000_000_000);
        assert!(matches!(sdk.subscribe_events().await, Err(ClientError::Config(_))));
    }

    #[tokio::test]
    async fn test_from_config_rejects_invalid() {
        let mut config = SdkConfig::new(
            "https://api.mainnet-beta.solana.com",
            "wss://api.mainnet-beta.solana.com",
        );
        assert!(PumpFunSdk::from_config(&config).is_ok());
        config.commitment = "eventually".to_string();
        assert!(matches!(PumpFunSdk::from_config(&config), Err(ClientError::Config(_))));
    }
}
