pub mod common;
pub mod quote;

pub use common::{
    fetch_bonding_curve_account, fetch_global_account, get_bonding_curve_pda, get_global_pda,
};
pub use quote::{fetch_snapshot, quote_buy, quote_sell, Quote, QuoteSnapshot, TradeSide};
