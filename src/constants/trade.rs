pub mod trade {
    pub const DEFAULT_BUY_SLIPPAGE: u64 = 500; // 5%
    pub const DEFAULT_SELL_SLIPPAGE: u64 = 9999; // 99.99%
}
