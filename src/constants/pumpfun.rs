//! Constants used by the crate.
//!
//! - `seeds`: seed values used for PDA derivation
//! - `global_constants`: protocol-wide numeric constants
//! - `accounts`: program account addresses

/// Constants used as seeds for deriving PDAs (Program Derived Addresses)
pub mod seeds {
    /// Seed for the global state PDA
    pub const GLOBAL_SEED: &[u8] = b"global";

    /// Seed for bonding curve PDAs
    pub const BONDING_CURVE_SEED: &[u8] = b"bonding-curve";
}

pub mod global_constants {
    /// Denominator of every basis-point quantity
    pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;

    /// Largest fee the global account may carry
    pub const MAX_FEE_BASIS_POINTS: u64 = BASIS_POINTS_DENOMINATOR;

    pub const DEFAULT_DECIMALS: u32 = 6;

    pub const SCALE: u64 = 1_000_000; // 10^6 for token decimals

    pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000; // 10^9 for solana lamports
}

/// Constants related to program accounts and authorities
pub mod accounts {
    use solana_sdk::{pubkey, pubkey::Pubkey};

    /// Public key for the Pump.fun program
    pub const PUMPFUN: Pubkey = pubkey!("6EF8rrecthR5Dkzon8Nwu78hRvfCKubJ14M5uBEwF6P");
}
