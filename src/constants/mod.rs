pub mod pumpfun;
pub mod trade;
