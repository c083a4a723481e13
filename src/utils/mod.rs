pub mod calc;
pub mod price;
pub mod units;
