pub mod balance;
pub mod discriminator;
pub mod layout;
pub mod ledger;
pub mod logs_subscribe;
pub mod subscription_handle;
pub mod types;

pub use balance::{get_sol_balance, get_token_balance, SolBalance, TokenBalance};
pub use ledger::{AccountReader, MemoryAccountReader, TransactionReader, TransactionStatus};
pub use subscription_handle::SubscriptionHandle;
pub use types::*;
