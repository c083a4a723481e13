pub type SolanaRpcClient = solana_client::nonblocking::rpc_client::RpcClient;

pub type AnyResult<T> = anyhow::Result<T>;
