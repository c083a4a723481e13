//! Ledger reader seams
//!
//! The SDK never talks to the network directly when reading state; it asks an
//! [`AccountReader`] for raw account bytes and balances, and a
//! [`TransactionReader`] for landed transactions. The nonblocking RPC client
//! is the production implementation, [`MemoryAccountReader`] serves fixtures.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use solana_client::{rpc_config::RpcTransactionConfig, rpc_request::RpcRequest};
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use solana_transaction_status::{
    option_serializer::OptionSerializer, EncodedConfirmedTransactionWithStatusMeta,
    UiTransactionEncoding,
};

use crate::common::types::SolanaRpcClient;
use crate::error::{ClientError, ClientResult};

#[async_trait]
pub trait AccountReader: Send + Sync {
    /// Raw data of the account at `address`, `None` if it does not exist
    async fn fetch_account_bytes(&self, address: &Pubkey) -> ClientResult<Option<Vec<u8>>>;

    /// Lamports held by `address`, 0 if it does not exist
    async fn fetch_lamports(&self, address: &Pubkey) -> ClientResult<u64>;
}

/// Outcome of a landed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatus {
    pub signature: String,
    pub slot: u64,
    /// Unix seconds, when the node still knows the block time
    pub block_time: Option<i64>,
    pub success: bool,
    pub error: Option<String>,
    pub fee: Option<u64>,
    pub logs: Vec<String>,
}

#[async_trait]
pub trait TransactionReader: Send + Sync {
    /// Status of the transaction `signature`, `None` if the ledger does not know it
    async fn fetch_transaction_status(
        &self,
        signature: &Signature,
    ) -> ClientResult<Option<TransactionStatus>>;
}

#[async_trait]
impl AccountReader for SolanaRpcClient {
    async fn fetch_account_bytes(&self, address: &Pubkey) -> ClientResult<Option<Vec<u8>>> {
        let response = self
            .get_account_with_commitment(address, self.commitment())
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))?;
        debug!("Fetched {} at slot {}", address, response.context.slot);
        Ok(response.value.map(|account| account.data))
    }

    async fn fetch_lamports(&self, address: &Pubkey) -> ClientResult<u64> {
        let response = self
            .get_balance_with_commitment(address, self.commitment())
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))?;
        Ok(response.value)
    }
}

#[async_trait]
impl TransactionReader for SolanaRpcClient {
    async fn fetch_transaction_status(
        &self,
        signature: &Signature,
    ) -> ClientResult<Option<TransactionStatus>> {
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Json),
            commitment: Some(self.commitment()),
            max_supported_transaction_version: Some(0),
        };
        // `getTransaction` answers null for unknown signatures
        let transaction: Option<EncodedConfirmedTransactionWithStatusMeta> = self
            .send(RpcRequest::GetTransaction, serde_json::json!([signature.to_string(), config]))
            .await
            .map_err(|e| ClientError::Rpc(e.to_string()))?;

        Ok(transaction.map(|transaction| {
            let meta = transaction.transaction.meta;
            let logs = match meta.as_ref().map(|meta| &meta.log_messages) {
                Some(OptionSerializer::Some(logs)) => logs.clone(),
                _ => Vec::new(),
            };
            let error = meta.as_ref().and_then(|meta| meta.err.as_ref()).map(|e| e.to_string());
            TransactionStatus {
                signature: signature.to_string(),
                slot: transaction.slot,
                block_time: transaction.block_time,
                success: meta.is_some() && error.is_none(),
                error,
                fee: meta.as_ref().map(|meta| meta.fee),
                logs,
            }
        }))
    }
}

/// In-memory ledger, keyed by address and signature
#[derive(Default)]
pub struct MemoryAccountReader {
    accounts: RwLock<HashMap<Pubkey, Vec<u8>>>,
    lamports: RwLock<HashMap<Pubkey, u64>>,
    transactions: RwLock<HashMap<Signature, TransactionStatus>>,
}

impl MemoryAccountReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address, data);
    }

    pub fn remove(&self, address: &Pubkey) -> Option<Vec<u8>> {
        self.accounts.write().unwrap_or_else(PoisonError::into_inner).remove(address)
    }

    pub fn set_lamports(&self, address: Pubkey, lamports: u64) {
        self.lamports
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address, lamports);
    }

    pub fn insert_transaction(&self, signature: Signature, status: TransactionStatus) {
        self.transactions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(signature, status);
    }
}

#[async_trait]
impl AccountReader for MemoryAccountReader {
    async fn fetch_account_bytes(&self, address: &Pubkey) -> ClientResult<Option<Vec<u8>>> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        Ok(accounts.get(address).cloned())
    }

    async fn fetch_lamports(&self, address: &Pubkey) -> ClientResult<u64> {
        let lamports = self.lamports.read().unwrap_or_else(PoisonError::into_inner);
        Ok(lamports.get(address).copied().unwrap_or_default())
    }
}

#[async_trait]
impl TransactionReader for MemoryAccountReader {
    async fn fetch_transaction_status(
        &self,
        signature: &Signature,
    ) -> ClientResult<Option<TransactionStatus>> {
        let transactions = self.transactions.read().unwrap_or_else(PoisonError::into_inner);
        Ok(transactions.get(signature).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_reader_accounts() {
        let reader = MemoryAccountReader::new();
        let address = Pubkey::new_unique();
        assert_eq!(reader.fetch_account_bytes(&address).await.unwrap(), None);

        reader.insert(address, vec![1, 2, 3]);
        assert_eq!(reader.fetch_account_bytes(&address).await.unwrap(), Some(vec![1, 2, 3]));

        assert_eq!(reader.remove(&address), Some(vec![1, 2, 3]));
        assert_eq!(reader.fetch_account_bytes(&address).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_reader_lamports() {
        let reader = MemoryAccountReader::new();
        let address = Pubkey::new_unique();
        assert_eq!(reader.fetch_lamports(&address).await.unwrap(), 0);

        reader.set_lamports(address, 1_500_000_000);
        assert_eq!(reader.fetch_lamports(&address).await.unwrap(), 1_500_000_000);
    }

    #[tokio::test]
    async fn test_memory_reader_transactions() {
        let reader = MemoryAccountReader::new();
        let signature = Signature::new_unique();
        assert_eq!(reader.fetch_transaction_status(&signature).await.unwrap(), None);

        let status = TransactionStatus {
            signature: signature.to_string(),
            slot: 300_000_000,
            block_time: Some(1_718_000_000),
            success: true,
            error: None,
            fee: Some(5_000),
            logs: vec!["Program log: Instruction: Buy".to_string()],
        };
        reader.insert_transaction(signature, status.clone());
        assert_eq!(reader.fetch_transaction_status(&signature).await.unwrap(), Some(status));
    }
}
