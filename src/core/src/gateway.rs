//! The authenticated channel to the ledger contract.
//!
//! Everything that reaches the remote ledger goes through [`LedgerGateway`].
//! The network implementation lives in the contract crate; tests provide an
//! in-memory one.

use crate::errors::GatewayError;
use crate::types::{LedgerCall, NetworkAmount, TokenId, TxReceipt};
use async_trait::async_trait;
use ethers::types::Bytes;

/// Operations exposed by the ledger contract.
///
/// State-changing calls block until the transaction is confirmed or the
/// connector's polling budget runs out. A receipt with `success == false` is a
/// ledger rejection; an `Err` is a communication failure or a pre-mining revert.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Address of the connected identity.
    fn account(&self) -> String;

    /// Whether the connected identity owns the contract.
    async fn is_owner(&self) -> Result<bool, GatewayError>;

    /// All token IDs defined on the contract, in definition order.
    async fn token_ids(&self) -> Result<Vec<TokenId>, GatewayError>;

    /// Name of a token.
    async fn token_name(&self, token_id: TokenId) -> Result<String, GatewayError>;

    /// Decimal places of a token.
    async fn token_decimals(&self, token_id: TokenId) -> Result<u8, GatewayError>;

    /// Metadata URL of a token.
    async fn token_url(&self, token_id: TokenId) -> Result<String, GatewayError>;

    /// Balance of the connected identity.
    async fn balance_of_self(&self, token_id: TokenId) -> Result<NetworkAmount, GatewayError>;

    /// Balance of an arbitrary account.
    async fn balance_of(&self, address: &str, token_id: TokenId) -> Result<NetworkAmount, GatewayError>;

    /// Whether a token is paused.
    async fn is_paused(&self, token_id: TokenId) -> Result<bool, GatewayError>;

    /// Submits a state-changing call and waits for its receipt.
    async fn submit(&self, call: &LedgerCall) -> Result<TxReceipt, GatewayError>;

    /// ABI-encodes a call exactly as [`submit`](Self::submit) would send it.
    fn encode_call(&self, call: &LedgerCall) -> Result<Bytes, GatewayError>;

    /// Executes encoded call data read-only against the latest block and
    /// returns whatever bytes the node produced, including revert payloads.
    async fn raw_call(&self, data: Bytes) -> Result<Bytes, GatewayError>;

    async fn transfer(&self, to: &str, token_id: TokenId, amount: NetworkAmount) -> Result<TxReceipt, GatewayError> {
        self.submit(&LedgerCall::Transfer {
            to: to.to_string(),
            token_id,
            amount,
        })
        .await
    }

    async fn add_token(
        &self,
        token_id: TokenId,
        name: &str,
        decimals: u8,
        metadata_url: &str,
    ) -> Result<TxReceipt, GatewayError> {
        self.submit(&LedgerCall::AddToken {
            token_id,
            name: name.to_string(),
            decimals,
            metadata_url: metadata_url.to_string(),
        })
        .await
    }

    async fn mint(&self, token_id: TokenId, amount: NetworkAmount) -> Result<TxReceipt, GatewayError> {
        self.submit(&LedgerCall::Mint { token_id, amount }).await
    }

    async fn burn(&self, token_id: TokenId, amount: NetworkAmount) -> Result<TxReceipt, GatewayError> {
        self.submit(&LedgerCall::Burn { token_id, amount }).await
    }

    async fn register_dealer(&self, dealer: &str, token_id: TokenId) -> Result<TxReceipt, GatewayError> {
        self.submit(&LedgerCall::RegisterDealer {
            dealer: dealer.to_string(),
            token_id,
        })
        .await
    }

    async fn unregister_dealer(&self, dealer: &str, token_id: TokenId) -> Result<TxReceipt, GatewayError> {
        self.submit(&LedgerCall::UnregisterDealer {
            dealer: dealer.to_string(),
            token_id,
        })
        .await
    }

    async fn pause(&self, token_id: TokenId) -> Result<TxReceipt, GatewayError> {
        self.submit(&LedgerCall::Pause { token_id }).await
    }

    async fn resume(&self, token_id: TokenId) -> Result<TxReceipt, GatewayError> {
        self.submit(&LedgerCall::Resume { token_id }).await
    }
}
