//! Core types for the ledger client.

use ethers::types::{TransactionReceipt, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token ID, assigned by the contract owner when the token is added.
pub type TokenId = u64;

/// Description of a token known to the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    /// The token ID
    pub id: TokenId,
    /// The token name
    pub name: String,
    /// Decimal places between display and network units
    pub decimals: u8,
    /// Metadata URL of the token definition
    pub metadata_url: String,
}

impl TokenDescriptor {
    /// Creates a new token descriptor.
    pub fn new(id: TokenId, name: impl Into<String>, decimals: u8, metadata_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            decimals,
            metadata_url: metadata_url.into(),
        }
    }
}

impl fmt::Display for TokenDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ Id : \"{}\" ; Name : \"{}\" ; Decimals : \"{}\" ; URL : \"{}\" }}",
            self.id, self.name, self.decimals, self.metadata_url
        )
    }
}

/// Role of the connected identity, fixed for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Contract owner: issues, mints, burns and manages dealers.
    Owner,
    /// Registered holder: checks its own balance and transfers.
    Dealer,
}

impl Operator {
    /// Classifies the operator from the contract's ownership check.
    pub fn from_ownership(is_owner: bool) -> Self {
        if is_owner {
            Operator::Owner
        } else {
            Operator::Dealer
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Owner => write!(f, "owner"),
            Operator::Dealer => write!(f, "dealer"),
        }
    }
}

/// An amount as entered by a person, before decimals are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct DisplayAmount(pub U256);

/// An amount in the token's smallest unit, as stored on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct NetworkAmount(pub U256);

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for NetworkAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DisplayAmount {
    fn from(value: u64) -> Self {
        DisplayAmount(U256::from(value))
    }
}

impl From<u64> for NetworkAmount {
    fn from(value: u64) -> Self {
        NetworkAmount(U256::from(value))
    }
}

/// Confirmed outcome of a state-changing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Whether the ledger accepted the call
    pub success: bool,
    /// Hash of the transaction, 0x-prefixed
    pub transaction_hash: String,
    /// Status code reported in the receipt
    pub raw_status: Option<u64>,
    /// Block the transaction was included in
    pub block_number: Option<u64>,
    /// Gas consumed by the transaction
    pub gas_used: Option<U256>,
}

impl From<&TransactionReceipt> for TxReceipt {
    fn from(receipt: &TransactionReceipt) -> Self {
        let raw_status = receipt.status.map(|s| s.as_u64());
        Self {
            success: raw_status == Some(1),
            transaction_hash: format!("{:#x}", receipt.transaction_hash),
            raw_status,
            block_number: receipt.block_number.map(|b| b.as_u64()),
            gas_used: receipt.gas_used,
        }
    }
}

/// A state-changing contract call with its arguments.
///
/// The same value is used to submit the transaction and to re-encode it as a
/// read-only probe, so both always carry identical arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    /// Move funds from the caller to another account.
    Transfer {
        to: String,
        token_id: TokenId,
        amount: NetworkAmount,
    },
    /// Define a new token.
    AddToken {
        token_id: TokenId,
        name: String,
        decimals: u8,
        metadata_url: String,
    },
    /// Create new supply on the caller's account.
    Mint { token_id: TokenId, amount: NetworkAmount },
    /// Destroy supply from the caller's account.
    Burn { token_id: TokenId, amount: NetworkAmount },
    /// Allow an account to hold and move a token.
    RegisterDealer { dealer: String, token_id: TokenId },
    /// Revoke a dealer registration.
    UnregisterDealer { dealer: String, token_id: TokenId },
    /// Stop all movement of a token.
    Pause { token_id: TokenId },
    /// Lift a pause.
    Resume { token_id: TokenId },
}

impl LedgerCall {
    /// Name of the contract function this call invokes.
    pub fn function_name(&self) -> &'static str {
        match self {
            LedgerCall::Transfer { .. } => "transfer",
            LedgerCall::AddToken { .. } => "addNewTokenDefinition",
            LedgerCall::Mint { .. } => "mint",
            LedgerCall::Burn { .. } => "burn",
            LedgerCall::RegisterDealer { .. } => "registerDealer",
            LedgerCall::UnregisterDealer { .. } => "unregisterDealer",
            LedgerCall::Pause { .. } => "pause",
            LedgerCall::Resume { .. } => "resume",
        }
    }

    /// The token this call operates on.
    pub fn token_id(&self) -> TokenId {
        match self {
            LedgerCall::Transfer { token_id, .. }
            | LedgerCall::AddToken { token_id, .. }
            | LedgerCall::Mint { token_id, .. }
            | LedgerCall::Burn { token_id, .. }
            | LedgerCall::RegisterDealer { token_id, .. }
            | LedgerCall::UnregisterDealer { token_id, .. }
            | LedgerCall::Pause { token_id }
            | LedgerCall::Resume { token_id } => *token_id,
        }
    }
}
