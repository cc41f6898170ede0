//! Error types for the core crate.

use ethers::types::Bytes;
use thiserror::Error;

/// Errors that can occur while talking to the ledger contract.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// Error when the endpoint cannot be reached or answers with a non-revert error.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Error when a submitted transaction was not confirmed within the polling budget.
    #[error("Timed out waiting for confirmation: {0}")]
    Timeout(String),

    /// Error when the ledger rejected a call before it was mined.
    #[error("Call reverted: {message}")]
    Reverted {
        /// The message reported by the node
        message: String,
        /// Raw revert payload, when the node returned one
        data: Option<Bytes>,
    },

    /// Error when an account address cannot be parsed.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Error when a call cannot be encoded against the contract ABI.
    #[error("ABI error: {0}")]
    Abi(String),

    /// Error when a value returned by the contract is out of range.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Returns true when the ledger itself rejected the call.
    pub fn is_rejection(&self) -> bool {
        matches!(self, GatewayError::Reverted { .. })
    }
}

/// Errors raised by amount parsing and unit conversion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Error when the token is not in the registry.
    #[error("Token not found: {0}")]
    UnknownToken(u64),

    /// Error when the entered amount is not a non-negative integer.
    #[error("Invalid amount: {0}")]
    Invalid(String),

    /// Error when the scaled amount does not fit the on-chain integer width.
    #[error("Amount {amount} with {decimals} decimals overflows 256 bits")]
    Overflow {
        /// The display amount that was scaled
        amount: String,
        /// The decimals used for scaling
        decimals: u8,
    },
}
