//! Core primitives for the multi-token ledger client.
//!
//! This crate holds everything that does not depend on a particular network
//! connector: amount conversion, the token registry cache, the gateway trait
//! and revert diagnostics.

pub mod amount;
pub mod diagnostics;
pub mod errors;
pub mod gateway;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use diagnostics::RevertReason;
pub use errors::{AmountError, GatewayError};
pub use gateway::LedgerGateway;
pub use registry::TokenRegistry;
pub use types::{DisplayAmount, LedgerCall, NetworkAmount, Operator, TokenDescriptor, TokenId, TxReceipt};
