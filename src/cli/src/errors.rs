//! Error types for the ledger client.

use ledger_core::{AmountError, GatewayError, RevertReason};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Broad class of a command failure, used for uniform reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Rejected,
    Transport,
    Input,
}

/// Errors that can occur while executing an interactive command.
#[derive(Debug)]
pub enum CommandError {
    /// Error when operator input is malformed or refers to an unknown token.
    Validation(String),

    /// Error when the ledger rejected a state-changing call.
    Rejected {
        /// Contract function that was rejected
        operation: String,
        /// What the gateway reported
        detail: String,
        /// Hash of the failed transaction, when it was mined
        transaction_hash: Option<String>,
        /// Reason recovered by the diagnostic call, when one was made
        diagnosis: Option<RevertReason>,
    },

    /// Error when the node could not be reached or did not confirm in time.
    Transport(String),

    /// Error when reading operator input fails.
    Input(std::io::Error),
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommandError::Validation(_) => ErrorKind::Validation,
            CommandError::Rejected { .. } => ErrorKind::Rejected,
            CommandError::Transport(_) => ErrorKind::Transport,
            CommandError::Input(_) => ErrorKind::Input,
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Validation(msg) => write!(f, "Validation error: {}", msg),
            CommandError::Rejected {
                operation,
                detail,
                transaction_hash,
                diagnosis,
            } => {
                write!(f, "Ledger rejected {}: {}", operation, detail)?;
                if let Some(hash) = transaction_hash {
                    write!(f, " [tx {}]", hash)?;
                }
                if let Some(reason) = diagnosis {
                    write!(f, " ({})", reason)?;
                }
                Ok(())
            }
            CommandError::Transport(msg) => write!(f, "Network error: {}", msg),
            CommandError::Input(e) => write!(f, "Input error: {}", e),
        }
    }
}

impl StdError for CommandError {}

impl From<std::io::Error> for CommandError {
    fn from(error: std::io::Error) -> Self {
        CommandError::Input(error)
    }
}

impl From<AmountError> for CommandError {
    fn from(error: AmountError) -> Self {
        CommandError::Validation(error.to_string())
    }
}

impl From<GatewayError> for CommandError {
    fn from(error: GatewayError) -> Self {
        match error {
            GatewayError::InvalidAddress(msg) => CommandError::Validation(format!("Invalid address: {}", msg)),
            GatewayError::Reverted { message, .. } => CommandError::Rejected {
                operation: "call".to_string(),
                detail: message,
                transaction_hash: None,
                diagnosis: None,
            },
            other => CommandError::Transport(other.to_string()),
        }
    }
}

/// Errors that prevent a session from starting.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Key error: {0}")]
    Key(String),

    #[error("Cannot connect to ledger: {0}")]
    Connect(#[from] GatewayError),

    #[error("Cannot determine operator role: {0}")]
    Role(String),
}

impl StartupError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            StartupError::Config(_) | StartupError::Key(_) => 1,
            StartupError::Connect(_) | StartupError::Role(_) => 2,
        }
    }
}
