//! Interactive owner/dealer client for the multi-token ledger contract.

pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod input;
pub mod wallet;

// Re-export commonly used types and functions
pub use commands::{Context, Outcome};
pub use config::LedgerConfig;
pub use dispatcher::{Command, DealerCommand, Dispatcher, OwnerCommand, Selection, Step};
pub use errors::{CommandError, ErrorKind, StartupError};
pub use input::{Prompt, ScriptedPrompt, StdinPrompt};
pub use wallet::load_signer;
