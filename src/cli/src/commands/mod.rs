//! Orchestration operations behind the interactive menu.
//!
//! Every operation validates its token id against the registry before the
//! gateway is touched, collects the rest of its input, converts amounts and
//! returns a typed [`Outcome`] or [`CommandError`] for the dispatcher to report.

pub mod add_token;
pub mod balance;
pub mod dealer;
pub mod pause;
pub mod supply;
pub mod token_details;
pub mod transfer;

use crate::errors::CommandError;
use crate::input::Prompt;
use ledger_core::{
    amount::{self, format_units},
    diagnostics, DisplayAmount, GatewayError, LedgerCall, LedgerGateway, NetworkAmount, TokenDescriptor, TokenId,
    TokenRegistry, TxReceipt,
};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared state for all operations of a session.
#[derive(Clone)]
pub struct Context {
    pub gateway: Arc<dyn LedgerGateway>,
    pub registry: Arc<TokenRegistry>,
    /// Diagnose every ledger rejection, not only the ones that always get it
    pub diagnose_all_rejections: bool,
}

impl Context {
    pub fn new(gateway: Arc<dyn LedgerGateway>, registry: Arc<TokenRegistry>) -> Self {
        Self {
            gateway,
            registry,
            diagnose_all_rejections: false,
        }
    }

    /// Shows the known tokens and reads the id of an existing one.
    pub fn read_token_id(&self, input: &mut dyn Prompt) -> Result<TokenDescriptor, CommandError> {
        print_token_names(&self.registry);
        let token_id = parse_token_id(&input.read_line("Enter token id : ")?)?;
        self.registry
            .get(token_id)
            .ok_or_else(|| CommandError::Validation(format!("Entered token id {} does not exist", token_id)))
    }

    /// Reads a non-empty account address.
    pub fn read_address(&self, input: &mut dyn Prompt, label: &str) -> Result<String, CommandError> {
        let address = input.read_line(label)?;
        let address = address.trim();
        if address.is_empty() {
            return Err(CommandError::Validation("Account address must not be empty".to_string()));
        }
        Ok(address.to_string())
    }

    /// Reads a display amount and converts it to network units for `token`.
    pub fn read_amount(
        &self,
        input: &mut dyn Prompt,
        token: &TokenDescriptor,
        label: &str,
    ) -> Result<(DisplayAmount, NetworkAmount), CommandError> {
        let display = amount::parse_display(&input.read_line(label)?)?;
        let network = amount::to_network(&self.registry, token.id, display)?;
        Ok((display, network))
    }

    /// Submits a state-changing call and turns any ledger rejection into an error.
    ///
    /// When `diagnose` is set, or diagnostics are enabled for all rejections,
    /// a rejected call is replayed read-only once to recover its reason.
    pub async fn submit(&self, call: LedgerCall, diagnose: bool) -> Result<TxReceipt, CommandError> {
        let operation = call.function_name();
        let (detail, transaction_hash) = match self.gateway.submit(&call).await {
            Ok(receipt) if receipt.success => {
                info!("{} confirmed in {}", operation, receipt.transaction_hash);
                return Ok(receipt);
            }
            Ok(receipt) => (
                format!("transaction failed with status {:?}", receipt.raw_status),
                Some(receipt.transaction_hash),
            ),
            Err(e) if e.is_rejection() => (e.to_string(), None),
            Err(e) => return Err(e.into()),
        };

        warn!("{} rejected by the ledger: {}", operation, detail);
        let diagnosis = if diagnose || self.diagnose_all_rejections {
            Some(diagnostics::diagnose(self.gateway.as_ref(), &call).await)
        } else {
            None
        };

        Err(CommandError::Rejected {
            operation: operation.to_string(),
            detail,
            transaction_hash,
            diagnosis,
        })
    }
}

/// Runs a read that follows a confirmed call.
///
/// The call is already on the ledger, so a failed read only loses the value.
pub async fn read_after_confirmation<T, F>(what: &str, read: F) -> Option<T>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    match read.await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Could not read {} after confirmation: {}", what, e);
            None
        }
    }
}

/// Parses an operator-entered token id.
pub fn parse_token_id(input: &str) -> Result<TokenId, CommandError> {
    input
        .trim()
        .parse::<TokenId>()
        .map_err(|_| CommandError::Validation(format!("'{}' is not a valid token id", input.trim())))
}

fn print_token_names(registry: &TokenRegistry) {
    let tokens = registry.list();
    if tokens.is_empty() {
        println!("No token has been added to contract");
        return;
    }
    println!("Available tokens ");
    for token in tokens {
        println!("Id   : {} -- Name : {}", token.id, token.name);
    }
}

/// A balance read before and after a state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChange {
    pub account: String,
    pub before: NetworkAmount,
    /// Unset when the balance could not be read back
    pub after: Option<NetworkAmount>,
}

/// Result of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Tokens(Vec<TokenDescriptor>),
    Balance {
        account: String,
        token: TokenDescriptor,
        amount: NetworkAmount,
    },
    Transferred {
        token: TokenDescriptor,
        amount: DisplayAmount,
        to: String,
        sender: BalanceChange,
        /// Only reported when the operator may read other balances
        recipient: Option<BalanceChange>,
        receipt: TxReceipt,
    },
    Minted {
        token: TokenDescriptor,
        amount: DisplayAmount,
        balance: BalanceChange,
        receipt: TxReceipt,
    },
    Burned {
        token: TokenDescriptor,
        amount: DisplayAmount,
        balance: BalanceChange,
        receipt: TxReceipt,
    },
    TokenAdded {
        token: TokenDescriptor,
        receipt: TxReceipt,
    },
    DealerRegistered {
        dealer: String,
        token: TokenDescriptor,
        receipt: TxReceipt,
    },
    DealerUnregistered {
        dealer: String,
        token: TokenDescriptor,
        receipt: TxReceipt,
    },
    Paused {
        token: TokenDescriptor,
        /// Pause flag read back from the contract, if the read succeeded
        paused: Option<bool>,
        receipt: TxReceipt,
    },
    Resumed {
        token: TokenDescriptor,
        receipt: TxReceipt,
    },
}

impl Outcome {
    /// Receipt of the state-changing call, if the command made one.
    pub fn receipt(&self) -> Option<&TxReceipt> {
        match self {
            Outcome::Tokens(_) | Outcome::Balance { .. } => None,
            Outcome::Transferred { receipt, .. }
            | Outcome::Minted { receipt, .. }
            | Outcome::Burned { receipt, .. }
            | Outcome::TokenAdded { receipt, .. }
            | Outcome::DealerRegistered { receipt, .. }
            | Outcome::DealerUnregistered { receipt, .. }
            | Outcome::Paused { receipt, .. }
            | Outcome::Resumed { receipt, .. } => Some(receipt),
        }
    }
}

fn write_change(f: &mut fmt::Formatter<'_>, label: &str, change: &BalanceChange, decimals: u8) -> fmt::Result {
    writeln!(
        f,
        "{} -- Balance for account [{}] : Before [{}] :: After [{}]",
        label,
        change.account,
        format_units(change.before, decimals),
        change
            .after
            .map(|after| format_units(after, decimals))
            .unwrap_or_else(|| UNAVAILABLE.to_string())
    )
}

const UNAVAILABLE: &str = "unavailable";

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Tokens(tokens) if tokens.is_empty() => writeln!(f, "No token has been added to contract")?,
            Outcome::Tokens(tokens) => {
                writeln!(f, "Available tokens ")?;
                for token in tokens {
                    writeln!(f, "{}", token)?;
                }
            }
            Outcome::Balance { account, token, amount } => writeln!(
                f,
                "Balance for address [{}] is [{}] {}",
                account,
                format_units(*amount, token.decimals),
                token.name
            )?,
            Outcome::Transferred {
                token,
                amount,
                to,
                sender,
                recipient,
                ..
            } => {
                writeln!(f, "Amount : {} {} transferred to account address [{}]", amount, token.name, to)?;
                write_change(f, "Transfer", sender, token.decimals)?;
                if let Some(recipient) = recipient {
                    write_change(f, "Transfer", recipient, token.decimals)?;
                }
            }
            Outcome::Minted { token, amount, balance, .. } => {
                writeln!(f, "Amount [{}] minted for token id [{}]", amount, token.id)?;
                write_change(f, "Mint", balance, token.decimals)?;
            }
            Outcome::Burned { token, amount, balance, .. } => {
                writeln!(f, "Amount [{}] for token id [{}] is burnt", amount, token.id)?;
                write_change(f, "Burn", balance, token.decimals)?;
            }
            Outcome::TokenAdded { token, .. } => writeln!(
                f,
                "New token with id [{}] with name [{}] has been added",
                token.id, token.name
            )?,
            Outcome::DealerRegistered { dealer, token, .. } => writeln!(
                f,
                "Registering of dealer [{}], token id [{}] completed",
                dealer, token.id
            )?,
            Outcome::DealerUnregistered { dealer, token, .. } => writeln!(
                f,
                "Unregistering of account address [{}], token id [{}] done",
                dealer, token.id
            )?,
            Outcome::Paused { token, paused, .. } => {
                writeln!(f, "Token id [{}] is paused", token.id)?;
                match paused {
                    Some(paused) => writeln!(
                        f,
                        "Pause status from contract for token id [{}] is [{}]",
                        token.id, paused
                    )?,
                    None => writeln!(f, "Pause status from contract for token id [{}] is {}", token.id, UNAVAILABLE)?,
                }
            }
            Outcome::Resumed { token, .. } => writeln!(f, "Token id [{}] is resumed", token.id)?,
        }

        if let Some(receipt) = self.receipt() {
            write!(f, "Transaction hash : {}", receipt.transaction_hash)?;
        }
        Ok(())
    }
}
