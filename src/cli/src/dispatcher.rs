//! Role-aware command dispatch for the interactive session.
//!
//! The operator's role picks one of two disjoint command tables. Owner-only
//! operations have no code in the dealer table, so they cannot be reached from
//! a dealer session at all.

use crate::commands::{add_token, balance, dealer, pause, supply, token_details, transfer, Context, Outcome};
use crate::errors::{CommandError, ErrorKind};
use crate::input::Prompt;
use colored::Colorize;
use ledger_core::Operator;
use std::fmt::Write;
use std::io;
use tracing::{debug, error, info, warn};

/// Commands available to the contract owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerCommand {
    Mint,
    OwnBalance,
    OtherBalance,
    AddToken,
    RegisterDealer,
    Transfer,
    UnregisterDealer,
    Pause,
    Resume,
    Burn,
    TokenDetails,
}

impl OwnerCommand {
    pub const ALL: [OwnerCommand; 11] = [
        OwnerCommand::Mint,
        OwnerCommand::OwnBalance,
        OwnerCommand::OtherBalance,
        OwnerCommand::AddToken,
        OwnerCommand::RegisterDealer,
        OwnerCommand::Transfer,
        OwnerCommand::UnregisterDealer,
        OwnerCommand::Pause,
        OwnerCommand::Resume,
        OwnerCommand::Burn,
        OwnerCommand::TokenDetails,
    ];

    pub fn code(self) -> u32 {
        match self {
            OwnerCommand::Mint => 1,
            OwnerCommand::OwnBalance => 2,
            OwnerCommand::OtherBalance => 3,
            OwnerCommand::AddToken => 4,
            OwnerCommand::RegisterDealer => 5,
            OwnerCommand::Transfer => 6,
            OwnerCommand::UnregisterDealer => 7,
            OwnerCommand::Pause => 8,
            OwnerCommand::Resume => 9,
            OwnerCommand::Burn => 10,
            OwnerCommand::TokenDetails => 11,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn label(self) -> &'static str {
        match self {
            OwnerCommand::Mint => "Mint token",
            OwnerCommand::OwnBalance => "Get own balance",
            OwnerCommand::OtherBalance => "Get balance of other account",
            OwnerCommand::AddToken => "Add new token",
            OwnerCommand::RegisterDealer => "Register dealer",
            OwnerCommand::Transfer => "Transfer token",
            OwnerCommand::UnregisterDealer => "Unregister dealer",
            OwnerCommand::Pause => "Pause token",
            OwnerCommand::Resume => "Resume token",
            OwnerCommand::Burn => "Burn token",
            OwnerCommand::TokenDetails => "Token details",
        }
    }
}

/// Commands available to a dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealerCommand {
    OwnBalance,
    Transfer,
    TokenDetails,
}

impl DealerCommand {
    pub const ALL: [DealerCommand; 3] = [
        DealerCommand::OwnBalance,
        DealerCommand::Transfer,
        DealerCommand::TokenDetails,
    ];

    pub fn code(self) -> u32 {
        match self {
            DealerCommand::OwnBalance => 1,
            DealerCommand::Transfer => 2,
            DealerCommand::TokenDetails => 3,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn label(self) -> &'static str {
        match self {
            DealerCommand::OwnBalance => "Get own balance",
            DealerCommand::Transfer => "Transfer token",
            DealerCommand::TokenDetails => "Token details",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Owner(OwnerCommand),
    Dealer(DealerCommand),
}

/// What a menu code resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Exit,
    Run(Command),
}

/// What the session loop should do after one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit,
    Ignored,
}

/// Maps menu codes to operations and reports their results.
pub struct Dispatcher {
    operator: Operator,
    ctx: Context,
}

impl Dispatcher {
    pub fn new(operator: Operator, ctx: Context) -> Self {
        Self { operator, ctx }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Resolves a menu entry against the table of the current role.
    pub fn resolve(&self, line: &str) -> Option<Selection> {
        let code = line.trim().parse::<u32>().ok()?;
        if code == 0 {
            return Some(Selection::Exit);
        }
        let command = match self.operator {
            Operator::Owner => Command::Owner(OwnerCommand::from_code(code)?),
            Operator::Dealer => Command::Dealer(DealerCommand::from_code(code)?),
        };
        Some(Selection::Run(command))
    }

    /// The menu of the current role.
    pub fn menu(&self) -> String {
        let entries: Vec<(u32, &str)> = match self.operator {
            Operator::Owner => OwnerCommand::ALL.iter().map(|c| (c.code(), c.label())).collect(),
            Operator::Dealer => DealerCommand::ALL.iter().map(|c| (c.code(), c.label())).collect(),
        };

        let mut menu = format!("\nSelect option ({})\n", self.operator);
        for (code, label) in entries {
            let _ = writeln!(menu, "{:>3} : {}", code, label);
        }
        let _ = writeln!(menu, "{:>3} : Exit", 0);
        menu
    }

    /// Runs one command to completion.
    pub async fn execute(&self, command: Command, input: &mut dyn Prompt) -> Result<Outcome, CommandError> {
        let ctx = &self.ctx;
        match command {
            Command::Owner(cmd) => match cmd {
                OwnerCommand::Mint => supply::mint(ctx, input).await,
                OwnerCommand::OwnBalance => balance::own(ctx, Operator::Owner, input).await,
                OwnerCommand::OtherBalance => balance::other(ctx, input).await,
                OwnerCommand::AddToken => add_token::run(ctx, input).await,
                OwnerCommand::RegisterDealer => dealer::register(ctx, input).await,
                OwnerCommand::Transfer => transfer::run(ctx, Operator::Owner, input).await,
                OwnerCommand::UnregisterDealer => dealer::unregister(ctx, input).await,
                OwnerCommand::Pause => pause::pause(ctx, input).await,
                OwnerCommand::Resume => pause::resume(ctx, input).await,
                OwnerCommand::Burn => supply::burn(ctx, input).await,
                OwnerCommand::TokenDetails => Ok(token_details::run(ctx)),
            },
            Command::Dealer(cmd) => match cmd {
                DealerCommand::OwnBalance => balance::own(ctx, Operator::Dealer, input).await,
                DealerCommand::Transfer => transfer::run(ctx, Operator::Dealer, input).await,
                DealerCommand::TokenDetails => Ok(token_details::run(ctx)),
            },
        }
    }

    /// Resolves and executes one menu entry, reporting the result.
    pub async fn dispatch(&self, line: &str, input: &mut dyn Prompt) -> Step {
        let command = match self.resolve(line) {
            Some(Selection::Exit) => return Step::Exit,
            Some(Selection::Run(command)) => command,
            None => {
                warn!("Unknown option {:?}", line.trim());
                println!("{}", "Unknown option. Ignored".yellow());
                return Step::Ignored;
            }
        };

        debug!("Executing {:?}", command);
        match self.execute(command, input).await {
            Ok(outcome) => {
                println!("{}", outcome.to_string().green());
                Step::Continue
            }
            Err(CommandError::Input(e)) if e.kind() == io::ErrorKind::UnexpectedEof => Step::Exit,
            Err(e) => {
                report(&e);
                Step::Continue
            }
        }
    }

    /// Reads and dispatches menu entries until exit or end of input.
    pub async fn run(&self, input: &mut dyn Prompt) {
        info!("Session started as {}", self.operator);
        loop {
            print!("{}", self.menu());
            let line = match input.read_line("Enter option : ") {
                Ok(line) => line,
                Err(e) => {
                    if e.kind() != io::ErrorKind::UnexpectedEof {
                        error!("Failed to read option: {}", e);
                    }
                    break;
                }
            };

            if self.dispatch(&line, input).await == Step::Exit {
                break;
            }
        }
        info!("Session ended");
    }
}

fn report(e: &CommandError) {
    match e.kind() {
        ErrorKind::Validation => {
            warn!("{}", e);
            println!("{}", e.to_string().yellow());
        }
        ErrorKind::Rejected => {
            error!("{}", e);
            println!("{}", e.to_string().red());
        }
        ErrorKind::Transport | ErrorKind::Input => {
            error!("{}", e);
            println!("{}", e.to_string().red().bold());
        }
    }
}
