//! Token definition.

use super::{parse_token_id, Context, Outcome};
use crate::errors::CommandError;
use crate::input::Prompt;
use ledger_core::{LedgerCall, TokenDescriptor};
use tracing::{info, warn};

/// Defines a new token on the ledger and records it in the registry.
pub async fn run(ctx: &Context, input: &mut dyn Prompt) -> Result<Outcome, CommandError> {
    let token_id = parse_token_id(&input.read_line("Enter new token id : ")?)?;
    if ctx.registry.exists(token_id) {
        return Err(CommandError::Validation(format!("Token id {} already exists", token_id)));
    }

    let name = input.read_line("Enter token name : ")?;
    let name = name.trim();
    if name.is_empty() {
        return Err(CommandError::Validation("Token name must not be empty".to_string()));
    }

    let decimals = input.read_line("Enter decimals : ")?;
    let decimals = decimals.trim().parse::<u8>().map_err(|_| {
        CommandError::Validation(format!("'{}' is not a valid number of decimals (0-255)", decimals.trim()))
    })?;

    let metadata_url = input.read_line("Enter token URL : ")?;
    let token = TokenDescriptor::new(token_id, name, decimals, metadata_url.trim());

    info!("Adding token {}", token);
    let receipt = ctx
        .submit(
            LedgerCall::AddToken {
                token_id,
                name: token.name.clone(),
                decimals,
                metadata_url: token.metadata_url.clone(),
            },
            false,
        )
        .await?;

    if !ctx.registry.append(token.clone()) {
        warn!("Token {} was already in the registry", token_id);
    }

    Ok(Outcome::TokenAdded { token, receipt })
}
