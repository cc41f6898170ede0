//! Pause and resume.

use super::{read_after_confirmation, Context, Outcome};
use crate::errors::CommandError;
use crate::input::Prompt;
use ledger_core::LedgerCall;
use tracing::info;

/// Pauses a token. A rejected pause is always diagnosed.
pub async fn pause(ctx: &Context, input: &mut dyn Prompt) -> Result<Outcome, CommandError> {
    let token = ctx.read_token_id(input)?;

    info!("Pausing token {}", token.id);
    let receipt = ctx.submit(LedgerCall::Pause { token_id: token.id }, true).await?;
    let paused = read_after_confirmation("pause status", ctx.gateway.is_paused(token.id)).await;

    Ok(Outcome::Paused { token, paused, receipt })
}

pub async fn resume(ctx: &Context, input: &mut dyn Prompt) -> Result<Outcome, CommandError> {
    let token = ctx.read_token_id(input)?;

    info!("Resuming token {}", token.id);
    let receipt = ctx.submit(LedgerCall::Resume { token_id: token.id }, false).await?;

    Ok(Outcome::Resumed { token, receipt })
}
