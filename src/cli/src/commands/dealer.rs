//! Dealer registration.

use super::{Context, Outcome};
use crate::errors::CommandError;
use crate::input::Prompt;
use ledger_core::LedgerCall;
use tracing::info;

pub async fn register(ctx: &Context, input: &mut dyn Prompt) -> Result<Outcome, CommandError> {
    let token = ctx.read_token_id(input)?;
    let dealer = ctx.read_address(input, "Enter dealer account address : ")?;

    info!("Registering dealer {} for token {}", dealer, token.id);
    let receipt = ctx
        .submit(
            LedgerCall::RegisterDealer {
                dealer: dealer.clone(),
                token_id: token.id,
            },
            false,
        )
        .await?;

    Ok(Outcome::DealerRegistered { dealer, token, receipt })
}

pub async fn unregister(ctx: &Context, input: &mut dyn Prompt) -> Result<Outcome, CommandError> {
    let token = ctx.read_token_id(input)?;
    let dealer = ctx.read_address(input, "Enter dealer account address : ")?;

    info!("Unregistering dealer {} for token {}", dealer, token.id);
    let receipt = ctx
        .submit(
            LedgerCall::UnregisterDealer {
                dealer: dealer.clone(),
                token_id: token.id,
            },
            false,
        )
        .await?;

    Ok(Outcome::DealerUnregistered { dealer, token, receipt })
}
