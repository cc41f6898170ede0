//! Balance queries.

use super::{Context, Outcome};
use crate::errors::CommandError;
use crate::input::Prompt;
use ledger_core::Operator;
use tracing::info;

/// Shows the balance of the connected account.
///
/// A dealer queries with the implicit sender; the owner passes its own address.
pub async fn own(ctx: &Context, operator: Operator, input: &mut dyn Prompt) -> Result<Outcome, CommandError> {
    let token = ctx.read_token_id(input)?;
    let account = ctx.gateway.account();

    info!("Getting balance of token {} for {}", token.id, account);
    let amount = match operator {
        Operator::Dealer => ctx.gateway.balance_of_self(token.id).await?,
        Operator::Owner => ctx.gateway.balance_of(&account, token.id).await?,
    };

    Ok(Outcome::Balance { account, token, amount })
}

/// Shows the balance of an arbitrary account.
pub async fn other(ctx: &Context, input: &mut dyn Prompt) -> Result<Outcome, CommandError> {
    let token = ctx.read_token_id(input)?;
    let account = ctx.read_address(input, "Enter account address : ")?;

    info!("Getting balance of token {} for {}", token.id, account);
    let amount = ctx.gateway.balance_of(&account, token.id).await?;

    Ok(Outcome::Balance { account, token, amount })
}
