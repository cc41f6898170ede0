//! Token transfer.

use super::{read_after_confirmation, BalanceChange, Context, Outcome};
use crate::errors::CommandError;
use crate::input::Prompt;
use futures::try_join;
use ledger_core::{GatewayError, LedgerCall, NetworkAmount, Operator, TokenId};
use tracing::info;

/// Transfers tokens from the connected account.
///
/// A dealer sees its own balance before and after. The owner also sees the
/// recipient's side.
pub async fn run(ctx: &Context, operator: Operator, input: &mut dyn Prompt) -> Result<Outcome, CommandError> {
    let token = ctx.read_token_id(input)?;
    let to = ctx.read_address(input, "Enter target account address : ")?;
    let (amount, network) = ctx.read_amount(input, &token, "Enter amount to transfer : ")?;
    let from = ctx.gateway.account();

    let (sender_before, recipient_before) = balances(ctx, operator, &from, &to, token.id).await?;

    info!("Transferring {} of token {} from {} to {}", amount, token.id, from, to);
    let receipt = ctx
        .submit(
            LedgerCall::Transfer {
                to: to.clone(),
                token_id: token.id,
                amount: network,
            },
            false,
        )
        .await?;

    let after = read_after_confirmation("balances", balances(ctx, operator, &from, &to, token.id)).await;

    let recipient = recipient_before.map(|before| BalanceChange {
        account: to.clone(),
        before,
        after: after.and_then(|(_, recipient)| recipient),
    });

    Ok(Outcome::Transferred {
        token,
        amount,
        to,
        sender: BalanceChange {
            account: from,
            before: sender_before,
            after: after.map(|(sender, _)| sender),
        },
        recipient,
        receipt,
    })
}

async fn balances(
    ctx: &Context,
    operator: Operator,
    from: &str,
    to: &str,
    token_id: TokenId,
) -> Result<(NetworkAmount, Option<NetworkAmount>), GatewayError> {
    match operator {
        Operator::Dealer => Ok((ctx.gateway.balance_of_self(token_id).await?, None)),
        Operator::Owner => {
            let (sender, recipient) = try_join!(
                ctx.gateway.balance_of(from, token_id),
                ctx.gateway.balance_of(to, token_id)
            )?;
            Ok((sender, Some(recipient)))
        }
    }
}
