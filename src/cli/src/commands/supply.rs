//! Mint and burn.

use super::{read_after_confirmation, BalanceChange, Context, Outcome};
use crate::errors::CommandError;
use crate::input::Prompt;
use ledger_core::{amount::format_units, LedgerCall};
use tracing::info;

/// Mints new supply of a token to the owner.
pub async fn mint(ctx: &Context, input: &mut dyn Prompt) -> Result<Outcome, CommandError> {
    let token = ctx.read_token_id(input)?;
    let (amount, network) = ctx.read_amount(input, &token, "Enter amount to mint : ")?;
    let account = ctx.gateway.account();

    let before = ctx.gateway.balance_of(&account, token.id).await?;
    info!("Minting {} of token {}", amount, token.id);
    let receipt = ctx
        .submit(
            LedgerCall::Mint {
                token_id: token.id,
                amount: network,
            },
            false,
        )
        .await?;
    let after = read_after_confirmation("balance", ctx.gateway.balance_of(&account, token.id)).await;

    Ok(Outcome::Minted {
        token,
        amount,
        balance: BalanceChange { account, before, after },
        receipt,
    })
}

/// Burns supply of a token held by the owner.
pub async fn burn(ctx: &Context, input: &mut dyn Prompt) -> Result<Outcome, CommandError> {
    let token = ctx.read_token_id(input)?;
    let account = ctx.gateway.account();

    let before = ctx.gateway.balance_of(&account, token.id).await?;
    println!(
        "Available balance : {} {}",
        format_units(before, token.decimals),
        token.name
    );

    let (amount, network) = ctx.read_amount(input, &token, "Enter amount to burn : ")?;
    info!("Burning {} of token {}", amount, token.id);
    let receipt = ctx
        .submit(
            LedgerCall::Burn {
                token_id: token.id,
                amount: network,
            },
            false,
        )
        .await?;
    let after = read_after_confirmation("balance", ctx.gateway.balance_of(&account, token.id)).await;

    Ok(Outcome::Burned {
        token,
        amount,
        balance: BalanceChange { account, before, after },
        receipt,
    })
}
