//! Conversion between display amounts and network amounts.
//!
//! `network = display * 10^decimals`. All arithmetic is exact 256-bit integer
//! arithmetic; overflow is an error, never a wrap.

use crate::errors::AmountError;
use crate::registry::TokenRegistry;
use crate::types::{DisplayAmount, NetworkAmount, TokenId};
use ethers::types::U256;

/// Scales a display amount up to network units.
pub fn to_network(
    registry: &TokenRegistry,
    token_id: TokenId,
    amount: DisplayAmount,
) -> Result<NetworkAmount, AmountError> {
    let decimals = registry
        .decimals(token_id)
        .ok_or(AmountError::UnknownToken(token_id))?;
    scale_up(amount, decimals)
}

/// Scales a network amount down to display units, dropping any sub-unit remainder.
pub fn to_display(
    registry: &TokenRegistry,
    token_id: TokenId,
    amount: NetworkAmount,
) -> Result<DisplayAmount, AmountError> {
    let decimals = registry
        .decimals(token_id)
        .ok_or(AmountError::UnknownToken(token_id))?;
    Ok(scale_down(amount, decimals))
}

pub fn scale_up(amount: DisplayAmount, decimals: u8) -> Result<NetworkAmount, AmountError> {
    let overflow = || AmountError::Overflow {
        amount: amount.to_string(),
        decimals,
    };
    let factor = unit(decimals).ok_or_else(overflow)?;
    amount.0.checked_mul(factor).map(NetworkAmount).ok_or_else(overflow)
}

pub fn scale_down(amount: NetworkAmount, decimals: u8) -> DisplayAmount {
    match unit(decimals) {
        Some(factor) => DisplayAmount(amount.0 / factor),
        // 10^decimals exceeds every representable amount
        None => DisplayAmount(U256::zero()),
    }
}

/// Renders a network amount as an exact decimal number in display units.
///
/// Trailing fractional zeros are trimmed: `format_units(525, 2) == "5.25"`,
/// `format_units(500, 2) == "5"`.
pub fn format_units(amount: NetworkAmount, decimals: u8) -> String {
    let digits = amount.0.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Parses an operator-entered display amount. Only plain non-negative integers are accepted.
pub fn parse_display(input: &str) -> Result<DisplayAmount, AmountError> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::Invalid(format!(
            "'{}' is not a whole non-negative number",
            input
        )));
    }
    U256::from_dec_str(input)
        .map(DisplayAmount)
        .map_err(|e| AmountError::Invalid(format!("'{}': {}", input, e)))
}

fn unit(decimals: u8) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(decimals))
}
