//! Recovery of revert reasons for rejected calls.
//!
//! Rejected transactions often surface only as a failed status. Replaying the
//! identical call read-only makes the node execute it again and return the
//! revert payload, which is decoded here on a best-effort basis.

use crate::gateway::LedgerGateway;
use crate::types::LedgerCall;
use ethers::abi::{self, ParamType, Token};
use ethers::types::U256;
use std::fmt;
use tracing::{debug, warn};

/// Selector of `Error(string)`.
pub const ERROR_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Selector of `Panic(uint256)`.
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// Outcome of a diagnostic probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertReason {
    /// The contract reverted with a message.
    Message(String),
    /// The contract hit a compiler-inserted check.
    Panic(U256),
    /// The probe returned nothing.
    Empty,
    /// The probe returned bytes in no known revert format.
    Undecodable(Vec<u8>),
    /// The probe itself could not be executed.
    ProbeFailed(String),
}

impl fmt::Display for RevertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevertReason::Message(msg) => write!(f, "reverted: {}", msg),
            RevertReason::Panic(code) => write!(f, "panic 0x{:02x} ({})", code, panic_description(*code)),
            RevertReason::Empty => write!(f, "no reason returned"),
            RevertReason::Undecodable(raw) => write!(f, "reason undecodable, raw payload 0x{}", hex::encode(raw)),
            RevertReason::ProbeFailed(msg) => write!(f, "diagnostic call failed: {}", msg),
        }
    }
}

/// Replays `call` read-only and decodes the result. Never fails.
pub async fn diagnose(gateway: &dyn LedgerGateway, call: &LedgerCall) -> RevertReason {
    let data = match gateway.encode_call(call) {
        Ok(data) => data,
        Err(e) => {
            warn!("Could not encode {} for diagnostics: {}", call.function_name(), e);
            return RevertReason::ProbeFailed(e.to_string());
        }
    };

    match gateway.raw_call(data).await {
        Ok(payload) => {
            debug!("Diagnostic payload for {}: 0x{}", call.function_name(), hex::encode(&payload));
            decode_revert(&payload)
        }
        Err(e) => {
            warn!("Diagnostic call for {} failed: {}", call.function_name(), e);
            RevertReason::ProbeFailed(e.to_string())
        }
    }
}

/// Decodes a revert payload.
pub fn decode_revert(payload: &[u8]) -> RevertReason {
    if payload.is_empty() {
        return RevertReason::Empty;
    }
    if payload.len() < 4 {
        return RevertReason::Undecodable(payload.to_vec());
    }

    let (selector, body) = payload.split_at(4);
    let decoded = if selector == ERROR_SELECTOR {
        match abi::decode(&[ParamType::String], body).ok().and_then(single) {
            Some(Token::String(msg)) => Some(RevertReason::Message(msg)),
            _ => None,
        }
    } else if selector == PANIC_SELECTOR {
        match abi::decode(&[ParamType::Uint(256)], body).ok().and_then(single) {
            Some(Token::Uint(code)) => Some(RevertReason::Panic(code)),
            _ => None,
        }
    } else {
        None
    };

    decoded.unwrap_or_else(|| RevertReason::Undecodable(payload.to_vec()))
}

fn single(mut tokens: Vec<Token>) -> Option<Token> {
    if tokens.len() == 1 {
        tokens.pop()
    } else {
        None
    }
}

fn panic_description(code: U256) -> &'static str {
    if code > U256::from(u8::MAX) {
        return "unknown panic code";
    }
    match code.as_u32() {
        0x01 => "assertion failed",
        0x11 => "arithmetic overflow or underflow",
        0x12 => "division by zero",
        0x21 => "invalid enum value",
        0x22 => "corrupted storage byte array",
        0x31 => "pop on empty array",
        0x32 => "array index out of bounds",
        0x41 => "out of memory",
        0x51 => "call to uninitialized function",
        _ => "unknown panic code",
    }
}
