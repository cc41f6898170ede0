//! Tests for revert diagnostics.

use crate::mock_gateway::MockGateway;
use async_trait::async_trait;
use ethers::abi::{self, Token};
use ethers::types::{Bytes, U256};
use ledger_core::{
    diagnostics::{decode_revert, diagnose, ERROR_SELECTOR, PANIC_SELECTOR},
    GatewayError, LedgerCall, LedgerGateway, NetworkAmount, RevertReason, TokenId, TxReceipt,
};

#[test]
fn test_decode_error_string() {
    let mut payload = ERROR_SELECTOR.to_vec();
    payload.extend(abi::encode(&[Token::String("Not a dealer".to_string())]));
    assert_eq!(decode_revert(&payload), RevertReason::Message("Not a dealer".to_string()));
}

#[test]
fn test_decode_panic() {
    let mut payload = PANIC_SELECTOR.to_vec();
    payload.extend(abi::encode(&[Token::Uint(U256::from(0x12))]));
    let reason = decode_revert(&payload);
    assert_eq!(reason, RevertReason::Panic(U256::from(0x12)));
    assert!(reason.to_string().contains("division by zero"));
}

#[test]
fn test_decode_empty_short_and_garbage() {
    assert_eq!(decode_revert(&[]), RevertReason::Empty);
    assert_eq!(decode_revert(&[0x08, 0xc3]), RevertReason::Undecodable(vec![0x08, 0xc3]));

    // Right selector, truncated body
    let truncated = [&ERROR_SELECTOR[..], &[0u8; 10][..]].concat();
    assert_eq!(decode_revert(&truncated), RevertReason::Undecodable(truncated.clone()));

    let garbage = vec![0xff; 40];
    let reason = decode_revert(&garbage);
    assert_eq!(reason, RevertReason::Undecodable(garbage));
    assert!(reason.to_string().starts_with("reason undecodable, raw payload 0xffff"));
}

/// Tests that the probe replays the call through the gateway exactly once.
#[tokio::test]
async fn test_diagnose_probes_once() {
    let mut payload = ERROR_SELECTOR.to_vec();
    payload.extend(abi::encode(&[Token::String("Token already paused".to_string())]));
    let gateway = MockGateway::owner().with_failing_pause(3, payload);

    let reason = diagnose(&gateway, &LedgerCall::Pause { token_id: 3 }).await;

    assert_eq!(reason, RevertReason::Message("Token already paused".to_string()));
    assert_eq!(gateway.raw_call_count(), 1);
}

/// A gateway whose node refuses every call.
struct Unreachable;

#[async_trait]
impl LedgerGateway for Unreachable {
    fn account(&self) -> String {
        "0x00".to_string()
    }

    async fn is_owner(&self) -> Result<bool, GatewayError> {
        Err(down())
    }

    async fn token_ids(&self) -> Result<Vec<TokenId>, GatewayError> {
        Err(down())
    }

    async fn token_name(&self, _token_id: TokenId) -> Result<String, GatewayError> {
        Err(down())
    }

    async fn token_decimals(&self, _token_id: TokenId) -> Result<u8, GatewayError> {
        Err(down())
    }

    async fn token_url(&self, _token_id: TokenId) -> Result<String, GatewayError> {
        Err(down())
    }

    async fn balance_of_self(&self, _token_id: TokenId) -> Result<NetworkAmount, GatewayError> {
        Err(down())
    }

    async fn balance_of(&self, _address: &str, _token_id: TokenId) -> Result<NetworkAmount, GatewayError> {
        Err(down())
    }

    async fn is_paused(&self, _token_id: TokenId) -> Result<bool, GatewayError> {
        Err(down())
    }

    async fn submit(&self, _call: &LedgerCall) -> Result<TxReceipt, GatewayError> {
        Err(down())
    }

    fn encode_call(&self, _call: &LedgerCall) -> Result<Bytes, GatewayError> {
        Ok(Bytes::default())
    }

    async fn raw_call(&self, _data: Bytes) -> Result<Bytes, GatewayError> {
        Err(down())
    }
}

fn down() -> GatewayError {
    GatewayError::Transport("connection refused".to_string())
}

#[tokio::test]
async fn test_diagnose_never_fails() {
    let reason = diagnose(&Unreachable, &LedgerCall::Pause { token_id: 1 }).await;
    assert!(matches!(reason, RevertReason::ProbeFailed(ref msg) if msg.contains("connection refused")));
}
