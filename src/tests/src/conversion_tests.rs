//! Tests for amount conversion and the token registry.

use crate::mock_gateway::MockGateway;
use ethers::types::U256;
use ledger_core::{
    amount::{format_units, to_display, to_network},
    AmountError, DisplayAmount, GatewayError, NetworkAmount, TokenDescriptor, TokenRegistry,
};
use rand::Rng;

fn registry() -> TokenRegistry {
    TokenRegistry::with_tokens(vec![
        TokenDescriptor::new(1, "Cent", 2, "http://cent"),
        TokenDescriptor::new(2, "Whole", 0, "http://whole"),
        TokenDescriptor::new(3, "Wei", 18, "http://wei"),
    ])
}

/// Tests the two-decimal token example.
#[test]
fn test_two_decimals() {
    let registry = registry();
    assert_eq!(
        to_display(&registry, 1, NetworkAmount::from(500)).unwrap(),
        DisplayAmount::from(5)
    );
    assert_eq!(
        to_network(&registry, 1, DisplayAmount::from(5)).unwrap(),
        NetworkAmount::from(500)
    );
}

/// Tests that conversion round-trips for random amounts on every token.
#[test]
fn test_round_trip() {
    let registry = registry();
    let mut rng = rand::thread_rng();

    for _ in 0..200 {
        let x = DisplayAmount(U256::from(rng.gen::<u64>()));
        for token in registry.list() {
            let network = to_network(&registry, token.id, x).unwrap();
            assert_eq!(to_display(&registry, token.id, network).unwrap(), x);
        }
    }
}

#[test]
fn test_unknown_token() {
    let registry = registry();
    assert!(matches!(
        to_network(&registry, 9, DisplayAmount::from(1)),
        Err(AmountError::UnknownToken(9))
    ));
    assert!(matches!(
        to_display(&registry, 9, NetworkAmount::from(1)),
        Err(AmountError::UnknownToken(9))
    ));
}

#[test]
fn test_large_amounts_are_exact() {
    let registry = registry();
    let network = to_network(&registry, 3, DisplayAmount::from(u64::MAX)).unwrap();
    assert_eq!(format_units(network, 18), u64::MAX.to_string());
    assert_eq!(format_units(NetworkAmount::from(1), 18), "0.000000000000000001");
}

/// Tests registry population from the ledger.
#[tokio::test]
async fn test_populate() {
    let gateway = MockGateway::owner()
        .with_token(TokenDescriptor::new(5, "Gold", 0, "http://gold"))
        .with_token(TokenDescriptor::new(2, "Cent", 2, "http://cent"));

    let registry = TokenRegistry::with_tokens(vec![TokenDescriptor::new(9, "Stale", 1, "http://stale")]);
    assert_eq!(registry.populate(&gateway).await.unwrap(), 2);

    // Definition order is kept and stale entries are gone
    let ids: Vec<u64> = registry.list().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![5, 2]);
    assert_eq!(registry.decimals(2), Some(2));
    assert!(!registry.exists(9));
}

/// Tests that a failed fetch keeps what was already resolved.
#[tokio::test]
async fn test_populate_keeps_partial_results() {
    let gateway = MockGateway::owner()
        .with_token(TokenDescriptor::new(1, "Cent", 2, "http://cent"))
        .with_token(TokenDescriptor::new(2, "Broken", 0, "http://broken"))
        .with_token(TokenDescriptor::new(3, "Gold", 0, "http://gold"))
        .with_broken_token(2);

    let registry = TokenRegistry::new();
    let result = registry.populate(&gateway).await;

    assert!(matches!(result, Err(GatewayError::Transport(_))));
    assert_eq!(registry.len(), 1);
    assert!(registry.exists(1));
    assert!(!registry.exists(3));
}
