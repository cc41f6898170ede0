//! Tests for the contract crate against a live node.
//!
//! These need a local development node on `http://localhost:8545` with the
//! ledger contract deployed at `LEDGERCTL_CONTRACT` and the deployer's key in
//! `LEDGERCTL_PRIVATE_KEY`.

use ethers::signers::LocalWallet;
use ledger_cli::config::{ENV_CONTRACT, ENV_PRIVATE_KEY};
use ledger_contract::{connect, EthGateway, SignerClient, TxSettings};
use ledger_core::{
    diagnostics::diagnose, DisplayAmount, LedgerCall, LedgerGateway, RevertReason, TokenRegistry,
};
use rand::Rng;
use serial_test::serial;
use std::time::Duration;
use tokio::runtime::Runtime;

const RPC_URL: &str = "http://localhost:8545";

async fn live_gateway() -> anyhow::Result<EthGateway<SignerClient>> {
    let contract = std::env::var(ENV_CONTRACT)?;
    let wallet = std::env::var(ENV_PRIVATE_KEY)?.parse::<LocalWallet>()?;
    let settings = TxSettings {
        poll_interval: Duration::from_millis(200),
        ..Default::default()
    };
    Ok(connect(RPC_URL, &contract, wallet, settings).await?)
}

/// Tests connecting and reading the token list.
#[test]
#[serial]
#[ignore] // Requires a local Ethereum node
fn test_connect_and_populate() {
    let rt = Runtime::new().unwrap();

    rt.block_on(async {
        let gateway = live_gateway().await.unwrap();
        assert!(gateway.is_owner().await.unwrap());

        let registry = TokenRegistry::new();
        let count = registry.populate(&gateway).await.unwrap();
        assert_eq!(count, registry.len());
    });
}

/// Tests adding, minting and pausing a fresh token.
#[test]
#[serial]
#[ignore] // Requires a local Ethereum node
fn test_token_lifecycle() {
    let rt = Runtime::new().unwrap();

    rt.block_on(async {
        let gateway = live_gateway().await.unwrap();
        let token_id = rand::thread_rng().gen_range(1_000..1_000_000u64);

        let receipt = gateway.add_token(token_id, "Test", 2, "http://test").await.unwrap();
        assert!(receipt.success);

        let registry = TokenRegistry::new();
        registry.populate(&gateway).await.unwrap();
        let amount = ledger_core::amount::to_network(&registry, token_id, DisplayAmount::from(5)).unwrap();

        let before = gateway.balance_of_self(token_id).await.unwrap();
        assert!(gateway.mint(token_id, amount).await.unwrap().success);
        let after = gateway.balance_of_self(token_id).await.unwrap();
        assert_eq!(after.0, before.0 + amount.0);

        assert!(gateway.pause(token_id).await.unwrap().success);
        assert!(gateway.is_paused(token_id).await.unwrap());

        // A second pause is rejected and the probe recovers why
        let call = LedgerCall::Pause { token_id };
        match gateway.submit(&call).await {
            Ok(receipt) => assert!(!receipt.success),
            Err(e) => assert!(e.is_rejection()),
        }
        let reason = diagnose(&gateway, &call).await;
        assert!(!matches!(reason, RevertReason::ProbeFailed(_)));

        assert!(gateway.resume(token_id).await.unwrap().success);
    });
}
