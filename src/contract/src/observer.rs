//! Background listener for events emitted by the ledger contract.
//!
//! The observer polls `eth_getLogs` for the contract address and decodes every
//! log against the bundled ABI. It shares nothing with the session loop except
//! the token registry, which it only reads to attach token names to events.

use crate::gateway::EthGateway;
use ethers::{
    abi::{Abi, RawLog, Token},
    core::types::{Address, Filter, Log, U256, U64},
    middleware::Middleware,
};
use ledger_core::{GatewayError, TokenDescriptor, TokenRegistry};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A decoded contract event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedEvent {
    /// Event name from the ABI
    pub name: String,
    /// Parameter names and rendered values, in ABI order
    pub fields: Vec<(String, String)>,
    /// The token the event refers to, when it is in the registry
    pub token: Option<TokenDescriptor>,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<String>,
}

impl fmt::Display for ObservedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(token) = &self.token {
            write!(f, " [{}]", token.name)?;
        }
        let fields: Vec<String> = self.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, " {}", fields.join(" "))?;
        if let Some(block) = self.block_number {
            write!(f, " (block {})", block)?;
        }
        Ok(())
    }
}

/// Decodes a log emitted by the ledger contract. Logs that match no ABI event are skipped.
pub fn describe_log(abi: &Abi, log: &Log, registry: &TokenRegistry) -> Option<ObservedEvent> {
    let topic = log.topics.first()?;
    let event = abi.events().find(|e| e.signature() == *topic)?;
    let parsed = event
        .parse_log(RawLog {
            topics: log.topics.clone(),
            data: log.data.to_vec(),
        })
        .ok()?;

    let mut token = None;
    let mut fields = Vec::with_capacity(parsed.params.len());
    for param in parsed.params {
        if let ("tokenId" | "id", Token::Uint(value)) = (param.name.as_str(), &param.value) {
            if *value <= U256::from(u64::MAX) {
                token = registry.get(value.as_u64());
            }
        }
        fields.push((param.name, render(&param.value)));
    }

    Some(ObservedEvent {
        name: event.name.clone(),
        fields,
        token,
        block_number: log.block_number.map(|b| b.as_u64()),
        transaction_hash: log.transaction_hash.map(|h| format!("{:#x}", h)),
    })
}

fn render(token: &Token) -> String {
    match token {
        Token::Address(a) => format!("{:#x}", a),
        Token::Uint(v) | Token::Int(v) => v.to_string(),
        Token::String(s) => s.clone(),
        Token::Bool(b) => b.to_string(),
        Token::Bytes(b) | Token::FixedBytes(b) => format!("0x{}", hex::encode(b)),
        other => format!("{:?}", other),
    }
}

/// Polls the ledger contract for events for the lifetime of the session.
pub struct EventObserver<M: Middleware> {
    client: Arc<M>,
    address: Address,
    abi: Abi,
    registry: Arc<TokenRegistry>,
    interval: Duration,
}

impl<M: Middleware + 'static> EventObserver<M> {
    /// Creates an observer for the gateway's contract.
    pub fn new(gateway: &EthGateway<M>, registry: Arc<TokenRegistry>, interval: Duration) -> Self {
        Self {
            client: gateway.client(),
            address: gateway.contract_address(),
            abi: gateway.abi().clone(),
            registry,
            interval,
        }
    }

    /// Starts polling in a background task. Every decoded event is passed to `report`.
    pub fn spawn<F>(self, report: F) -> JoinHandle<()>
    where
        F: Fn(&ObservedEvent) + Send + Sync + 'static,
    {
        tokio::spawn(async move {
            info!("Observing events of contract {:#x}", self.address);
            let mut next_block: Option<U64> = None;
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                ticker.tick().await;
                match self.poll(&mut next_block).await {
                    Ok(events) => {
                        for event in &events {
                            info!("Contract event: {}", event);
                            report(event);
                        }
                    }
                    Err(e) => warn!("Event poll failed: {}", e),
                }
            }
        })
    }

    /// Fetches logs from `next_block` up to the current head.
    ///
    /// The first successful poll only records the head, so events mined before
    /// the session started are not replayed.
    async fn poll(&self, next_block: &mut Option<U64>) -> Result<Vec<ObservedEvent>, GatewayError> {
        let head = self
            .client
            .get_block_number()
            .await
            .map_err(|e| GatewayError::Transport(format!("eth_blockNumber failed: {}", e)))?;

        let from = match *next_block {
            Some(from) => from,
            None => {
                *next_block = Some(head + U64::one());
                return Ok(Vec::new());
            }
        };
        if from > head {
            return Ok(Vec::new());
        }

        let filter = Filter::new().address(self.address).from_block(from).to_block(head);
        let logs = self
            .client
            .get_logs(&filter)
            .await
            .map_err(|e| GatewayError::Transport(format!("eth_getLogs failed: {}", e)))?;
        debug!("Fetched {} logs for blocks {}..={}", logs.len(), from, head);
        *next_block = Some(head + U64::one());

        Ok(logs
            .iter()
            .filter_map(|log| describe_log(&self.abi, log, &self.registry))
            .collect())
    }
}
