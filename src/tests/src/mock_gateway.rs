//! In-memory ledger used by the integration tests.

use async_trait::async_trait;
use ethers::types::{Bytes, U256};
use ledger_core::{GatewayError, LedgerCall, LedgerGateway, NetworkAmount, TokenDescriptor, TokenId, TxReceipt};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const OWNER: &str = "0x00000000000000000000000000000000000000aa";
pub const ALICE: &str = "0x00000000000000000000000000000000000000bb";
pub const BOB: &str = "0x00000000000000000000000000000000000000cc";

/// A ledger contract kept in memory.
///
/// Every trait call increments `calls`, so tests can assert that validation
/// failures never reach the gateway.
pub struct MockGateway {
    account: String,
    owner: bool,
    tokens: Mutex<Vec<TokenDescriptor>>,
    balances: Mutex<HashMap<(String, TokenId), U256>>,
    paused: Mutex<HashSet<TokenId>>,
    dealers: Mutex<HashSet<(String, TokenId)>>,
    /// Tokens whose pause transaction is mined with a failed status
    failing_pause: Mutex<HashSet<TokenId>>,
    /// Bytes returned by the read-only probe
    probe_payload: Mutex<Vec<u8>>,
    /// Fail `token_name` for this id, to break registry population
    broken_token: Option<TokenId>,
    /// Fail balance and pause reads once any call has been submitted
    reads_fail_after_submit: bool,
    /// Error returned by `submit` instead of a receipt
    submit_error: Option<GatewayError>,
    pub calls: AtomicUsize,
    pub submits: AtomicUsize,
    pub raw_calls: AtomicUsize,
    nonce: AtomicUsize,
}

impl MockGateway {
    pub fn new(account: &str, owner: bool) -> Self {
        Self {
            account: account.to_string(),
            owner,
            tokens: Mutex::new(Vec::new()),
            balances: Mutex::new(HashMap::new()),
            paused: Mutex::new(HashSet::new()),
            dealers: Mutex::new(HashSet::new()),
            failing_pause: Mutex::new(HashSet::new()),
            probe_payload: Mutex::new(Vec::new()),
            broken_token: None,
            reads_fail_after_submit: false,
            submit_error: None,
            calls: AtomicUsize::new(0),
            submits: AtomicUsize::new(0),
            raw_calls: AtomicUsize::new(0),
            nonce: AtomicUsize::new(0),
        }
    }

    pub fn owner() -> Self {
        Self::new(OWNER, true)
    }

    pub fn dealer(account: &str) -> Self {
        Self::new(account, false)
    }

    pub fn with_token(self, token: TokenDescriptor) -> Self {
        self.tokens.lock().unwrap().push(token);
        self
    }

    pub fn with_balance(self, account: &str, token_id: TokenId, amount: u64) -> Self {
        self.set_balance(account, token_id, U256::from(amount));
        self
    }

    pub fn with_broken_token(mut self, token_id: TokenId) -> Self {
        self.broken_token = Some(token_id);
        self
    }

    pub fn with_reads_failing_after_submit(mut self) -> Self {
        self.reads_fail_after_submit = true;
        self
    }

    pub fn with_submit_error(mut self, error: GatewayError) -> Self {
        self.submit_error = Some(error);
        self
    }

    /// Makes pause of `token_id` fail on chain and the probe return `payload`.
    pub fn with_failing_pause(self, token_id: TokenId, payload: Vec<u8>) -> Self {
        self.failing_pause.lock().unwrap().insert(token_id);
        *self.probe_payload.lock().unwrap() = payload;
        self
    }

    pub fn balance(&self, account: &str, token_id: TokenId) -> U256 {
        self.balances
            .lock()
            .unwrap()
            .get(&(account.to_lowercase(), token_id))
            .copied()
            .unwrap_or_default()
    }

    pub fn set_balance(&self, account: &str, token_id: TokenId, amount: U256) {
        self.balances
            .lock()
            .unwrap()
            .insert((account.to_lowercase(), token_id), amount);
    }

    pub fn tokens(&self) -> Vec<TokenDescriptor> {
        self.tokens.lock().unwrap().clone()
    }

    pub fn paused(&self, token_id: TokenId) -> bool {
        self.paused.lock().unwrap().contains(&token_id)
    }

    pub fn is_dealer(&self, account: &str, token_id: TokenId) -> bool {
        self.dealers
            .lock()
            .unwrap()
            .contains(&(account.to_lowercase(), token_id))
    }

    pub fn submit_count(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn raw_call_count(&self) -> usize {
        self.raw_calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<(), GatewayError> {
        if self.reads_fail_after_submit && self.submit_count() > 0 {
            return Err(GatewayError::Transport("connection reset".to_string()));
        }
        Ok(())
    }

    fn receipt(&self, success: bool) -> TxReceipt {
        let n = self.nonce.fetch_add(1, Ordering::SeqCst) + 1;
        TxReceipt {
            success,
            transaction_hash: format!("0x{:064x}", n),
            raw_status: Some(success as u64),
            block_number: Some(n as u64),
            gas_used: Some(U256::from(21_000u64)),
        }
    }

    fn apply(&self, call: &LedgerCall) -> bool {
        match call {
            LedgerCall::Transfer { to, token_id, amount } => {
                let from_balance = self.balance(&self.account, *token_id);
                if self.paused(*token_id) || from_balance < amount.0 {
                    return false;
                }
                self.set_balance(&self.account, *token_id, from_balance - amount.0);
                let to_balance = self.balance(to, *token_id);
                self.set_balance(to, *token_id, to_balance + amount.0);
                true
            }
            LedgerCall::AddToken {
                token_id,
                name,
                decimals,
                metadata_url,
            } => {
                let mut tokens = self.tokens.lock().unwrap();
                if tokens.iter().any(|t| t.id == *token_id) {
                    return false;
                }
                tokens.push(TokenDescriptor::new(*token_id, name.clone(), *decimals, metadata_url.clone()));
                true
            }
            LedgerCall::Mint { token_id, amount } => {
                let balance = self.balance(&self.account, *token_id);
                self.set_balance(&self.account, *token_id, balance + amount.0);
                true
            }
            LedgerCall::Burn { token_id, amount } => {
                let balance = self.balance(&self.account, *token_id);
                if balance < amount.0 {
                    return false;
                }
                self.set_balance(&self.account, *token_id, balance - amount.0);
                true
            }
            LedgerCall::RegisterDealer { dealer, token_id } => self
                .dealers
                .lock()
                .unwrap()
                .insert((dealer.to_lowercase(), *token_id)),
            LedgerCall::UnregisterDealer { dealer, token_id } => self
                .dealers
                .lock()
                .unwrap()
                .remove(&(dealer.to_lowercase(), *token_id)),
            LedgerCall::Pause { token_id } => {
                if self.failing_pause.lock().unwrap().contains(token_id) {
                    return false;
                }
                self.paused.lock().unwrap().insert(*token_id)
            }
            LedgerCall::Resume { token_id } => self.paused.lock().unwrap().remove(token_id),
        }
    }

    fn token(&self, token_id: TokenId) -> Result<TokenDescriptor, GatewayError> {
        self.tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == token_id)
            .cloned()
            .ok_or_else(|| GatewayError::Reverted {
                message: format!("token {} does not exist", token_id),
                data: None,
            })
    }
}

#[async_trait]
impl LedgerGateway for MockGateway {
    fn account(&self) -> String {
        self.account.clone()
    }

    async fn is_owner(&self) -> Result<bool, GatewayError> {
        self.record();
        Ok(self.owner)
    }

    async fn token_ids(&self) -> Result<Vec<TokenId>, GatewayError> {
        self.record();
        Ok(self.tokens.lock().unwrap().iter().map(|t| t.id).collect())
    }

    async fn token_name(&self, token_id: TokenId) -> Result<String, GatewayError> {
        self.record();
        if self.broken_token == Some(token_id) {
            return Err(GatewayError::Transport("connection reset".to_string()));
        }
        Ok(self.token(token_id)?.name)
    }

    async fn token_decimals(&self, token_id: TokenId) -> Result<u8, GatewayError> {
        self.record();
        Ok(self.token(token_id)?.decimals)
    }

    async fn token_url(&self, token_id: TokenId) -> Result<String, GatewayError> {
        self.record();
        Ok(self.token(token_id)?.metadata_url)
    }

    async fn balance_of_self(&self, token_id: TokenId) -> Result<NetworkAmount, GatewayError> {
        self.record();
        self.check_read()?;
        Ok(NetworkAmount(self.balance(&self.account, token_id)))
    }

    async fn balance_of(&self, address: &str, token_id: TokenId) -> Result<NetworkAmount, GatewayError> {
        self.record();
        self.check_read()?;
        Ok(NetworkAmount(self.balance(address, token_id)))
    }

    async fn is_paused(&self, token_id: TokenId) -> Result<bool, GatewayError> {
        self.record();
        self.check_read()?;
        Ok(self.paused(token_id))
    }

    async fn submit(&self, call: &LedgerCall) -> Result<TxReceipt, GatewayError> {
        self.record();
        self.submits.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.submit_error {
            return Err(error.clone());
        }
        let success = self.apply(call);
        Ok(self.receipt(success))
    }

    fn encode_call(&self, call: &LedgerCall) -> Result<Bytes, GatewayError> {
        Ok(Bytes::from(call.function_name().as_bytes().to_vec()))
    }

    async fn raw_call(&self, _data: Bytes) -> Result<Bytes, GatewayError> {
        self.record();
        self.raw_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Bytes::from(self.probe_payload.lock().unwrap().clone()))
    }
}
