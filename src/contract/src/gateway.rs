//! Network implementation of the ledger gateway.

use crate::bindings::LedgerContract;
use async_trait::async_trait;
use ethers::{
    abi::{Abi, Detokenize},
    contract::{ContractCall, ContractError},
    core::types::{
        transaction::eip2718::TypedTransaction, Address, BlockNumber, Bytes, TransactionRequest, U256,
    },
    middleware::{Middleware, SignerMiddleware},
    providers::{Http, MiddlewareError, Provider},
    signers::{LocalWallet, Signer},
};
use ledger_core::{GatewayError, LedgerCall, LedgerGateway, NetworkAmount, TokenId, TxReceipt};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client type used against a live node.
pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// How state-changing transactions are built and confirmed.
#[derive(Debug, Clone)]
pub struct TxSettings {
    /// Gas limit for every transaction; estimated by the node when unset
    pub gas_limit: Option<U256>,
    /// Gas price for every transaction; taken from the node when unset
    pub gas_price: Option<U256>,
    /// Send pre-EIP-1559 transactions
    pub legacy: bool,
    /// Number of receipt polls before giving up
    pub poll_attempts: u32,
    /// Delay between receipt polls
    pub poll_interval: Duration,
}

impl Default for TxSettings {
    fn default() -> Self {
        Self {
            gas_limit: Some(U256::from(430_000u64)),
            gas_price: Some(U256::zero()),
            legacy: true,
            poll_attempts: 40,
            poll_interval: Duration::from_secs(1),
        }
    }
}

impl TxSettings {
    /// Total time a transaction may take to confirm.
    pub fn confirmation_budget(&self) -> Duration {
        self.poll_interval * self.poll_attempts
    }
}

/// Gateway to a deployed ledger contract.
pub struct EthGateway<M: Middleware> {
    /// The ledger contract
    contract: LedgerContract<M>,
    /// The client used for raw calls
    client: Arc<M>,
    /// The connected identity
    account: Address,
    settings: TxSettings,
}

impl<M: Middleware + 'static> EthGateway<M> {
    /// Creates a new gateway.
    pub fn new(
        client: Arc<M>,
        contract_address: &str,
        account: Address,
        settings: TxSettings,
    ) -> Result<Self, GatewayError> {
        let contract_address = Address::from_str(contract_address.trim()).map_err(|e| {
            GatewayError::InvalidAddress(format!("Invalid contract address '{}': {}", contract_address, e))
        })?;

        let contract = LedgerContract::new(contract_address, client.clone())?;

        Ok(Self {
            contract,
            client,
            account,
            settings,
        })
    }

    pub fn contract_address(&self) -> Address {
        self.contract.address()
    }

    pub fn client(&self) -> Arc<M> {
        self.client.clone()
    }

    pub fn abi(&self) -> &Abi {
        self.contract.abi()
    }

    /// Builds the contract call for a state-changing operation, with gas settings applied.
    fn state_call(&self, call: &LedgerCall) -> Result<ContractCall<M, ()>, GatewayError> {
        let tx = match call {
            LedgerCall::Transfer { to, token_id, amount } => {
                self.contract.transfer(parse_address(to)?, U256::from(*token_id), amount.0)?
            }
            LedgerCall::AddToken {
                token_id,
                name,
                decimals,
                metadata_url,
            } => self.contract.add_new_token_definition(
                U256::from(*token_id),
                name.clone(),
                U256::from(*decimals),
                metadata_url.clone(),
            )?,
            LedgerCall::Mint { token_id, amount } => {
                self.contract.mint(U256::from(*token_id), amount.0, Bytes::new())?
            }
            LedgerCall::Burn { token_id, amount } => self.contract.burn(U256::from(*token_id), amount.0)?,
            LedgerCall::RegisterDealer { dealer, token_id } => {
                self.contract.register_dealer(parse_address(dealer)?, U256::from(*token_id))?
            }
            LedgerCall::UnregisterDealer { dealer, token_id } => {
                self.contract.unregister_dealer(parse_address(dealer)?, U256::from(*token_id))?
            }
            LedgerCall::Pause { token_id } => self.contract.pause(U256::from(*token_id))?,
            LedgerCall::Resume { token_id } => self.contract.resume(U256::from(*token_id))?,
        };

        let mut tx = tx.from(self.account);
        if self.settings.legacy {
            tx = tx.legacy();
        }
        if let Some(gas) = self.settings.gas_limit {
            tx = tx.gas(gas);
        }
        if let Some(price) = self.settings.gas_price {
            tx = tx.gas_price(price);
        }
        Ok(tx)
    }

    async fn read<D: Detokenize>(&self, call: ContractCall<M, D>, what: &str) -> Result<D, GatewayError> {
        call.from(self.account)
            .call()
            .await
            .map_err(|e| contract_error(what, e))
    }
}

#[async_trait]
impl<M: Middleware + 'static> LedgerGateway for EthGateway<M> {
    fn account(&self) -> String {
        ethers::utils::to_checksum(&self.account, None)
    }

    async fn is_owner(&self) -> Result<bool, GatewayError> {
        self.read(self.contract.is_owner()?, "isOwner").await
    }

    async fn token_ids(&self) -> Result<Vec<TokenId>, GatewayError> {
        let ids = self.read(self.contract.get_all_token_ids()?, "getAllTokenIds").await?;
        ids.into_iter().map(token_id_from_u256).collect()
    }

    async fn token_name(&self, token_id: TokenId) -> Result<String, GatewayError> {
        self.read(self.contract.get_token_name(U256::from(token_id))?, "getTokenName")
            .await
    }

    async fn token_decimals(&self, token_id: TokenId) -> Result<u8, GatewayError> {
        let decimals = self
            .read(self.contract.get_decimals(U256::from(token_id))?, "getDecimals")
            .await?;
        decimals_from_u256(token_id, decimals)
    }

    async fn token_url(&self, token_id: TokenId) -> Result<String, GatewayError> {
        self.read(self.contract.get_token_url(U256::from(token_id))?, "getTTF_URL")
            .await
    }

    async fn balance_of_self(&self, token_id: TokenId) -> Result<NetworkAmount, GatewayError> {
        self.read(self.contract.balance_of_caller(U256::from(token_id))?, "balanceOf")
            .await
            .map(NetworkAmount)
    }

    async fn balance_of(&self, address: &str, token_id: TokenId) -> Result<NetworkAmount, GatewayError> {
        let account = parse_address(address)?;
        self.read(self.contract.balance_of(account, U256::from(token_id))?, "balanceOf")
            .await
            .map(NetworkAmount)
    }

    async fn is_paused(&self, token_id: TokenId) -> Result<bool, GatewayError> {
        self.read(self.contract.is_paused(U256::from(token_id))?, "isPaused").await
    }

    async fn submit(&self, call: &LedgerCall) -> Result<TxReceipt, GatewayError> {
        let what = call.function_name();
        let tx = self.state_call(call)?;
        info!("Submitting {} for token {}", what, call.token_id());

        let pending = tx.send().await.map_err(|e| contract_error(what, e))?;
        let tx_hash = pending.tx_hash();
        debug!("{} sent as {:#x}", what, tx_hash);

        // Wait for the transaction to be mined, bounded by the polling budget
        let pending = pending
            .interval(self.settings.poll_interval)
            .retries(self.settings.poll_attempts as usize);
        let receipt = tokio::time::timeout(self.settings.confirmation_budget(), pending)
            .await
            .map_err(|_| {
                GatewayError::Timeout(format!(
                    "{} transaction {:#x} not confirmed after {} polls",
                    what, tx_hash, self.settings.poll_attempts
                ))
            })?
            .map_err(|e| GatewayError::Transport(format!("{} transaction {:#x} failed: {}", what, tx_hash, e)))?
            .ok_or_else(|| GatewayError::Transport(format!("Receipt for {:#x} not found", tx_hash)))?;

        let receipt = TxReceipt::from(&receipt);
        if !receipt.success {
            warn!("{} transaction {} mined with status {:?}", what, receipt.transaction_hash, receipt.raw_status);
        }
        Ok(receipt)
    }

    fn encode_call(&self, call: &LedgerCall) -> Result<Bytes, GatewayError> {
        self.state_call(call)?
            .calldata()
            .ok_or_else(|| GatewayError::Abi(format!("No call data for {}", call.function_name())))
    }

    async fn raw_call(&self, data: Bytes) -> Result<Bytes, GatewayError> {
        let tx: TypedTransaction = TransactionRequest::new()
            .from(self.account)
            .to(self.contract.address())
            .data(data)
            .into();

        match self.client.call(&tx, Some(BlockNumber::Latest.into())).await {
            Ok(output) => Ok(output),
            // A reverting eth_call comes back as an RPC error carrying the payload
            Err(e) => match e.as_error_response().and_then(|resp| resp.as_revert_data()) {
                Some(payload) => Ok(payload),
                None => Err(GatewayError::Transport(format!("eth_call failed: {}", e))),
            },
        }
    }
}

/// Connects to a node and creates a signing gateway for the ledger contract.
pub async fn connect(
    rpc_url: &str,
    contract_address: &str,
    wallet: LocalWallet,
    settings: TxSettings,
) -> Result<EthGateway<SignerClient>, GatewayError> {
    // Create a provider
    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| GatewayError::Transport(format!("Failed to create provider for {}: {}", rpc_url, e)))?
        .interval(settings.poll_interval);

    // Make sure the node is reachable before anything else
    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| GatewayError::Transport(format!("Cannot reach {}: {}", rpc_url, e)))?;
    if chain_id != U256::from(wallet.chain_id()) {
        warn!(
            "Node reports chain id {} but the signer is configured for {}",
            chain_id,
            wallet.chain_id()
        );
    }

    let account = wallet.address();
    info!("Connected to {} (chain {}) as {:#x}", rpc_url, chain_id, account);

    let signer = SignerMiddleware::new(provider, wallet);
    EthGateway::new(Arc::new(signer), contract_address, account, settings)
}

fn parse_address(address: &str) -> Result<Address, GatewayError> {
    Address::from_str(address.trim())
        .map_err(|e| GatewayError::InvalidAddress(format!("'{}': {}", address, e)))
}

fn token_id_from_u256(id: U256) -> Result<TokenId, GatewayError> {
    if id > U256::from(u64::MAX) {
        return Err(GatewayError::Decode(format!("Token id {} does not fit 64 bits", id)));
    }
    Ok(id.as_u64())
}

fn decimals_from_u256(token_id: TokenId, decimals: U256) -> Result<u8, GatewayError> {
    if decimals > U256::from(u8::MAX) {
        return Err(GatewayError::Decode(format!(
            "Token {} reports {} decimals",
            token_id, decimals
        )));
    }
    Ok(decimals.as_u32() as u8)
}

fn contract_error<M: Middleware>(what: &str, e: ContractError<M>) -> GatewayError {
    if e.is_revert() {
        GatewayError::Reverted {
            message: format!("{}: {}", what, e),
            data: e.as_revert().cloned(),
        }
    } else {
        GatewayError::Transport(format!("{} failed: {}", what, e))
    }
}
