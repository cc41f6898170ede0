/// Ethereum contract bindings for the multi-token ledger.
use ethers::{
    abi::{Abi, Detokenize, Tokenize},
    contract::{Contract, ContractCall},
    prelude::*,
    utils::id,
};
use ledger_core::GatewayError;
use std::sync::Arc;

/// ABI of the deployed ledger contract.
pub const LEDGER_ABI: &str = include_str!("../contracts/MultiTokenLedger.abi");

// `balanceOf` is overloaded, so both variants are addressed by selector.
const BALANCE_OF_CALLER: &str = "balanceOf(uint256)";
const BALANCE_OF_ACCOUNT: &str = "balanceOf(address,uint256)";

/// Parses the bundled ABI.
pub fn ledger_abi() -> Result<Abi, GatewayError> {
    serde_json::from_str(LEDGER_ABI).map_err(|e| GatewayError::Abi(format!("Invalid ABI: {}", e)))
}

/// The ledger contract interface
pub struct LedgerContract<M: Middleware> {
    contract: Contract<M>,
}

impl<M: Middleware> LedgerContract<M> {
    /// Creates a new instance of the contract
    pub fn new(address: Address, client: impl Into<Arc<M>>) -> Result<Self, GatewayError> {
        let contract = Contract::new(address, ledger_abi()?, client.into());
        Ok(Self { contract })
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub fn abi(&self) -> &Abi {
        self.contract.abi()
    }

    fn method<T: Tokenize, D: Detokenize>(&self, name: &str, args: T) -> Result<ContractCall<M, D>, GatewayError> {
        self.contract
            .method(name, args)
            .map_err(|e| GatewayError::Abi(format!("{}: {}", name, e)))
    }

    fn method_by_signature<T: Tokenize, D: Detokenize>(
        &self,
        signature: &str,
        args: T,
    ) -> Result<ContractCall<M, D>, GatewayError> {
        self.contract
            .method_hash(id(signature), args)
            .map_err(|e| GatewayError::Abi(format!("{}: {}", signature, e)))
    }

    /// Checks whether the caller owns the contract
    pub fn is_owner(&self) -> Result<ContractCall<M, bool>, GatewayError> {
        self.method("isOwner", ())
    }

    /// Lists every defined token ID
    pub fn get_all_token_ids(&self) -> Result<ContractCall<M, Vec<U256>>, GatewayError> {
        self.method("getAllTokenIds", ())
    }

    pub fn get_token_name(&self, token_id: U256) -> Result<ContractCall<M, String>, GatewayError> {
        self.method("getTokenName", (token_id,))
    }

    pub fn get_decimals(&self, token_id: U256) -> Result<ContractCall<M, U256>, GatewayError> {
        self.method("getDecimals", (token_id,))
    }

    /// Gets the metadata URL of a token definition
    pub fn get_token_url(&self, token_id: U256) -> Result<ContractCall<M, String>, GatewayError> {
        self.method("getTTF_URL", (token_id,))
    }

    /// Gets the balance of `msg.sender`
    pub fn balance_of_caller(&self, token_id: U256) -> Result<ContractCall<M, U256>, GatewayError> {
        self.method_by_signature(BALANCE_OF_CALLER, (token_id,))
    }

    /// Gets the balance of an arbitrary account
    pub fn balance_of(&self, account: Address, token_id: U256) -> Result<ContractCall<M, U256>, GatewayError> {
        self.method_by_signature(BALANCE_OF_ACCOUNT, (account, token_id))
    }

    pub fn is_paused(&self, token_id: U256) -> Result<ContractCall<M, bool>, GatewayError> {
        self.method("isPaused", (token_id,))
    }

    /// Transfers tokens from the caller
    pub fn transfer(&self, to: Address, token_id: U256, amount: U256) -> Result<ContractCall<M, ()>, GatewayError> {
        self.method("transfer", (to, token_id, amount))
    }

    /// Defines a new token
    pub fn add_new_token_definition(
        &self,
        token_id: U256,
        name: String,
        decimals: U256,
        url: String,
    ) -> Result<ContractCall<M, ()>, GatewayError> {
        self.method("addNewTokenDefinition", (token_id, name, decimals, url))
    }

    /// Mints tokens to the caller
    pub fn mint(&self, token_id: U256, amount: U256, data: Bytes) -> Result<ContractCall<M, ()>, GatewayError> {
        self.method("mint", (token_id, amount, data))
    }

    /// Burns tokens held by the caller
    pub fn burn(&self, token_id: U256, amount: U256) -> Result<ContractCall<M, ()>, GatewayError> {
        self.method("burn", (token_id, amount))
    }

    pub fn register_dealer(&self, dealer: Address, token_id: U256) -> Result<ContractCall<M, ()>, GatewayError> {
        self.method("registerDealer", (dealer, token_id))
    }

    pub fn unregister_dealer(&self, dealer: Address, token_id: U256) -> Result<ContractCall<M, ()>, GatewayError> {
        self.method("unregisterDealer", (dealer, token_id))
    }

    pub fn pause(&self, token_id: U256) -> Result<ContractCall<M, ()>, GatewayError> {
        self.method("pause", (token_id,))
    }

    pub fn resume(&self, token_id: U256) -> Result<ContractCall<M, ()>, GatewayError> {
        self.method("resume", (token_id,))
    }
}
