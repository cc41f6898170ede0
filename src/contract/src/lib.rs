//! Ethereum connector for the multi-token ledger.
//!
//! This crate binds the ledger contract ABI, implements the core gateway trait
//! over an ethers signing client and watches the contract's events.

pub mod bindings;
pub mod gateway;
pub mod observer;

pub use gateway::{connect, EthGateway, SignerClient, TxSettings};
pub use observer::{EventObserver, ObservedEvent};
