//! Process-lifetime cache of the tokens defined on the contract.
//!
//! The session loop is the only writer. The event observer holds a clone of
//! the `Arc` and only performs lookups, so a read/write lock is enough and no
//! guard is ever held across an await point.

use crate::errors::GatewayError;
use crate::gateway::LedgerGateway;
use crate::types::{TokenDescriptor, TokenId};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Insertion-ordered set of token descriptors.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    tokens: RwLock<Vec<TokenDescriptor>>,
}

impl TokenRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the given descriptors.
    pub fn with_tokens(tokens: Vec<TokenDescriptor>) -> Self {
        let registry = Self::new();
        for token in tokens {
            registry.append(token);
        }
        registry
    }

    /// Replaces the cache with the tokens currently defined on the contract.
    ///
    /// Descriptors are appended as they resolve. If any fetch fails the cache
    /// keeps what was resolved so far and the error is returned.
    pub async fn populate(&self, gateway: &dyn LedgerGateway) -> Result<usize, GatewayError> {
        self.write().clear();

        let ids = gateway.token_ids().await?;
        debug!("Contract reports {} token ids", ids.len());

        for id in ids {
            let name = gateway.token_name(id).await?;
            let decimals = gateway.token_decimals(id).await?;
            let metadata_url = gateway.token_url(id).await?;
            self.append(TokenDescriptor {
                id,
                name,
                decimals,
                metadata_url,
            });
        }

        let count = self.len();
        info!("Token registry populated with {} tokens", count);
        Ok(count)
    }

    /// Whether a token with this ID is known.
    pub fn exists(&self, token_id: TokenId) -> bool {
        self.read().iter().any(|t| t.id == token_id)
    }

    /// Looks up a token.
    pub fn get(&self, token_id: TokenId) -> Option<TokenDescriptor> {
        self.read().iter().find(|t| t.id == token_id).cloned()
    }

    /// Decimal places of a token.
    pub fn decimals(&self, token_id: TokenId) -> Option<u8> {
        self.read().iter().find(|t| t.id == token_id).map(|t| t.decimals)
    }

    /// Adds a descriptor. Returns false, leaving the cache unchanged, if the ID is already present.
    pub fn append(&self, descriptor: TokenDescriptor) -> bool {
        let mut tokens = self.write();
        if tokens.iter().any(|t| t.id == descriptor.id) {
            return false;
        }
        tokens.push(descriptor);
        true
    }

    /// Snapshot of all descriptors in insertion order.
    pub fn list(&self) -> Vec<TokenDescriptor> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<TokenDescriptor>> {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<TokenDescriptor>> {
        self.tokens.write().unwrap_or_else(PoisonError::into_inner)
    }
}
