//! Signing key loading for the ledger client.

use crate::config::{LedgerConfig, ENV_KEYSTORE_PASSWORD, ENV_PRIVATE_KEY};
use crate::errors::StartupError;
use ethers::signers::{LocalWallet, Signer};
use std::io;
use tracing::{debug, info};

/// Loads the signing key for the session.
///
/// A hex private key in the environment wins; otherwise the configured
/// keystore is decrypted with the password from the environment or, failing
/// that, from `ask_password`.
pub fn load_signer<F, P>(config: &LedgerConfig, lookup: F, ask_password: P) -> Result<LocalWallet, StartupError>
where
    F: Fn(&str) -> Option<String>,
    P: FnOnce() -> io::Result<String>,
{
    let wallet = match lookup(ENV_PRIVATE_KEY).filter(|k| !k.trim().is_empty()) {
        Some(key) => {
            debug!("Using private key from {}", ENV_PRIVATE_KEY);
            key.trim()
                .parse::<LocalWallet>()
                .map_err(|e| StartupError::Key(format!("Invalid private key in {}: {}", ENV_PRIVATE_KEY, e)))?
        }
        None => {
            let path = config.keystore.as_ref().ok_or_else(|| {
                StartupError::Key(format!(
                    "No signing key: set {} or configure a keystore",
                    ENV_PRIVATE_KEY
                ))
            })?;
            let password = match lookup(ENV_KEYSTORE_PASSWORD) {
                Some(password) => password,
                None => ask_password().map_err(|e| StartupError::Key(format!("Failed to read password: {}", e)))?,
            };
            info!("Decrypting keystore {}", path.display());
            LocalWallet::decrypt_keystore(path, password.trim_end_matches(&['\r', '\n'][..]))
                .map_err(|e| StartupError::Key(format!("Failed to decrypt {}: {}", path.display(), e)))?
        }
    };

    Ok(wallet.with_chain_id(config.chain_id))
}
