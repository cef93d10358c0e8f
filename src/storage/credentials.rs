//! Access token storage
//!
//! Tokens are kept per environment in the OS keyring. The `POLAR_ACCESS_TOKEN`
//! environment variable, when set, takes priority over anything stored.

use super::Result;
use crate::error::StorageError;
use crate::storage::config::Environment;
use keyring::Entry;
use std::collections::HashMap;
use std::sync::Mutex;

pub const KEYRING_SERVICE: &str = "polar-cli";
pub const TOKEN_ENV: &str = "POLAR_ACCESS_TOKEN";

/// Where access tokens are persisted between invocations.
pub trait TokenStore: Send + Sync {
    fn get(&self, env: Environment) -> Result<Option<String>>;
    fn set(&self, env: Environment, token: &str) -> Result<()>;
    /// Remove the stored token. Returns whether one existed.
    fn delete(&self, env: Environment) -> Result<bool>;
}

/// OS keyring backed store: service `polar-cli`, account = environment name.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    fn entry(env: Environment) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE, env.as_str())
            .map_err(|e| StorageError::KeyringError(e.to_string()))
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self, env: Environment) -> Result<Option<String>> {
        match Self::entry(env)?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StorageError::KeyringError(e.to_string())),
        }
    }

    fn set(&self, env: Environment, token: &str) -> Result<()> {
        Self::entry(env)?
            .set_password(token)
            .map_err(|e| StorageError::KeyringError(e.to_string()))
    }

    fn delete(&self, env: Environment) -> Result<bool> {
        match Self::entry(env)?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(StorageError::KeyringError(e.to_string())),
        }
    }
}

/// Process-local store used by tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<Environment, String>>,
}

impl MemoryTokenStore {
    pub fn with_token(env: Environment, token: &str) -> Self {
        let store = Self::default();
        if let Ok(mut tokens) = store.tokens.lock() {
            tokens.insert(env, token.to_string());
        }
        store
    }

    fn tokens(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Environment, String>>> {
        self.tokens
            .lock()
            .map_err(|_| StorageError::KeyringError("token store lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, env: Environment) -> Result<Option<String>> {
        Ok(self.tokens()?.get(&env).cloned())
    }

    fn set(&self, env: Environment, token: &str) -> Result<()> {
        self.tokens()?.insert(env, token.to_string());
        Ok(())
    }

    fn delete(&self, env: Environment) -> Result<bool> {
        Ok(self.tokens()?.remove(&env).is_some())
    }
}

/// Effective token: a non-empty override (from `POLAR_ACCESS_TOKEN`) wins over
/// the stored one.
pub fn resolve_token(
    override_token: Option<&str>,
    store: &dyn TokenStore,
    env: Environment,
) -> Result<Option<String>> {
    match override_token.filter(|token| !token.is_empty()) {
        Some(token) => Ok(Some(token.to_string())),
        None => store.get(env),
    }
}
