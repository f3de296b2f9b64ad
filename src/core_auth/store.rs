use crate::core_auth::account::Account;
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

/// Accounts loaded once at startup. Read-only afterwards; only the per-account
/// online counters change.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: Vec<Arc<Account>>,
}

impl AccountStore {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: accounts.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn parse(content: &str) -> Self {
        let mut accounts = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match Account::from_line(line) {
                Some(account) => accounts.push(account),
                None => warn!("Skipping malformed account record on line {}", index + 1),
            }
        }

        Self::new(accounts)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read accounts file: {}", path.display()))?;
        let store = Self::parse(&content);
        info!("Loaded {} accounts from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn find(&self, username: &str) -> Option<Arc<Account>> {
        self.accounts
            .iter()
            .find(|account| account.get_username() == username)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
