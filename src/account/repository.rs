use std::collections::HashMap;

use thiserror::Error;

use super::model::AccountData;
use crate::adjustment::AdjustmentSet;

/// Persistence failures surfaced by an [`AccountRepository`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("unknown account {0}")]
    UnknownAccount(String),

    #[error("blocks minted adjustment for {address} overflows ({current} + {delta})")]
    AdjustmentOverflow {
        address: String,
        current: i32,
        delta: i32,
    },

    #[error("repository backend failure: {0}")]
    Backend(String),
}

/// Account persistence consumed by the adjustment core.
///
/// Atomicity across calls belongs to the enclosing block transaction.
pub trait AccountRepository {
    fn get_account(&self, address: &str) -> Result<Option<AccountData>, DataError>;

    /// Add each entry's delta to the account's `blocks_minted_adjustment`,
    /// creating the account with zeroed counters if it does not exist yet.
    fn update_blocks_minted_adjustments(
        &mut self,
        adjustments: &AdjustmentSet,
    ) -> Result<(), DataError>;

    /// Persist `account.level` for an existing account.
    fn set_level(&mut self, account: &AccountData) -> Result<(), DataError>;
}

/// A simple account store over a HashMap keyed by address.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: HashMap<String, AccountData>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    /// Insert or replace a whole account record.
    pub fn insert(&mut self, account: AccountData) {
        self.accounts.insert(account.address.clone(), account);
    }

    pub fn get(&self, address: &str) -> Option<&AccountData> {
        self.accounts.get(address)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountData> {
        self.accounts.values()
    }
}

impl AccountRepository for InMemoryAccountRepository {
    fn get_account(&self, address: &str) -> Result<Option<AccountData>, DataError> {
        Ok(self.accounts.get(address).cloned())
    }

    fn update_blocks_minted_adjustments(
        &mut self,
        adjustments: &AdjustmentSet,
    ) -> Result<(), DataError> {
        // Validate every addition first so a failure leaves the store untouched.
        let mut updated = Vec::with_capacity(adjustments.len());
        for (address, delta) in adjustments.iter() {
            let current = self
                .accounts
                .get(address)
                .map(|a| a.blocks_minted_adjustment)
                .unwrap_or(0);
            let next = current
                .checked_add(delta)
                .ok_or_else(|| DataError::AdjustmentOverflow {
                    address: address.to_string(),
                    current,
                    delta,
                })?;
            updated.push((address, next));
        }

        for (address, next) in updated {
            self.accounts
                .entry(address.to_string())
                .or_insert_with(|| AccountData::new(address))
                .blocks_minted_adjustment = next;
        }
        Ok(())
    }

    fn set_level(&mut self, account: &AccountData) -> Result<(), DataError> {
        let stored = self
            .accounts
            .get_mut(&account.address)
            .ok_or_else(|| DataError::UnknownAccount(account.address.clone()))?;
        stored.level = account.level;
        Ok(())
    }
}
