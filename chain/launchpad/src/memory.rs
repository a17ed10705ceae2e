//! In-memory collaborators
//!
//! Reference implementations of `AssetService` and `NativeCurrency` backed
//! by hash maps. They follow ERC-20 conventions (an allowance of
//! `Units::MAX` is never decremented) and support fault injection so that
//! rollback paths can be exercised.
//!
//! Journals are undo logs: while one is open every write records the value
//! it overwrote, and rollback replays those entries newest first. The cost
//! of an operation is proportional to what it touches, not to the total
//! state held.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use tracing::debug;
use types::ids::{AccountId, AssetId};
use types::numeric::{Units, Wei};

use crate::errors::{AssetError, SettlementError};
use crate::settlement::{AssetService, Journaled, NativeCurrency};

/// Balances and allowances of one issued asset.
#[derive(Debug, Clone, Default)]
pub struct TokenLedger {
    pub name: String,
    pub symbol: String,
    pub total_supply: Units,
    balances: HashMap<AccountId, Units>,
    /// (owner, spender) -> remaining allowance
    allowances: HashMap<(AccountId, AccountId), Units>,
}

impl TokenLedger {
    fn balance(&self, account: &AccountId) -> Units {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: AccountId, spender: AccountId) -> Units {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }
}

/// A write to the asset maps, with the value it replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AssetUndo {
    Issued {
        asset_id: AssetId,
    },
    Balance {
        asset_id: AssetId,
        account: AccountId,
        prior: Option<Units>,
    },
    Allowance {
        asset_id: AssetId,
        owner: AccountId,
        spender: AccountId,
        prior: Option<Units>,
    },
}

/// Put `key` back to `prior`; `None` means the key did not exist.
fn restore<K: Eq + Hash, V>(map: &mut HashMap<K, V>, key: K, prior: Option<V>) {
    match prior {
        Some(value) => {
            map.insert(key, value);
        }
        None => {
            map.remove(&key);
        }
    }
}

/// In-memory asset service.
#[derive(Debug, Default)]
pub struct InMemoryAssets {
    tokens: HashMap<AssetId, TokenLedger>,
    journal: Option<Vec<AssetUndo>>,
    /// Transfers delivering units to these accounts fail.
    rejected_recipients: HashSet<AccountId>,
}

impl InMemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent transfer to `account` fail.
    pub fn reject_transfers_to(&mut self, account: AccountId) {
        self.rejected_recipients.insert(account);
    }

    pub fn token(&self, asset_id: AssetId) -> Option<&TokenLedger> {
        self.tokens.get(&asset_id)
    }

    /// Sum of all balances of one asset. Equals `total_supply` for every
    /// asset this service issued.
    pub fn circulating(&self, asset_id: AssetId) -> Option<Units> {
        self.tokens
            .get(&asset_id)
            .map(|t| t.balances.values().sum())
    }

    fn ledger(&self, asset_id: AssetId) -> Result<&TokenLedger, AssetError> {
        self.tokens
            .get(&asset_id)
            .ok_or(AssetError::UnknownAsset { asset_id })
    }

    fn ledger_mut(&mut self, asset_id: AssetId) -> Result<&mut TokenLedger, AssetError> {
        self.tokens
            .get_mut(&asset_id)
            .ok_or(AssetError::UnknownAsset { asset_id })
    }

    fn record(&mut self, undo: AssetUndo) {
        if let Some(journal) = self.journal.as_mut() {
            journal.push(undo);
        }
    }

    fn undo(&mut self, entry: AssetUndo) {
        match entry {
            AssetUndo::Issued { asset_id } => {
                self.tokens.remove(&asset_id);
            }
            AssetUndo::Balance {
                asset_id,
                account,
                prior,
            } => {
                if let Some(ledger) = self.tokens.get_mut(&asset_id) {
                    restore(&mut ledger.balances, account, prior);
                }
            }
            AssetUndo::Allowance {
                asset_id,
                owner,
                spender,
                prior,
            } => {
                if let Some(ledger) = self.tokens.get_mut(&asset_id) {
                    restore(&mut ledger.allowances, (owner, spender), prior);
                }
            }
        }
    }
}

impl Journaled for InMemoryAssets {
    fn begin(&mut self) {
        if self.journal.is_none() {
            self.journal = Some(Vec::new());
        }
    }

    fn commit(&mut self) {
        self.journal = None;
    }

    fn rollback(&mut self) {
        if let Some(journal) = self.journal.take() {
            debug!(writes = journal.len(), "Undoing asset writes");
            for entry in journal.into_iter().rev() {
                self.undo(entry);
            }
        }
    }
}

impl AssetService for InMemoryAssets {
    fn issue(
        &mut self,
        name: &str,
        symbol: &str,
        total_supply: Units,
        owner: AccountId,
    ) -> Result<AssetId, AssetError> {
        let asset_id = AssetId::new();
        let mut ledger = TokenLedger {
            name: name.to_string(),
            symbol: symbol.to_string(),
            total_supply,
            ..TokenLedger::default()
        };
        ledger.balances.insert(owner, total_supply);
        self.tokens.insert(asset_id, ledger);
        self.record(AssetUndo::Issued { asset_id });
        Ok(asset_id)
    }

    fn balance_of(&self, asset_id: AssetId, account: AccountId) -> Result<Units, AssetError> {
        Ok(self.ledger(asset_id)?.balance(&account))
    }

    fn allowance(
        &self,
        asset_id: AssetId,
        owner: AccountId,
        spender: AccountId,
    ) -> Result<Units, AssetError> {
        Ok(self.ledger(asset_id)?.allowance(owner, spender))
    }

    fn approve(
        &mut self,
        asset_id: AssetId,
        owner: AccountId,
        spender: AccountId,
        amount: Units,
    ) -> Result<(), AssetError> {
        let prior = self
            .ledger_mut(asset_id)?
            .allowances
            .insert((owner, spender), amount);
        self.record(AssetUndo::Allowance {
            asset_id,
            owner,
            spender,
            prior,
        });
        Ok(())
    }

    fn transfer_from(
        &mut self,
        asset_id: AssetId,
        spender: AccountId,
        from: AccountId,
        to: AccountId,
        amount: Units,
    ) -> Result<(), AssetError> {
        if self.rejected_recipients.contains(&to) {
            return Err(AssetError::Rejected {
                reason: format!("recipient {to} refuses transfers"),
            });
        }

        let ledger = self.ledger_mut(asset_id)?;

        let allowed = ledger.allowance(from, spender);
        if allowed < amount {
            return Err(AssetError::InsufficientAllowance {
                owner: from,
                spender,
                allowed,
                requested: amount,
            });
        }

        let available = ledger.balance(&from);
        if available < amount {
            return Err(AssetError::InsufficientBalance {
                account: from,
                required: amount,
                available,
            });
        }

        let credited = if to == from {
            available
        } else {
            ledger
                .balance(&to)
                .checked_add(amount)
                .ok_or(AssetError::Overflow)?
        };

        let mut undo = Vec::with_capacity(3);
        if allowed != Units::MAX {
            let prior = ledger.allowances.insert((from, spender), allowed - amount);
            undo.push(AssetUndo::Allowance {
                asset_id,
                owner: from,
                spender,
                prior,
            });
        }
        let prior = ledger.balances.insert(from, available - amount);
        undo.push(AssetUndo::Balance {
            asset_id,
            account: from,
            prior,
        });
        let prior = ledger.balances.insert(to, credited);
        undo.push(AssetUndo::Balance {
            asset_id,
            account: to,
            prior,
        });

        for entry in undo {
            self.record(entry);
        }
        Ok(())
    }
}

/// In-memory native-currency balances.
#[derive(Debug, Default)]
pub struct InMemoryBank {
    balances: HashMap<AccountId, Wei>,
    /// (account, balance before the write)
    journal: Option<Vec<(AccountId, Option<Wei>)>>,
    /// Payments to these accounts fail.
    rejected_payees: HashSet<AccountId>,
}

impl InMemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `account` from outside the system.
    pub fn fund(&mut self, account: AccountId, amount: Wei) -> Result<(), SettlementError> {
        let credited = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(SettlementError::Overflow)?;
        self.set_balance(account, credited);
        Ok(())
    }

    /// Make every subsequent payment to `account` fail.
    pub fn reject_payments_to(&mut self, account: AccountId) {
        self.rejected_payees.insert(account);
    }

    /// Total native currency held across all accounts.
    pub fn total(&self) -> Option<Wei> {
        self.balances
            .values()
            .try_fold(Wei::ZERO, |acc, b| acc.checked_add(*b))
    }

    fn set_balance(&mut self, account: AccountId, balance: Wei) {
        let prior = self.balances.insert(account, balance);
        if let Some(journal) = self.journal.as_mut() {
            journal.push((account, prior));
        }
    }
}

impl Journaled for InMemoryBank {
    fn begin(&mut self) {
        if self.journal.is_none() {
            self.journal = Some(Vec::new());
        }
    }

    fn commit(&mut self) {
        self.journal = None;
    }

    fn rollback(&mut self) {
        if let Some(journal) = self.journal.take() {
            debug!(writes = journal.len(), "Undoing native balance writes");
            for (account, prior) in journal.into_iter().rev() {
                restore(&mut self.balances, account, prior);
            }
        }
    }
}

impl NativeCurrency for InMemoryBank {
    fn balance_of(&self, account: AccountId) -> Wei {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        amount: Wei,
    ) -> Result<(), SettlementError> {
        if self.rejected_payees.contains(&to) {
            return Err(SettlementError::Rejected {
                account: to,
                reason: "payee refuses payment".to_string(),
            });
        }

        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(SettlementError::InsufficientFunds {
                account: from,
                required: amount,
                available,
            })?;

        if from == to {
            return Ok(());
        }

        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(SettlementError::Overflow)?;

        self.set_balance(from, remaining);
        self.set_balance(to, credited);
        Ok(())
    }
}
