//! Balance-of-record store for every (account, asset) pair.
//!
//! While a journal is open (see [`Ledger::begin`]) every write records the
//! entry's previous value so that [`Ledger::rollback`] can restore the exact
//! state from before the journal was opened.
//!
//! Journals nest. Each [`Ledger::begin`] pushes a savepoint, and
//! [`Ledger::commit`] / [`Ledger::rollback`] only settle the innermost one.
//! Writes committed by an inner journal stay undoable by the outer one.

use std::collections::HashMap;

use flashloan_interface::{AccountId, AssetId, FlashloanError};
use tracing::{debug, trace};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BalanceKey {
    pub account: AccountId,
    pub asset: AssetId,
}

impl BalanceKey {
    pub fn new(account: &AccountId, asset: &AssetId) -> Self {
        Self {
            account: account.clone(),
            asset: asset.clone(),
        }
    }
}

/// Before-image of one balance entry. `None` means the entry did not exist.
#[derive(Clone, Debug, PartialEq, Eq)]
struct UndoEntry {
    key: BalanceKey,
    previous: Option<u128>,
}

#[derive(Clone, Debug, Default)]
pub struct Ledger {
    balances: HashMap<BalanceKey, u128>,
    journal: Vec<UndoEntry>,

    /// Journal length at each open [`Ledger::begin`], innermost last
    savepoints: Vec<usize>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, account: &AccountId, asset: &AssetId) -> u128 {
        self.balances
            .get(&BalanceKey::new(account, asset))
            .copied()
            .unwrap_or(0)
    }

    /// Every entry held by `account`, sorted by asset.
    pub fn balances_of(&self, account: &AccountId) -> Vec<(AssetId, u128)> {
        let mut res: Vec<(AssetId, u128)> = self
            .balances
            .iter()
            .filter(|(k, _)| &k.account == account)
            .map(|(k, v)| (k.asset.clone(), *v))
            .collect();
        res.sort();
        res
    }

    /// Returns the new balance
    pub fn credit(
        &mut self,
        account: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<u128, FlashloanError> {
        let key = BalanceKey::new(account, asset);
        let current = self.balances.get(&key).copied().unwrap_or(0);
        let updated = current
            .checked_add(amount)
            .ok_or(FlashloanError::AmountOverflow)?;
        debug!(%account, %asset, amount, updated, "credit");
        self.write(key, updated);
        Ok(updated)
    }

    /// Returns the new balance
    pub fn debit(
        &mut self,
        account: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<u128, FlashloanError> {
        let key = BalanceKey::new(account, asset);
        let current = self.balances.get(&key).copied().unwrap_or(0);
        let updated = current
            .checked_sub(amount)
            .ok_or(FlashloanError::InsufficientFunds)?;
        debug!(%account, %asset, amount, updated, "debit");
        self.write(key, updated);
        Ok(updated)
    }

    /// Debits `from` and credits `to`. Either both writes happen or neither does.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        asset: &AssetId,
        amount: u128,
    ) -> Result<(), FlashloanError> {
        let from_updated = self
            .balance(from, asset)
            .checked_sub(amount)
            .ok_or(FlashloanError::InsufficientFunds)?;
        if from == to {
            return Ok(());
        }
        let to_updated = self
            .balance(to, asset)
            .checked_add(amount)
            .ok_or(FlashloanError::AmountOverflow)?;
        debug!(%from, %to, %asset, amount, "transfer");
        self.write(BalanceKey::new(from, asset), from_updated);
        self.write(BalanceKey::new(to, asset), to_updated);
        Ok(())
    }

    /// Opens a journal, nested inside any journal already open.
    pub fn begin(&mut self) {
        self.savepoints.push(self.journal.len());
        trace!(depth = self.savepoints.len(), "ledger begin");
    }

    pub fn is_journaling(&self) -> bool {
        !self.savepoints.is_empty()
    }

    /// Number of open journals
    pub fn journal_depth(&self) -> usize {
        self.savepoints.len()
    }

    /// Keeps every write made since the innermost [`Self::begin`].
    /// Returns the number of writes that were journaled.
    pub fn commit(&mut self) -> usize {
        let Some(savepoint) = self.savepoints.pop() else {
            return 0;
        };
        let writes = self.journal.len() - savepoint;
        if self.savepoints.is_empty() {
            self.journal.clear();
        }
        trace!(writes, depth = self.savepoints.len(), "ledger commit");
        writes
    }

    /// Undoes every write made since the innermost [`Self::begin`], most
    /// recent first. Returns the number of writes undone.
    pub fn rollback(&mut self) -> usize {
        let Some(savepoint) = self.savepoints.pop() else {
            return 0;
        };
        let undone = self.journal.len() - savepoint;
        for UndoEntry { key, previous } in self.journal.drain(savepoint..).rev() {
            match previous {
                Some(v) => self.balances.insert(key, v),
                None => self.balances.remove(&key),
            };
        }
        debug!(undone, depth = self.savepoints.len(), "ledger rollback");
        undone
    }

    fn write(&mut self, key: BalanceKey, value: u128) {
        let previous = self.balances.insert(key.clone(), value);
        if self.is_journaling() {
            self.journal.push(UndoEntry { key, previous });
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn dai() -> AssetId {
        "DAI".into()
    }

    #[test]
    fn missing_entries_read_as_zero() {
        let ledger = Ledger::new();
        assert_eq!(ledger.balance(&"alice".into(), &dai()), 0);
    }

    #[test]
    fn debit_more_than_balance_fails_without_side_effects() {
        let mut ledger = Ledger::new();
        let alice: AccountId = "alice".into();
        ledger.credit(&alice, &dai(), 10).unwrap();
        assert_eq!(
            ledger.debit(&alice, &dai(), 11),
            Err(FlashloanError::InsufficientFunds)
        );
        assert_eq!(ledger.balance(&alice, &dai()), 10);
    }

    #[test]
    fn credit_overflow_fails_instead_of_wrapping() {
        let mut ledger = Ledger::new();
        let alice: AccountId = "alice".into();
        ledger.credit(&alice, &dai(), u128::MAX).unwrap();
        assert_eq!(
            ledger.credit(&alice, &dai(), 1),
            Err(FlashloanError::AmountOverflow)
        );
        assert_eq!(ledger.balance(&alice, &dai()), u128::MAX);
    }

    #[test]
    fn transfer_is_all_or_nothing() {
        let mut ledger = Ledger::new();
        let (alice, bob): (AccountId, AccountId) = ("alice".into(), "bob".into());
        ledger.credit(&alice, &dai(), 5).unwrap();
        ledger.credit(&bob, &dai(), u128::MAX).unwrap();
        assert_eq!(
            ledger.transfer(&alice, &bob, &dai(), 5),
            Err(FlashloanError::AmountOverflow)
        );
        assert_eq!(ledger.balance(&alice, &dai()), 5);
        ledger.transfer(&alice, &"carol".into(), &dai(), 5).unwrap();
        assert_eq!(ledger.balance(&alice, &dai()), 0);
        assert_eq!(ledger.balance(&"carol".into(), &dai()), 5);
    }

    #[test]
    fn self_transfer_still_checks_funds() {
        let mut ledger = Ledger::new();
        let alice: AccountId = "alice".into();
        ledger.credit(&alice, &dai(), 1).unwrap();
        assert_eq!(
            ledger.transfer(&alice, &alice, &dai(), 2),
            Err(FlashloanError::InsufficientFunds)
        );
        ledger.transfer(&alice, &alice, &dai(), 1).unwrap();
        assert_eq!(ledger.balance(&alice, &dai()), 1);
    }

    #[test]
    fn rollback_restores_absent_entries_as_absent() {
        let mut ledger = Ledger::new();
        let alice: AccountId = "alice".into();
        ledger.begin();
        ledger.credit(&alice, &dai(), 7).unwrap();
        ledger.debit(&alice, &dai(), 3).unwrap();
        assert_eq!(ledger.rollback(), 2);
        assert!(ledger.balances_of(&alice).is_empty());
        assert!(!ledger.is_journaling());
    }

    #[test]
    fn commit_keeps_writes_and_closes_journal() {
        let mut ledger = Ledger::new();
        let alice: AccountId = "alice".into();
        ledger.begin();
        ledger.credit(&alice, &dai(), 7).unwrap();
        assert_eq!(ledger.commit(), 1);
        assert_eq!(ledger.rollback(), 0);
        assert_eq!(ledger.balance(&alice, &dai()), 7);
    }

    #[test]
    fn nested_journals_settle_innermost_first() {
        let mut ledger = Ledger::new();
        let alice: AccountId = "alice".into();
        ledger.begin();
        ledger.credit(&alice, &dai(), 5).unwrap();

        ledger.begin();
        ledger.credit(&alice, &dai(), 10).unwrap();
        assert_eq!(ledger.journal_depth(), 2);
        assert_eq!(ledger.rollback(), 1);
        assert_eq!(ledger.balance(&alice, &dai()), 5);

        ledger.begin();
        ledger.credit(&alice, &dai(), 20).unwrap();
        assert_eq!(ledger.commit(), 1);
        assert!(ledger.is_journaling());
        assert_eq!(ledger.balance(&alice, &dai()), 25);

        // inner commits stay undoable by the outer journal
        assert_eq!(ledger.rollback(), 2);
        assert!(ledger.balances_of(&alice).is_empty());
        assert!(!ledger.is_journaling());
    }

    #[derive(Clone, Debug)]
    enum Op {
        Credit(u8, u64),
        Debit(u8, u64),
        Transfer(u8, u8, u64),
    }

    prop_compose! {
        fn ops()
            (kind in 0..3u8, a in 0..4u8, b in 0..4u8, amount in 0..1_000u64) -> Op {
                match kind {
                    0 => Op::Credit(a, amount),
                    1 => Op::Debit(a, amount),
                    _ => Op::Transfer(a, b, amount),
                }
            }
    }

    fn account(i: u8) -> AccountId {
        format!("acc{i}").into()
    }

    fn apply(ledger: &mut Ledger, op: &Op) {
        // failures are expected and must leave no trace
        let _ = match *op {
            Op::Credit(a, amt) => ledger.credit(&account(a), &dai(), amt.into()).map(|_| ()),
            Op::Debit(a, amt) => ledger.debit(&account(a), &dai(), amt.into()).map(|_| ()),
            Op::Transfer(a, b, amt) => {
                ledger.transfer(&account(a), &account(b), &dai(), amt.into())
            }
        };
    }

    fn snapshot(ledger: &Ledger) -> Vec<Vec<(AssetId, u128)>> {
        (0..4).map(|i| ledger.balances_of(&account(i))).collect()
    }

    proptest! {
        #[test]
        fn rollback_restores_snapshot(
            setup in prop::collection::vec(ops(), 0..16),
            journaled in prop::collection::vec(ops(), 0..32),
        ) {
            let mut ledger = Ledger::new();
            for op in &setup {
                apply(&mut ledger, op);
            }
            let before = snapshot(&ledger);
            ledger.begin();
            for op in &journaled {
                apply(&mut ledger, op);
            }
            ledger.rollback();
            prop_assert_eq!(snapshot(&ledger), before);
        }
    }
}
