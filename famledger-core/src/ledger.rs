//! Pairwise debt accumulator: debtor -> creditor -> amount

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::finance::Debt;
use crate::member::Member;
use crate::money::round2;

/// Directed debts between members.
///
/// Amounts never go below zero; a missing entry means nothing is owed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    debts: BTreeMap<Member, BTreeMap<Member, f64>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increase what `debtor` owes `creditor`.
    ///
    /// Non-positive amounts and self-debts are ignored.
    pub fn add_debt(&mut self, debtor: &Member, creditor: &Member, amount: f64) {
        if amount <= 0.0 || debtor == creditor {
            return;
        }
        *self
            .debts
            .entry(debtor.clone())
            .or_default()
            .entry(creditor.clone())
            .or_insert(0.0) += amount;
    }

    /// Decrease what `debtor` owes `creditor`, clamping at zero.
    ///
    /// Returns the amount actually removed, which is 0 when there was no entry.
    pub fn reduce_debt(&mut self, debtor: &Member, creditor: &Member, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        let Some(entry) = self
            .debts
            .get_mut(debtor)
            .and_then(|creditors| creditors.get_mut(creditor))
        else {
            return 0.0;
        };
        let applied = amount.min(*entry);
        *entry = (*entry - applied).max(0.0);
        applied
    }

    /// Current amount `debtor` owes `creditor`
    pub fn get(&self, debtor: &Member, creditor: &Member) -> f64 {
        self.debts
            .get(debtor)
            .and_then(|creditors| creditors.get(creditor))
            .copied()
            .unwrap_or(0.0)
    }

    /// Everything `member` owes to others
    pub fn total_owed_by(&self, member: &Member) -> f64 {
        self.debts
            .get(member)
            .map(|creditors| creditors.values().sum())
            .unwrap_or(0.0)
    }

    /// Everything others owe to `member`
    pub fn total_due_to(&self, member: &Member) -> f64 {
        self.debts
            .values()
            .filter_map(|creditors| creditors.get(member))
            .sum()
    }

    /// `due - owes` for one member
    pub fn net(&self, member: &Member) -> f64 {
        self.total_due_to(member) - self.total_owed_by(member)
    }

    /// Non-zero entries (after rounding), debtor-major order
    pub fn outstanding(&self) -> Vec<Debt> {
        self.debts
            .iter()
            .flat_map(|(debtor, creditors)| {
                creditors.iter().filter_map(move |(creditor, amount)| {
                    let amount = round2(*amount);
                    (amount > 0.0).then(|| Debt {
                        from: debtor.clone(),
                        to: creditor.clone(),
                        amount,
                    })
                })
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.debts.values().all(|creditors| creditors.values().all(|a| *a <= 0.0))
    }
}
