//! Per-member balances and the full result of one analysis

use serde::{Deserialize, Serialize};
use indexmap::IndexMap;

use crate::finance::{Debt, Loan, Reimbursement, Transaction};
use crate::member::Member;
use crate::money::{ResolvedCurrency, round2};
use crate::settlement::Settlement;

/// Derived balance for one member; every figure is rounded to 2 decimals.
///
/// `net = paid - consumed + explicit debt deltas`. At most one of `owes` and
/// `due` is non-zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub paid: f64,
    pub consumed: f64,
    pub net: f64,
    pub owes: f64,
    pub due: f64,
    pub monthly_obligations: f64,
}

impl MemberSummary {
    /// Round raw totals and split the net into `owes`/`due`.
    pub fn from_totals(paid: f64, consumed: f64, net: f64, monthly_obligations: f64) -> Self {
        let net = round2(net);
        Self {
            paid: round2(paid),
            consumed: round2(consumed),
            net,
            owes: round2((-net).max(0.0)),
            due: round2(net.max(0.0)),
            monthly_obligations: round2(monthly_obligations),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.owes == 0.0 && self.due == 0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Roster order, then any member outside the roster (the `Unknown` sentinel)
    pub members: IndexMap<Member, MemberSummary>,
    /// Pairwise ledger entries still open
    pub outstanding: Vec<Debt>,
    pub settlements: Vec<Settlement>,
}

impl Summary {
    /// Look up a member by display name (normalized the same way as the roster)
    pub fn member(&self, name: &str) -> Option<&MemberSummary> {
        self.members.get(&Member::new(name)?)
    }
}

/// Everything extracted from one block of notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub transactions: Vec<Transaction>,
    pub debts: Vec<Debt>,
    pub reimbursements: Vec<Reimbursement>,
    pub loans: Vec<Loan>,
    pub summary: Summary,
    pub currency: ResolvedCurrency,
    /// Non-blank lines that produced no record
    pub dropped_lines: usize,
}

impl Analysis {
    /// Members who are owed money
    pub fn paid_members(&self) -> Vec<&Member> {
        self.summary
            .members
            .iter()
            .filter(|(_, s)| s.due > 0.0)
            .map(|(m, _)| m)
            .collect()
    }

    /// Members who owe money
    pub fn unpaid_members(&self) -> Vec<&Member> {
        self.summary
            .members
            .iter()
            .filter(|(_, s)| s.owes > 0.0)
            .map(|(m, _)| m)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
            && self.debts.is_empty()
            && self.reimbursements.is_empty()
            && self.loans.is_empty()
    }
}
