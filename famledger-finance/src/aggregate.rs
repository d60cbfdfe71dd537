//! Per-call accumulation of parsed records into member balances.
//!
//! A fresh [`Accumulator`] is built for every analysis; nothing is shared
//! between calls.

use famledger_core::{
    Analysis, Currency, Debt, Ledger, Loan, Member, MemberSummary, Reimbursement,
    ResolvedCurrency, Roster, Summary, Transaction, cents_to_amount, quantize_balances, round2,
    settle_cents,
};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Unrounded running totals for one member
#[derive(Debug, Clone, Copy, Default)]
struct MemberTotals {
    paid: f64,
    consumed: f64,
    /// Explicit debts and applied reimbursements
    adjustment: f64,
    monthly_obligations: f64,
}

impl MemberTotals {
    fn net(&self) -> f64 {
        self.paid - self.consumed + self.adjustment
    }
}

#[derive(Debug, Default)]
pub struct Accumulator {
    transactions: Vec<Transaction>,
    debts: Vec<Debt>,
    reimbursements: Vec<Reimbursement>,
    loans: Vec<Loan>,
    ledger: Ledger,
    totals: BTreeMap<Member, MemberTotals>,
    currencies: Vec<Currency>,
    dropped_lines: usize,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a payment split evenly over its beneficiaries.
    ///
    /// `consumed` grows by the unrounded share so that nets sum to zero;
    /// the transaction itself carries the rounded shares.
    pub fn record_payment(&mut self, tx: Transaction) {
        let count = tx.beneficiaries.len().max(1) as f64;
        let exact_share = tx.amount / count;

        self.totals.entry(tx.payer.clone()).or_default().paid += tx.amount;
        for beneficiary in &tx.beneficiaries {
            self.totals.entry(beneficiary.clone()).or_default().consumed += exact_share;
            self.ledger
                .add_debt(beneficiary, &tx.payer, tx.share_of(beneficiary));
        }
        self.currencies.push(tx.currency);
        self.transactions.push(tx);
    }

    /// Record an explicit "X owes Y" assertion.
    pub fn record_debt(&mut self, debt: Debt, currency: Currency) {
        self.totals.entry(debt.from.clone()).or_default().adjustment -= debt.amount;
        self.totals.entry(debt.to.clone()).or_default().adjustment += debt.amount;
        self.ledger.add_debt(&debt.from, &debt.to, debt.amount);
        self.currencies.push(currency);
        self.debts.push(debt);
    }

    /// Apply a repayment from `from` to `to`, clamped to what the ledger holds.
    pub fn apply_reimbursement(
        &mut self,
        description: &str,
        from: Member,
        to: Member,
        requested: f64,
        currency: Currency,
    ) -> &Reimbursement {
        let applied = self.ledger.reduce_debt(&from, &to, requested);
        if applied < requested {
            warn!(
                from = %from,
                to = %to,
                requested,
                applied,
                "reimbursement exceeds recorded debt; clamped"
            );
        }
        self.totals.entry(from.clone()).or_default().adjustment += applied;
        self.totals.entry(to.clone()).or_default().adjustment -= applied;
        self.currencies.push(currency);
        self.reimbursements.push(Reimbursement {
            description: description.to_string(),
            from,
            to,
            requested,
            applied: round2(applied),
        });
        &self.reimbursements[self.reimbursements.len() - 1]
    }

    pub fn record_loan(&mut self, loan: Loan) {
        let totals = self.totals.entry(loan.borrower.clone()).or_default();
        totals.monthly_obligations += loan.monthly_payment.unwrap_or(0.0);
        self.currencies.push(loan.currency);
        self.loans.push(loan);
    }

    pub fn drop_line(&mut self) {
        self.dropped_lines += 1;
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Build summary rows for every roster member (plus any sentinel that
    /// was referenced), run the settlement engine and resolve the currency.
    ///
    /// Nets are quantized to zero-sum cents once; the summary rows and the
    /// settlements are both derived from those cents.
    pub fn finish(mut self, roster: &Roster, default_currency: Currency) -> Analysis {
        for member in roster {
            self.totals.entry(member.clone()).or_default();
        }

        let order: Vec<&Member> = roster
            .iter()
            .chain(self.totals.keys().filter(|m| !roster.contains(*m)))
            .collect();
        let nets = quantize_balances(order.iter().map(|m| (*m, self.totals[*m].net())));
        let settlements = settle_cents(&nets);
        let members: IndexMap<Member, MemberSummary> = nets
            .iter()
            .map(|&(member, cents)| {
                let t = &self.totals[member];
                (
                    member.clone(),
                    MemberSummary::from_totals(
                        t.paid,
                        t.consumed,
                        cents_to_amount(cents),
                        t.monthly_obligations,
                    ),
                )
            })
            .collect();

        let currency = ResolvedCurrency::from_detected(self.currencies, default_currency);
        if currency.is_mixed() {
            warn!("notes mix several currencies; amounts are not converted");
        }

        info!(
            transactions = self.transactions.len(),
            debts = self.debts.len(),
            reimbursements = self.reimbursements.len(),
            loans = self.loans.len(),
            settlements = settlements.len(),
            dropped = self.dropped_lines,
            currency = %currency,
            "analysis complete"
        );

        Analysis {
            transactions: self.transactions,
            debts: self.debts,
            reimbursements: self.reimbursements,
            loans: self.loans,
            summary: Summary {
                members,
                outstanding: self.ledger.outstanding(),
                settlements,
            },
            currency,
            dropped_lines: self.dropped_lines,
        }
    }
}
