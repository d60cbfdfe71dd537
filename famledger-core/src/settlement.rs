//! Greedy debt settlement.
//!
//! Net balances (positive = is owed, negative = owes) are first quantized to
//! whole cents that sum to exactly zero, then matched largest-first with a
//! two-pointer pass. Working in integer cents means every member's transfers
//! add up to their quantized balance, with no drift left on the last debtor.
//! The pass produces at most `debtors + creditors - 1` transfers; ties fall
//! back to member name so the output is reproducible.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::member::Member;
use crate::money::BALANCE_EPSILON;

/// Balances at or below this many cents are left out of settlement
const DUST_CENTS: i64 = (BALANCE_EPSILON * 100.0) as i64;

/// One suggested transfer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settlement {
    pub from: Member,
    pub to: Member,
    pub amount: f64,
}

pub fn cents_to_amount(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Round every balance to cents, then move single cents until the total is zero.
///
/// When rounding overshoots, cents are taken back from the members it favoured
/// most; when it undershoots, they go to the members it cost most. Exact ties
/// break on member name.
pub fn quantize_balances<'a, I>(balances: I) -> Vec<(&'a Member, i64)>
where
    I: IntoIterator<Item = (&'a Member, f64)>,
{
    // (member, cents, cents - exact)
    let mut quantized: Vec<(&Member, i64, f64)> = balances
        .into_iter()
        .map(|(member, net)| {
            let exact = net * 100.0;
            let cents = exact.round() as i64;
            (member, cents, cents as f64 - exact)
        })
        .collect();

    let excess: i64 = quantized.iter().map(|(_, cents, _)| cents).sum();
    if excess != 0 {
        let mut order: Vec<usize> = (0..quantized.len()).collect();
        order.sort_by(|&a, &b| {
            let (ma, _, da) = quantized[a];
            let (mb, _, db) = quantized[b];
            let primary = if excess > 0 { db.total_cmp(&da) } else { da.total_cmp(&db) };
            primary.then_with(|| ma.cmp(mb))
        });
        let steps = excess.unsigned_abs() as usize;
        if steps > quantized.len() {
            warn!(excess, members = quantized.len(), "balances do not sum to zero");
        }
        for &idx in order.iter().take(steps) {
            quantized[idx].1 -= excess.signum();
        }
        debug!(excess, "adjusted rounded balances to sum to zero");
    }

    quantized
        .into_iter()
        .map(|(member, cents, _)| (member, cents))
        .collect()
}

/// Compute transfers from net balances.
pub fn settle<'a, I>(balances: I) -> Vec<Settlement>
where
    I: IntoIterator<Item = (&'a Member, f64)>,
{
    settle_cents(&quantize_balances(balances))
}

/// Compute transfers from balances already quantized to cents.
pub fn settle_cents(balances: &[(&Member, i64)]) -> Vec<Settlement> {
    let mut creditors: Vec<(&Member, i64)> = Vec::new();
    let mut debtors: Vec<(&Member, i64)> = Vec::new();
    for &(member, cents) in balances {
        if cents > DUST_CENTS {
            creditors.push((member, cents));
        } else if cents < -DUST_CENTS {
            debtors.push((member, -cents));
        }
    }
    creditors.sort_by(largest_first);
    debtors.sort_by(largest_first);

    let mut settlements = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let (debtor, owed) = debtors[i];
        let (creditor, surplus) = creditors[j];

        let pay = owed.min(surplus);
        settlements.push(Settlement {
            from: debtor.clone(),
            to: creditor.clone(),
            amount: cents_to_amount(pay),
        });

        debtors[i].1 -= pay;
        creditors[j].1 -= pay;
        if debtors[i].1 == 0 {
            i += 1;
        }
        if creditors[j].1 == 0 {
            j += 1;
        }
    }

    debug!(
        creditors = creditors.len(),
        debtors = debtors.len(),
        transfers = settlements.len(),
        "settled balances"
    );
    settlements
}

fn largest_first(a: &(&Member, i64), b: &(&Member, i64)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}
