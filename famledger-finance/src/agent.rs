//! The finance agent: runs every note line through the classifiers and
//! turns the matches into ledger records.

use anyhow::Result;
use famledger_core::{Analysis, Currency, Debt, Loan, Member, Roster, Transaction, round2};
use famledger_ingest::{
    AmountMatch, extract_amounts, find_members, find_members_exact, first_member, mentions_in_order,
};
use tracing::{debug, warn};

use crate::aggregate::Accumulator;
use crate::category_rules::categorize;
use crate::line_rules::{
    DEBT_KEYWORD, DEBT_KEYWORD_AR, LineContext, LineKind, classify, mentions_monthly,
    names_whole_group,
};

/// Arabic prepositions ("to") that introduce the creditor in debt lines
const CREDITOR_MARKERS_AR: &[&str] = &["لـ", "لى"];

/// Parses family expense notes against a fixed roster.
///
/// `analyze` is reentrant: every call builds its own ledger and totals.
#[derive(Debug, Clone)]
pub struct FinanceAgent {
    roster: Roster,
    currency: Currency,
}

impl FinanceAgent {
    /// Build an agent from raw member names. Fails on an empty roster.
    pub fn new<I, S>(members: I, currency: Currency) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::with_roster(Roster::new(members)?, currency))
    }

    pub fn with_roster(roster: Roster, currency: Currency) -> Self {
        Self { roster, currency }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Currency assumed when a line carries no currency signal
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Analyze a newline-delimited block of notes.
    ///
    /// Never fails: lines without an amount or matching no rule are dropped.
    pub fn analyze(&self, text: &str) -> Analysis {
        let mut acc = Accumulator::new();

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let ctx = LineContext::new(line, &self.roster);
            let Some(kind) = classify(&ctx) else {
                debug!(line, "no rule matched; dropping line");
                acc.drop_line();
                continue;
            };
            let amounts = extract_amounts(line, self.currency);
            let Some(first) = amounts.first().copied() else {
                debug!(line, kind = ?kind, "no amount found; dropping line");
                acc.drop_line();
                continue;
            };
            debug!(line, kind = ?kind, amount = first.value, "classified line");

            let recorded = match kind {
                LineKind::Payment => {
                    let payer = self.resolve_payer(&ctx);
                    self.handle_payment(&ctx, payer, first, &mut acc);
                    true
                }
                LineKind::UnattributedPayment => {
                    warn!(line, "payer not in roster; attributing to Unknown");
                    self.handle_payment(&ctx, Member::unknown(), first, &mut acc);
                    true
                }
                LineKind::DebtAssertion => self.handle_debt(&ctx, first, &mut acc),
                LineKind::Reimbursement => {
                    self.handle_reimbursement(&ctx, first, &mut acc);
                    true
                }
                LineKind::Loan => {
                    self.handle_loan(&ctx, &amounts, &mut acc);
                    true
                }
            };
            if !recorded {
                acc.drop_line();
            }
        }

        acc.finish(&self.roster, self.currency)
    }

    /// First member named in the line, or the first one after "paid by".
    fn resolve_payer(&self, ctx: &LineContext<'_>) -> Member {
        if let Some(pos) = ctx.lower.find("paid by") {
            let after = &ctx.lower[pos + "paid by".len()..];
            if let Some(payer) = mentions_in_order(after, &self.roster).first() {
                return (*payer).clone();
            }
        }
        ctx.mentions
            .first()
            .map(|m| (*m).clone())
            .unwrap_or_else(Member::unknown)
    }

    /// Named members other than the payer; otherwise the whole group when the
    /// line says so; otherwise everyone but the payer; the payer alone last.
    fn beneficiaries(&self, ctx: &LineContext<'_>, payer: &Member) -> Vec<Member> {
        let named: Vec<Member> = find_members(ctx.line, &self.roster)
            .into_iter()
            .filter(|m| *m != payer)
            .cloned()
            .collect();
        if !named.is_empty() {
            return named;
        }
        if names_whole_group(ctx) {
            return self.roster.members().to_vec();
        }
        let others = self.roster.others(payer);
        if others.is_empty() { vec![payer.clone()] } else { others }
    }

    fn handle_payment(
        &self,
        ctx: &LineContext<'_>,
        payer: Member,
        amount: AmountMatch,
        acc: &mut Accumulator,
    ) {
        let beneficiaries = self.beneficiaries(ctx, &payer);
        let share = round2(amount.value / beneficiaries.len() as f64);
        let shares = beneficiaries.iter().map(|b| (b.clone(), share)).collect();

        acc.record_payment(Transaction {
            description: ctx.line.to_string(),
            payer,
            amount: amount.value,
            currency: amount.currency,
            beneficiaries,
            shares,
            category: categorize(ctx.line),
        });
    }

    /// Debtor is named before the keyword, creditor after it. Returns false
    /// when both resolve to the same member.
    fn handle_debt(&self, ctx: &LineContext<'_>, amount: AmountMatch, acc: &mut Accumulator) -> bool {
        let (before, after) = split_on_debt_keyword(&ctx.lower);
        let mut debtor = first_member(before, &self.roster);
        let mut creditor = find_members(after, &self.roster)
            .into_iter()
            .find(|m| Some(*m) != debtor);

        if creditor.is_none() && CREDITOR_MARKERS_AR.iter().any(|p| ctx.line.contains(p)) {
            for member in find_members_exact(ctx.line, &self.roster) {
                if debtor.is_none() {
                    debtor = Some(member);
                } else if creditor.is_none() && Some(member) != debtor {
                    creditor = Some(member);
                }
            }
        }

        let from = debtor.cloned().unwrap_or_else(Member::unknown);
        let to = creditor.cloned().unwrap_or_else(Member::unknown);
        if from == to {
            debug!(line = ctx.line, member = %from, "debtor and creditor are the same; dropping");
            return false;
        }
        if from.is_unknown() || to.is_unknown() {
            warn!(line = ctx.line, from = %from, to = %to, "could not resolve both sides of debt");
        }

        acc.record_debt(
            Debt {
                from,
                to,
                amount: round2(amount.value),
            },
            amount.currency,
        );
        true
    }

    /// First mention repays the second mention.
    fn handle_reimbursement(&self, ctx: &LineContext<'_>, amount: AmountMatch, acc: &mut Accumulator) {
        let mut mentions = ctx.mentions.iter().map(|m| (*m).clone());
        let from = mentions.next().unwrap_or_else(Member::unknown);
        let to = mentions.next().unwrap_or_else(Member::unknown);
        acc.apply_reimbursement(ctx.line, from, to, amount.value, amount.currency);
    }

    /// Principal is the first amount; a second amount is the monthly
    /// installment when the line talks about months.
    fn handle_loan(&self, ctx: &LineContext<'_>, amounts: &[AmountMatch], acc: &mut Accumulator) {
        let Some(principal) = amounts.first() else {
            return;
        };
        let borrower = first_member(ctx.line, &self.roster)
            .cloned()
            .unwrap_or_else(Member::unknown);
        let monthly_payment = if mentions_monthly(ctx) {
            amounts.get(1).map(|a| a.value)
        } else {
            None
        };

        acc.record_loan(Loan::new(
            ctx.line,
            borrower,
            principal.value,
            principal.currency,
            monthly_payment,
        ));
    }
}

/// Split a lowercased line around "owes" (or مديون); the keyword is excluded.
fn split_on_debt_keyword(lower: &str) -> (&str, &str) {
    for keyword in [DEBT_KEYWORD, DEBT_KEYWORD_AR] {
        if let Some(pos) = lower.find(keyword) {
            return (&lower[..pos], &lower[pos + keyword.len()..]);
        }
    }
    (lower, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(members: &[&str]) -> FinanceAgent {
        FinanceAgent::new(members.iter().copied(), Currency::Aed).unwrap()
    }

    #[test]
    fn test_empty_roster_is_rejected() {
        assert!(FinanceAgent::new(Vec::<String>::new(), Currency::Aed).is_err());
    }

    #[test]
    fn test_sentinel_name_in_roster_is_rejected() {
        assert!(FinanceAgent::new(["Alex", "unknown"], Currency::Aed).is_err());
    }

    #[test]
    fn test_paid_by_picks_member_after_phrase() {
        let agent = agent(&["Sam", "Mariam", "Omar"]);
        let analysis = agent.analyze("Sam's rent 3500 paid by Mariam");
        let tx = &analysis.transactions[0];
        assert_eq!(tx.payer.as_str(), "Mariam");
        let beneficiaries: Vec<_> = tx.beneficiaries.iter().map(Member::as_str).collect();
        assert_eq!(beneficiaries, vec!["Sam"]);
    }

    #[test]
    fn test_whole_group_includes_payer() {
        let agent = agent(&["Alex", "Jamie", "Sam"]);
        let analysis = agent.analyze("Alex paid 90 for everyone");
        let tx = &analysis.transactions[0];
        assert_eq!(tx.beneficiaries.len(), 3);
        assert_eq!(tx.share_of(&tx.payer), 30.0);
        assert_eq!(analysis.summary.member("Alex").unwrap().due, 60.0);
    }

    #[test]
    fn test_single_member_roster_pays_for_self() {
        let agent = agent(&["Sara"]);
        let analysis = agent.analyze("Sara paid 3000 for apartment rent");
        let tx = &analysis.transactions[0];
        assert_eq!(tx.beneficiaries, vec![Member::new("Sara").unwrap()]);
        assert_eq!(tx.shares_total(), 3000.0);
        assert!(analysis.summary.member("Sara").unwrap().is_settled());
    }

    #[test]
    fn test_debt_with_unknown_creditor() {
        let agent = agent(&["Alex", "Jamie"]);
        let analysis = agent.analyze("Jamie owes the landlord 300");
        assert_eq!(analysis.debts.len(), 1);
        assert_eq!(analysis.debts[0].from.as_str(), "Jamie");
        assert!(analysis.debts[0].to.is_unknown());
        assert_eq!(analysis.summary.member("Unknown").unwrap().due, 300.0);
    }

    #[test]
    fn test_arabic_debt_line() {
        let agent = agent(&["أحمد", "مريم"]);
        let analysis = agent.analyze("أحمد مديون لـ مريم ٣٠٠ درهم");
        assert_eq!(analysis.debts.len(), 1);
        assert_eq!(analysis.debts[0].from.as_str(), "أحمد");
        assert_eq!(analysis.debts[0].to.as_str(), "مريم");
        assert_eq!(analysis.debts[0].amount, 300.0);
    }

    #[test]
    fn test_arabic_preposition_fallback_finds_creditor() {
        // creditor is named before the keyword, after the preposition
        let agent = agent(&["أحمد", "مريم"]);
        let analysis = agent.analyze("أحمد لـ مريم مديون ١٥٠");
        assert_eq!(analysis.debts.len(), 1);
        assert_eq!(analysis.debts[0].from.as_str(), "أحمد");
        assert_eq!(analysis.debts[0].to.as_str(), "مريم");
    }

    #[test]
    fn test_self_debt_is_dropped() {
        let agent = agent(&["Alex", "Jamie"]);
        let analysis = agent.analyze("somebody owes somebody 50");
        assert!(analysis.debts.is_empty());
        assert_eq!(analysis.dropped_lines, 1);
    }

    #[test]
    fn test_lines_without_amount_are_dropped() {
        let agent = agent(&["Alex", "Jamie"]);
        let analysis = agent.analyze("Alex paid for dinner\n\n   \nJamie owes Alex");
        assert!(analysis.is_empty());
        assert_eq!(analysis.dropped_lines, 2);
    }

    #[test]
    fn test_split_on_debt_keyword() {
        assert_eq!(split_on_debt_keyword("jamie owes alex 40"), ("jamie ", " alex 40"));
        assert_eq!(split_on_debt_keyword("no keyword"), ("no keyword", ""));
    }
}
