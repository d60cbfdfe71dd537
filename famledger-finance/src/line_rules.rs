//! Line classification as an ordered rule table.
//!
//! Each non-blank note line is tested against [`LINE_RULES`] top to bottom and
//! the first rule that matches decides how the line is read. Lines matching no
//! rule are dropped by the agent.

use famledger_core::{Member, Roster};
use famledger_ingest::mentions_in_order;

/// How a line is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// A named member paid for others
    Payment,
    /// "X owes Y 40" / "X مديون لـ Y"
    DebtAssertion,
    /// "X reimbursed Y 40" / "X paid back Y"
    Reimbursement,
    /// "X took a loan of 100,000 and pays 5,000 monthly"
    Loan,
    /// Someone paid, but no roster member is named
    UnattributedPayment,
}

/// A line plus the lowercase form and word split every rule needs
#[derive(Debug, Clone)]
pub struct LineContext<'a> {
    pub line: &'a str,
    pub lower: String,
    pub words: Vec<String>,
    /// Roster members named in the line, in text order
    pub mentions: Vec<&'a Member>,
}

impl<'a> LineContext<'a> {
    pub fn new(line: &'a str, roster: &'a Roster) -> Self {
        let lower = line.to_lowercase();
        let words = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            line,
            lower,
            words,
            mentions: mentions_in_order(line, roster),
        }
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// True when `first` is directly followed by `second`
    pub fn has_phrase(&self, first: &str, second: &str) -> bool {
        self.words.windows(2).any(|w| w[0] == first && w[1] == second)
    }
}

pub struct LineRule {
    pub kind: LineKind,
    pub matches: fn(&LineContext<'_>) -> bool,
}

/// Precedence is the order of this table.
pub const LINE_RULES: &[LineRule] = &[
    LineRule {
        kind: LineKind::Payment,
        matches: is_named_payment,
    },
    LineRule {
        kind: LineKind::DebtAssertion,
        matches: is_debt_assertion,
    },
    LineRule {
        kind: LineKind::Reimbursement,
        matches: is_reimbursement,
    },
    LineRule {
        kind: LineKind::Loan,
        matches: is_loan,
    },
    LineRule {
        kind: LineKind::UnattributedPayment,
        matches: is_unattributed_payment,
    },
];

/// First matching rule, or `None` when the line should be dropped
pub fn classify(ctx: &LineContext<'_>) -> Option<LineKind> {
    LINE_RULES
        .iter()
        .find(|rule| (rule.matches)(ctx))
        .map(|rule| rule.kind)
}

/// Past-tense forms of دفع. Present and future forms (يدفع, سيدفع) describe
/// installments, not payments.
const PAID_AR: &[&str] = &["دفع", "دفعت", "دفعته", "دفعها", "دفعتها", "دفعنا", "دفعوا"];

fn is_paid_ar(word: &str) -> bool {
    let bare = word
        .strip_prefix('و')
        .or_else(|| word.strip_prefix('ف'))
        .unwrap_or(word);
    PAID_AR.contains(&word) || PAID_AR.contains(&bare)
}

/// "paid" (but not "paid back") or a past-tense Arabic form of دفع
pub fn is_payment(ctx: &LineContext<'_>) -> bool {
    let paid = ctx
        .words
        .iter()
        .enumerate()
        .any(|(i, w)| w == "paid" && ctx.words.get(i + 1).map(String::as_str) != Some("back"));
    paid || ctx.words.iter().any(|w| is_paid_ar(w))
}

fn is_named_payment(ctx: &LineContext<'_>) -> bool {
    !ctx.mentions.is_empty() && is_payment(ctx)
}

fn is_unattributed_payment(ctx: &LineContext<'_>) -> bool {
    ctx.mentions.is_empty() && is_payment(ctx)
}

pub fn is_debt_assertion(ctx: &LineContext<'_>) -> bool {
    ctx.lower.contains(DEBT_KEYWORD) || ctx.line.contains(DEBT_KEYWORD_AR)
}

pub fn is_reimbursement(ctx: &LineContext<'_>) -> bool {
    ctx.lower.contains("reimbursed") || ctx.has_phrase("paid", "back") || ctx.has_word("repaid")
}

pub fn is_loan(ctx: &LineContext<'_>) -> bool {
    ctx.lower.contains("loan") || ctx.line.contains("قرض")
}

/// Loan lines mentioning a monthly installment
pub fn mentions_monthly(ctx: &LineContext<'_>) -> bool {
    ctx.lower.contains("month") || ctx.line.contains("شهري")
}

/// Whole-group beneficiaries: "for everyone", "for all", "للعائلة"
pub fn names_whole_group(ctx: &LineContext<'_>) -> bool {
    ["everyone", "all", "family"].iter().any(|w| ctx.has_word(w))
        || ["الجميع", "العائلة", "للعائلة"].iter().any(|w| ctx.line.contains(w))
}

pub const DEBT_KEYWORD: &str = "owes";
pub const DEBT_KEYWORD_AR: &str = "مديون";
