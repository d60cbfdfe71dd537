//! Record types produced by parsing family expense notes

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::member::Member;
use crate::money::Currency;

/// Lender recorded on every loan; the notes never name a specific bank.
pub const LOAN_LENDER: &str = "Bank";

/// Expense categories matched deterministically
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "rent")]
    Rent,
    #[serde(rename = "groceries")]
    Groceries,
    #[serde(rename = "school_fees")]
    SchoolFees,
    /// Road tolls (Salik)
    #[serde(rename = "toll")]
    Toll,
    #[serde(rename = "parking")]
    Parking,
    #[serde(rename = "electricity")]
    Electricity,
    #[serde(rename = "water")]
    Water,
    #[serde(rename = "telecom")]
    Telecom,
    #[serde(rename = "loan")]
    Loan,
    #[serde(rename = "uncategorized")]
    Uncategorized,
}

impl Category {
    /// Stable machine tag (same as the serde name)
    pub fn tag(&self) -> &'static str {
        match self {
            Category::Rent => "rent",
            Category::Groceries => "groceries",
            Category::SchoolFees => "school_fees",
            Category::Toll => "toll",
            Category::Parking => "parking",
            Category::Electricity => "electricity",
            Category::Water => "water",
            Category::Telecom => "telecom",
            Category::Loan => "loan",
            Category::Uncategorized => "uncategorized",
        }
    }

    /// Label shown in Arabic reports
    pub fn arabic_label(&self) -> &'static str {
        match self {
            Category::Rent => "إيجار",
            Category::Groceries => "بقالة",
            Category::SchoolFees => "رسوم مدرسة",
            Category::Toll => "سالك",
            Category::Parking => "مواقف",
            Category::Electricity => "كهرباء",
            Category::Water => "مياه",
            Category::Telecom => "اتصالات",
            Category::Loan => "قرض",
            Category::Uncategorized => "غير مصنف",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A shared payment parsed from one line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// The raw line
    pub description: String,
    pub payer: Member,
    pub amount: f64,
    pub currency: Currency,
    /// Ordered, no duplicates
    pub beneficiaries: Vec<Member>,
    /// Even split, each rounded to 2 decimals
    pub shares: BTreeMap<Member, f64>,
    pub category: Category,
}

impl Transaction {
    pub fn share_of(&self, member: &Member) -> f64 {
        self.shares.get(member).copied().unwrap_or(0.0)
    }

    pub fn shares_total(&self) -> f64 {
        self.shares.values().sum()
    }
}

/// A directed amount between two members.
///
/// Used for explicit "X owes Y" assertions and for pairwise ledger entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Debt {
    pub from: Member,
    pub to: Member,
    pub amount: f64,
}

/// "X reimbursed Y" - a repayment clamped against the recorded debt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reimbursement {
    pub description: String,
    pub from: Member,
    pub to: Member,
    /// Amount written on the line
    pub requested: f64,
    /// Amount actually removed from the ledger (never more than was owed)
    pub applied: f64,
}

/// A bank loan taken by one member.
///
/// `months_total`, `months_paid` and `remaining_principal` are not parsed from
/// notes yet and are always `None`; they are kept so amortization tracking can
/// be added without changing the record shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Loan {
    pub description: String,
    pub borrower: Member,
    pub lender: String,
    pub principal: f64,
    pub currency: Currency,
    pub monthly_payment: Option<f64>,
    pub months_total: Option<u32>,
    pub months_paid: Option<u32>,
    pub remaining_principal: Option<f64>,
}

impl Loan {
    pub fn new(
        description: impl Into<String>,
        borrower: Member,
        principal: f64,
        currency: Currency,
        monthly_payment: Option<f64>,
    ) -> Self {
        Self {
            description: description.into(),
            borrower,
            lender: LOAN_LENDER.to_string(),
            principal,
            currency,
            monthly_payment,
            months_total: None,
            months_paid: None,
            remaining_principal: None,
        }
    }

    /// Months needed to repay the principal at the monthly rate, if known
    pub fn estimated_term_months(&self) -> Option<u32> {
        let monthly = self.monthly_payment.filter(|m| *m > 0.0)?;
        Some((self.principal / monthly).ceil() as u32)
    }
}
