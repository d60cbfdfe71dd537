//! famledger-finance: category rules, line classification and the finance agent

pub mod agent;
pub mod aggregate;
pub mod category_rules;
pub mod line_rules;

pub use agent::FinanceAgent;
pub use aggregate::Accumulator;
pub use category_rules::categorize;
pub use line_rules::{LINE_RULES, LineContext, LineKind, LineRule, classify};

pub use famledger_core::{
    Analysis, Category, Currency, Debt, Loan, Member, MemberSummary, Reimbursement,
    ResolvedCurrency, Roster, Settlement, Summary, Transaction,
};
