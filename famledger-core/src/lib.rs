//! famledger-core: data model, pairwise ledger and settlement engine

pub mod finance;
pub mod ledger;
pub mod member;
pub mod money;
pub mod settlement;
pub mod summary;

pub use finance::{Category, Debt, LOAN_LENDER, Loan, Reimbursement, Transaction};
pub use ledger::Ledger;
pub use member::{Member, Roster, UNKNOWN_MEMBER, normalize_name};
pub use money::{BALANCE_EPSILON, Currency, ResolvedCurrency, round2};
pub use settlement::{Settlement, cents_to_amount, quantize_balances, settle, settle_cents};
pub use summary::{Analysis, MemberSummary, Summary};
