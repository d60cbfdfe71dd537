//! famledger-ingest: text-level extraction of amounts, currencies and member names.

pub mod amount;
pub mod currency;
pub mod members;

pub use amount::{AmountMatch, extract_amount, extract_amounts, normalize_digits, parse_number};
pub use currency::detect_currency;
pub use members::{find_members, find_members_exact, first_member, mentions_in_order};
