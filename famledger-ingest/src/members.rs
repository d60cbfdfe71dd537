//! Member name resolution by case-insensitive substring match.
//!
//! Known limitation: a name that is a substring of another name or of an
//! ordinary word ("Al" in "Sally", "Sam" in "Samir") matches too. This is
//! accepted heuristic behaviour for short family rosters.

use famledger_core::{Member, Roster};

/// Roster members whose name occurs in `text`, in roster order
pub fn find_members<'r>(text: &str, roster: &'r Roster) -> Vec<&'r Member> {
    let lower = text.to_lowercase();
    roster
        .iter()
        .filter(|m| lower.contains(&m.as_str().to_lowercase()))
        .collect()
}

/// First roster member (roster order) found in `text`
pub fn first_member<'r>(text: &str, roster: &'r Roster) -> Option<&'r Member> {
    find_members(text, roster).into_iter().next()
}

/// Roster members whose name occurs in `text` exactly as written (case-sensitive)
pub fn find_members_exact<'r>(text: &str, roster: &'r Roster) -> Vec<&'r Member> {
    roster.iter().filter(|m| text.contains(m.as_str())).collect()
}

/// Roster members found in `text`, ordered by where they are first mentioned.
///
/// Members at the same position keep roster order.
pub fn mentions_in_order<'r>(text: &str, roster: &'r Roster) -> Vec<&'r Member> {
    let lower = text.to_lowercase();
    let mut found: Vec<(usize, &Member)> = roster
        .iter()
        .filter_map(|m| lower.find(&m.as_str().to_lowercase()).map(|pos| (pos, m)))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, m)| m).collect()
}
