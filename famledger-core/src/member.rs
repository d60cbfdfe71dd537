//! Family members and the fixed roster one analysis runs against.
//!
//! Names are normalized once (whitespace collapsed, title-cased) and compared
//! by plain string equality afterwards.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name of the placeholder member used when name resolution fails.
pub const UNKNOWN_MEMBER: &str = "Unknown";

/// A normalized member name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Member(String);

impl Member {
    /// Normalize a raw display name. Returns `None` for blank input.
    pub fn new(raw: &str) -> Option<Self> {
        let name = normalize_name(raw);
        if name.is_empty() { None } else { Some(Self(name)) }
    }

    /// The sentinel member for names that could not be resolved.
    ///
    /// It is a valid member everywhere (ledger, summary, settlements) but is
    /// never part of a [`Roster`].
    pub fn unknown() -> Self {
        Self(UNKNOWN_MEMBER.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_MEMBER
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Member {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Collapse runs of whitespace and title-case each word.
///
/// Letters directly after a non-letter start a new word, so `"o'neil"`
/// becomes `"O'Neil"`. Scripts without case (Arabic) pass through unchanged.
pub fn normalize_name(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    let mut prev_alpha = false;
    for c in collapsed.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// Ordered, de-duplicated set of members known to one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    members: Vec<Member>,
}

impl Roster {
    /// Build a roster from raw display names.
    ///
    /// Blank names are ignored and duplicates (after normalization) keep their
    /// first position. Fails when nothing is left, or when a name collides with
    /// the `Unknown` sentinel.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut members: Vec<Member> = Vec::new();
        for name in names {
            if let Some(member) = Member::new(name.as_ref()) {
                if member.is_unknown() {
                    bail!("{:?} is reserved for unresolved names", name.as_ref());
                }
                if !members.contains(&member) {
                    members.push(member);
                }
            }
        }
        if members.is_empty() {
            bail!("roster must contain at least one member name");
        }
        Ok(Self { members })
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Member> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, member: &Member) -> bool {
        self.members.contains(member)
    }

    /// Everyone except `member`, in roster order
    pub fn others(&self, member: &Member) -> Vec<Member> {
        self.members.iter().filter(|m| *m != member).cloned().collect()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Member;
    type IntoIter = std::slice::Iter<'a, Member>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}
