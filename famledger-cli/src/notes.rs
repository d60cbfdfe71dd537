//! Per-conversation note storage for the session loop.
//!
//! Handlers receive a `&dyn NoteStore`; nothing is held in module state.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

pub type ChatId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            created_at,
        }
    }
}

pub trait NoteStore: Send + Sync {
    /// Notes for one conversation, oldest first
    fn get(&self, chat: ChatId) -> Vec<Note>;
    fn append(&self, chat: ChatId, note: Note);
    fn clear(&self, chat: ChatId);
}

#[derive(Debug, Default)]
pub struct InMemoryNoteStore {
    notes: Mutex<HashMap<ChatId, Vec<Note>>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoteStore for InMemoryNoteStore {
    fn get(&self, chat: ChatId) -> Vec<Note> {
        let notes = self.notes.lock().unwrap_or_else(|e| e.into_inner());
        notes.get(&chat).cloned().unwrap_or_default()
    }

    fn append(&self, chat: ChatId, note: Note) {
        let mut notes = self.notes.lock().unwrap_or_else(|e| e.into_inner());
        notes.entry(chat).or_default().push(note);
    }

    fn clear(&self, chat: ChatId) {
        let mut notes = self.notes.lock().unwrap_or_else(|e| e.into_inner());
        notes.remove(&chat);
    }
}

/// Which notes a summary covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryPeriod {
    /// Calendar month (UTC) of `now`
    CurrentMonth,
    All,
}

impl SummaryPeriod {
    /// `all` / `الكل` select everything; anything else means this month.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg.map(|a| a.trim().to_lowercase()) {
            Some(a) if a == "all" || a == "الكل" => SummaryPeriod::All,
            _ => SummaryPeriod::CurrentMonth,
        }
    }

    pub fn label_ar(&self) -> &'static str {
        match self {
            SummaryPeriod::CurrentMonth => "ملخص هذا الشهر:",
            SummaryPeriod::All => "ملخص جميع الحركات المسجلة:",
        }
    }

    pub fn filter<'a>(&self, notes: &'a [Note], now: DateTime<Utc>) -> Vec<&'a Note> {
        notes
            .iter()
            .filter(|n| match self {
                SummaryPeriod::All => true,
                SummaryPeriod::CurrentMonth => {
                    n.created_at.year() == now.year() && n.created_at.month() == now.month()
                }
            })
            .collect()
    }
}

/// Join note texts into the block handed to the finance agent
pub fn notes_text<'a, I>(notes: I) -> String
where
    I: IntoIterator<Item = &'a Note>,
{
    notes
        .into_iter()
        .map(|n| n.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_store_isolates_conversations() {
        let store = InMemoryNoteStore::new();
        store.append(1, Note::new("Alex paid 10 for Sam", at(2026, 3, 1)));
        store.append(2, Note::new("Sam paid 5 for Alex", at(2026, 3, 1)));
        store.append(1, Note::new("Jamie owes Alex 4", at(2026, 3, 2)));

        assert_eq!(store.get(1).len(), 2);
        assert_eq!(store.get(2).len(), 1);
        assert!(store.get(3).is_empty());

        store.clear(1);
        assert!(store.get(1).is_empty());
        assert_eq!(store.get(2).len(), 1);
    }

    #[test]
    fn test_period_from_arg() {
        assert_eq!(SummaryPeriod::from_arg(None), SummaryPeriod::CurrentMonth);
        assert_eq!(SummaryPeriod::from_arg(Some("ALL")), SummaryPeriod::All);
        assert_eq!(SummaryPeriod::from_arg(Some("الكل")), SummaryPeriod::All);
        assert_eq!(SummaryPeriod::from_arg(Some("week")), SummaryPeriod::CurrentMonth);
    }

    #[test]
    fn test_current_month_filter() {
        let notes = vec![
            Note::new("old", at(2026, 2, 27)),
            Note::new("new", at(2026, 3, 4)),
            Note::new("last year", at(2025, 3, 4)),
        ];
        let now = at(2026, 3, 15);
        let month = SummaryPeriod::CurrentMonth.filter(&notes, now);
        assert_eq!(notes_text(month), "new");
        assert_eq!(SummaryPeriod::All.filter(&notes, now).len(), 3);
    }
}
