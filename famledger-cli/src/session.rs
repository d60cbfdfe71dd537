//! Line-oriented chat loop mirroring the family bot commands.
//!
//! Every message either runs a slash command or is stored as a note for the
//! current conversation. Summaries re-analyze the stored notes on demand.

use anyhow::Result;
use chrono::{DateTime, Utc};
use famledger_finance::FinanceAgent;
use std::io::{self, BufRead, Write};

use crate::notes::{ChatId, Note, NoteStore, SummaryPeriod, notes_text};
use crate::report::{format_loans_ar, format_summary_ar};

const WELCOME: &str = "مرحباً 👋\n\
هذا بوت لمتابعة مصروف العائلة والقروض والأقساط.\n\
اكتب أي حركة مالية مثلاً:\n\
\"دفعت ٢٠٠ درهم بقالة للعائلة\"، ثم استخدم /summary لرؤية الملخص.";

const HELP: &str = "الأوامر المتاحة:\n\
\n\
/start – بدء استخدام البوت\n\
/help – عرض هذه المساعدة\n\
/summary – ملخص حركات هذا الشهر\n\
/summary all – ملخص جميع الحركات المسجلة\n\
/loans – عرض القروض والأقساط الشهرية\n\
/reset – حذف جميع البيانات في هذه المحادثة\n\
/quit – إنهاء الجلسة\n\
\n\
أي رسالة عادية بدون أمر يتم اعتبارها حركة مالية.\n\
\n\
أمثلة:\n\
- دفعت ٢٠٠ درهم بقالة للعائلة\n\
- إيجار الشقة ٣٥٠٠ درهم دفعتها مريم\n\
- أحمد أخذ قرض سيارة ١٠٠٬٠٠٠ درهم ويسدد ٥٬٠٠٠ شهرياً";

const NO_NOTES: &str = "لا توجد أي حركات مالية مسجلة بعد.";
const EMPTY_PERIOD: &str = "لا توجد حركات مالية في هذه الفترة.";
const NO_LOANS: &str = "لا توجد قروض مسجلة حتى الآن.";
const RESET_DONE: &str = "تم حذف جميع البيانات المسجلة لهذه المحادثة.";
const NOTE_SAVED: &str = "تم تسجيل الحركة المالية.";
const UNKNOWN_COMMAND: &str = "أمر غير معروف. اكتب /help";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

impl Reply {
    fn text(s: impl Into<String>) -> Self {
        Reply::Text(s.into())
    }
}

pub struct Session<'a> {
    store: &'a dyn NoteStore,
    chat: ChatId,
    agent: FinanceAgent,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a dyn NoteStore, chat: ChatId, agent: FinanceAgent) -> Self {
        Self { store, chat, agent }
    }

    /// Handle one message received at `now`.
    pub fn handle(&self, input: &str, now: DateTime<Utc>) -> Option<Reply> {
        let s = input.trim();
        if s.is_empty() {
            return None;
        }
        if !s.starts_with('/') {
            self.store.append(self.chat, Note::new(s, now));
            tracing::debug!(chat = self.chat, "note stored");
            return Some(Reply::text(NOTE_SAVED));
        }

        let mut parts = s.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let reply = match command {
            "/start" => Reply::text(WELCOME),
            "/help" => Reply::text(HELP),
            "/summary" => Reply::text(self.summary(SummaryPeriod::from_arg(parts.next()), now)),
            "/loans" => Reply::text(self.loans()),
            "/reset" => {
                self.store.clear(self.chat);
                Reply::text(RESET_DONE)
            }
            "/quit" | "/exit" => Reply::Quit,
            _ => Reply::text(UNKNOWN_COMMAND),
        };
        Some(reply)
    }

    fn summary(&self, period: SummaryPeriod, now: DateTime<Utc>) -> String {
        let notes = self.store.get(self.chat);
        if notes.is_empty() {
            return NO_NOTES.to_string();
        }
        let selected = period.filter(&notes, now);
        if selected.is_empty() {
            return EMPTY_PERIOD.to_string();
        }
        let analysis = self.agent.analyze(&notes_text(selected));
        format_summary_ar(&analysis, period.label_ar())
    }

    fn loans(&self) -> String {
        let notes = self.store.get(self.chat);
        if notes.is_empty() {
            return NO_NOTES.to_string();
        }
        let analysis = self.agent.analyze(&notes_text(&notes));
        format_loans_ar(&analysis).unwrap_or_else(|| NO_LOANS.to_string())
    }
}

/// Read messages from stdin until `/quit` or end of input.
pub fn run_session(session: &Session<'_>) -> Result<()> {
    println!("{WELCOME}\n");
    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("> ");
        io::stdout().flush().ok();
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        match session.handle(&line, Utc::now()) {
            Some(Reply::Text(text)) => println!("{text}\n"),
            Some(Reply::Quit) => break,
            None => {}
        }
    }
    Ok(())
}
