//! HTML pages, compiled into the binary.
//!
//! Templates end in `.html`, so minijinja's default callback turns on HTML
//! auto-escaping for every interpolated value.

use std::sync::Arc;

use clarity_core::JournalEntry;
use minijinja::{context, Environment};
use serde::Serialize;

const INDEX: &str = "index.html";
const ENTRIES: &str = "entries.html";

#[derive(Clone)]
pub struct Templates {
    env: Arc<Environment<'static>>,
}

#[derive(Debug, Serialize)]
struct EntryView<'a> {
    id: i64,
    content: &'a str,
    insight: &'a str,
    created_at: String,
}

impl<'a> From<&'a JournalEntry> for EntryView<'a> {
    fn from(entry: &'a JournalEntry) -> Self {
        Self {
            id: entry.id,
            content: &entry.content,
            insight: entry.insight.as_deref().unwrap_or(""),
            created_at: entry.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX, include_str!("../templates/index.html"))?;
        env.add_template(ENTRIES, include_str!("../templates/entries.html"))?;
        Ok(Self { env: Arc::new(env) })
    }

    pub fn index(&self) -> Result<String, minijinja::Error> {
        self.env.get_template(INDEX)?.render(context! {})
    }

    /// Render `entries` in the order given.
    pub fn entries(&self, entries: &[JournalEntry]) -> Result<String, minijinja::Error> {
        let views: Vec<EntryView<'_>> = entries.iter().map(EntryView::from).collect();
        self.env
            .get_template(ENTRIES)?
            .render(context! { entries => views })
    }
}
