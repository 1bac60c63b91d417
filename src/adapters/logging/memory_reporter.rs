//! In-memory ReportPort for tests. Records every entry in order.

use crate::ports::{ReportLevel, ReportPort};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryReporter {
    entries: Mutex<Vec<(ReportLevel, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn entries(&self) -> Vec<(ReportLevel, String)> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    /// Messages reported at `level`.
    pub fn messages(&self, level: ReportLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    /// True if some entry at `level` contains every needle.
    pub fn contains(&self, level: ReportLevel, needles: &[&str]) -> bool {
        self.messages(level)
            .iter()
            .any(|m| needles.iter().all(|n| m.contains(n)))
    }
}

impl ReportPort for MemoryReporter {
    fn report(&self, level: ReportLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}
