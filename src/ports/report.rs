//! Reporting outbound port. User-facing progress and failures.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReportLevel::Info => "info",
            ReportLevel::Warn => "warn",
            ReportLevel::Error => "error",
        };
        f.write_str(s)
    }
}

/// Port for reporting what a run did.
///
/// Injected into services and adapters instead of configuring a global logger.
/// The production adapter forwards to `tracing`; tests record entries in memory.
pub trait ReportPort: Send + Sync {
    fn report(&self, level: ReportLevel, message: &str);

    fn info(&self, message: &str) {
        self.report(ReportLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.report(ReportLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.report(ReportLevel::Error, message);
    }
}
