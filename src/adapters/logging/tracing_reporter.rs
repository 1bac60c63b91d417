//! Implements ReportPort on top of `tracing`.

use crate::ports::{ReportLevel, ReportPort};
use tracing::{error, info, warn};

/// Forwards reports to the process `tracing` subscriber (configured in `main`).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl TracingReporter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for TracingReporter {
    fn report(&self, level: ReportLevel, message: &str) {
        match level {
            ReportLevel::Info => info!("{}", message),
            ReportLevel::Warn => warn!("{}", message),
            ReportLevel::Error => error!("{}", message),
        }
    }
}
