//! Reporting adapters. Implement ReportPort.
//!
//! `TracingReporter` for the binary, `MemoryReporter` for tests.

pub mod memory_reporter;
pub mod tracing_reporter;

pub use memory_reporter::MemoryReporter;
pub use tracing_reporter::TracingReporter;
