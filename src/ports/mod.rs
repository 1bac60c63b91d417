//! Port traits. API boundaries for the hexagon.
//!
//! - Outbound: Called by application into infrastructure
//! - Report: Called by application and adapters to surface progress

pub mod outbound;
pub mod report;

pub use outbound::{FileResolverPort, MediaGroupGateway, RepoMetadataPort};
pub use report::{ReportLevel, ReportPort};
