//! Version-control adapter. Implements RepoMetadataPort.

pub mod cli_reader;

pub use cli_reader::GitCliReader;
