//! Filesystem adapter. Implements FileResolverPort.

pub mod glob_resolver;

pub use glob_resolver::GlobResolver;
