//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;

pub use entities::{
    CAPTION_LIMIT, DEFAULT_DIRECTORY_PATTERN, FileSelection, GitInfo, MAX_MEDIA_GROUP_SIZE,
    MediaDescriptor, MediaGroup, MediaItem, MediaKind, NOT_TAGGED,
};
pub use errors::DomainError;
