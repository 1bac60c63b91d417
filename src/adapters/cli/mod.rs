//! CLI adapter. Turns command-line flags into a deploy request.

pub mod args;

pub use args::{Cli, parse_bool_like};
