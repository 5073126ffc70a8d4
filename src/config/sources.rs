//! Configuration sources, in increasing precedence.

pub mod env;
pub mod global_file;
