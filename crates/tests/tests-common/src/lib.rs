//! Common functionality used across test cases.

pub mod deployment;
pub mod goldenfiles;
