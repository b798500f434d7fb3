//! The relational query model and its rendering to dialect-specific SQL.

pub mod ast;
pub mod convert;
pub mod dialect;
pub mod helpers;
pub mod string;
