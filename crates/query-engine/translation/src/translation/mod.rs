//! Translate parsed query options into the relational query model.

pub mod error;
pub mod helpers;
pub mod parser;
pub mod query;
