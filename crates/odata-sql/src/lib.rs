//! Translate query options into parameterized SQL.
//!
//! A [`Converter`] parses the query options of a request, translates them into a query model
//! against a table or a raw SQL fragment, and compiles the model in the configured dialect.

pub mod converter;
pub mod json_parser;

pub use converter::{CompiledQuery, ConvertOptions, Converter};
pub use json_parser::{JsonParser, JsonParserFactory};
pub use query_engine_translation::translation::error::Error;
pub use query_engine_translation::translation::parser::QueryParameters;
