//! The parsed form of the query options: filter expressions, apply pipelines, ordering and
//! projection. This is what a query option parser hands to the translation engine.

pub mod clauses;
pub mod expression;
pub mod transformation;

pub use clauses::*;
pub use expression::*;
pub use transformation::*;
