//! Structured values produced by the clause parsers.

mod clause;
mod predicate;

pub use clause::{GroupBySpec, JoinClause, JoinType, SelectItem, SubqueryExtraction, TableRef};
pub use predicate::{ComparisonOp, Condition, Predicate};
