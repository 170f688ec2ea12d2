//! Clause parsers
//!
//! Every parser normalizes and tokenizes its input once into a
//! [`Statement`], then scans the top level of the token stream for its own
//! clause. Keywords inside parentheses (subqueries, function arguments, CTE
//! bodies) are never mistaken for clauses of the main query.

mod base;
mod error;
mod from;
mod group_by;
mod join;
mod predicate;
mod query;
mod select;
mod statement;
mod subquery;
mod tables;
mod where_clause;

pub use base::{Clause, ClauseParser};
pub use error::{ParseError, Result};
pub use from::{FromList, FromParser};
pub use group_by::{GroupByParser, Grouping};
pub use join::{JoinList, JoinParser};
pub use predicate::parse_predicate;
pub use query::{Query, StatementKind};
pub use select::{Projection, SelectParser};
pub use statement::{MAX_NESTING_DEPTH, Statement};
pub use subquery::{SubQueryParser, Subqueries};
pub use tables::{FUNCTION_ARITY, function_arity};
pub use where_clause::{WhereFilter, WhereParser};
