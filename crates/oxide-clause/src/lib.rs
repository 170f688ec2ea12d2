//! # oxide-clause
//!
//! Decomposes a single hand-written SQL statement into its clauses: the
//! SELECT projection, FROM tables, WHERE predicate, JOINs, GROUP BY/HAVING
//! and subqueries. It is not a full SQL grammar; it recovers enough
//! structure to inspect and validate parameterized queries.
//!
//! This crate provides:
//! - A hand-written lexer that keeps placeholders (`?`, `?1`, `$1`, `@id`,
//!   `:id`) as single tokens
//! - One parser per clause, each scanning only the top level of the main
//!   query
//! - A [`Query`] view classifying the statement and combining every clause
//! - Validation of parsed clauses against table metadata
//!
//! ## Clause Parsers
//!
//! ```rust
//! use oxide_clause::{FromParser, JoinParser, WhereParser};
//!
//! let sql = "SELECT u.name FROM users u \
//!            INNER JOIN orders o ON u.id = o.user_id \
//!            WHERE u.id = @id AND o.total > @min";
//!
//! let from = FromParser::new(sql).unwrap();
//! assert_eq!(from.tables()[0].name, "users");
//! assert_eq!(from.tables()[0].alias.as_deref(), Some("u"));
//!
//! let joins = JoinParser::new(sql).unwrap();
//! assert_eq!(joins.joins()[0].on.as_deref(), Some("u.id = o.user_id"));
//!
//! let filter = WhereParser::new(sql).unwrap();
//! let operands: Vec<&str> = filter.conditions().iter().map(|c| c.operand.as_str()).collect();
//! assert_eq!(operands, ["u.id", "o.total"]);
//! ```
//!
//! ## Errors
//!
//! Every error carries the clause name or the offending fragment:
//!
//! ```rust
//! use oxide_clause::{ParseError, WhereParser};
//!
//! let err = WhereParser::new("SELECT * FROM t WHERE a ~ 1").unwrap_err();
//! assert_eq!(err, ParseError::MalformedCondition { fragment: String::from("a ~ 1") });
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod schema;

pub use ast::{
    ComparisonOp, Condition, GroupBySpec, JoinClause, JoinType, Predicate, SelectItem,
    SubqueryExtraction, TableRef,
};
pub use lexer::{Lexer, Token, TokenKind, normalize};
pub use parser::{
    FromParser, GroupByParser, JoinParser, ParseError, Query, Result, SelectParser,
    StatementKind, SubQueryParser, WhereParser,
};
pub use schema::{ColumnInfo, SchemaValidator, TableSchema, ValidationOptions};
