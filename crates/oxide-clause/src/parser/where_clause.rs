//! WHERE predicate extraction.

use super::base::{Clause, ClauseParser};
use super::error::{ParseError, Result};
use super::predicate::parse_predicate;
use super::statement::Statement;
use super::tables::WHERE_TERMINATORS;
use crate::ast::{Condition, Predicate};

/// The WHERE clause of the main query.
#[derive(Debug, Clone, Copy)]
pub struct WhereFilter;

/// Parses the WHERE predicate of a statement.
pub type WhereParser = ClauseParser<WhereFilter>;

impl Clause for WhereFilter {
    const NAME: &'static str = "WHERE";
    type Output = Predicate;

    fn extract(statement: &Statement) -> Result<Self::Output> {
        let at = statement
            .find_phrase(0, &["WHERE"])
            .ok_or(ParseError::MissingClause { clause: Self::NAME })?;
        let end = statement.clause_end(at + 1, WHERE_TERMINATORS, false);
        parse_predicate(statement, at + 1..end)
    }
}

impl WhereParser {
    /// Returns the predicate tree.
    #[must_use]
    pub fn predicate(&self) -> &Predicate {
        self.output()
    }

    /// Returns the leaf conditions in source order.
    #[must_use]
    pub fn conditions(&self) -> Vec<&Condition> {
        self.output().conditions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ComparisonOp;

    fn conditions(sql: &str) -> Vec<Condition> {
        WhereParser::new(sql).unwrap().into_output().into_conditions()
    }

    #[test]
    fn test_single_condition() {
        assert_eq!(
            conditions("SELECT * FROM users WHERE id = @id"),
            [Condition::new("id", ComparisonOp::Eq, "@id")]
        );
    }

    #[test]
    fn test_stops_at_terminator() {
        assert_eq!(
            conditions("SELECT a FROM t WHERE a > 1 GROUP BY a HAVING COUNT(*) > 2"),
            [Condition::new("a", ComparisonOp::Gt, "1")]
        );
        assert_eq!(
            conditions("SELECT a FROM t WHERE a <> 1 ORDER BY a LIMIT 5;"),
            [Condition::new("a", ComparisonOp::LtGt, "1")]
        );
    }

    #[test]
    fn test_update_and_delete() {
        assert_eq!(
            conditions("UPDATE users SET name = :name WHERE id = :id"),
            [Condition::new("id", ComparisonOp::Eq, ":id")]
        );
        assert_eq!(
            conditions("DELETE FROM users WHERE email LIKE ?1"),
            [Condition::new("email", ComparisonOp::Like, "?1")]
        );
    }

    #[test]
    fn test_where_in_subquery_only() {
        assert_eq!(
            WhereParser::new("SELECT * FROM (SELECT * FROM t WHERE a = 1) x").unwrap_err(),
            ParseError::MissingClause { clause: "WHERE" }
        );
    }

    #[test]
    fn test_empty_where() {
        assert_eq!(
            WhereParser::new("SELECT * FROM t WHERE").unwrap_err(),
            ParseError::malformed_condition("")
        );
        assert_eq!(
            WhereParser::new("SELECT * FROM t WHERE ORDER BY a").unwrap_err(),
            ParseError::malformed_condition("")
        );
    }
}
