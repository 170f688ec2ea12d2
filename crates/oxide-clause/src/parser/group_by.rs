//! GROUP BY and HAVING extraction.

use super::base::{Clause, ClauseParser};
use super::error::{ParseError, Result};
use super::predicate::parse_predicate;
use super::statement::Statement;
use super::tables::{GROUP_BY_TERMINATORS, HAVING_TERMINATORS};
use crate::ast::{GroupBySpec, Predicate};

/// The optional GROUP BY list with its HAVING predicate.
#[derive(Debug, Clone, Copy)]
pub struct Grouping;

/// Parses the GROUP BY and HAVING clauses of a statement.
pub type GroupByParser = ClauseParser<Grouping>;

impl Clause for Grouping {
    const NAME: &'static str = "GROUP BY";
    type Output = Option<GroupBySpec>;

    fn extract(statement: &Statement) -> Result<Self::Output> {
        let group_by = statement.find_phrase(0, &["GROUP", "BY"]);
        let having = statement.find_phrase(0, &["HAVING"]);
        if group_by.is_none() && having.is_none() {
            return Ok(None);
        }

        let columns = match group_by {
            Some(at) => {
                let body = at + 2..statement.clause_end(at + 2, GROUP_BY_TERMINATORS, false);
                let parts = statement.split_commas(body.clone());
                if parts.is_empty() || parts.iter().any(|part| part.is_empty()) {
                    return Err(ParseError::malformed_clause(
                        Self::NAME,
                        statement.slice(body),
                    ));
                }
                parts
                    .into_iter()
                    .map(|part| String::from(statement.slice(part)))
                    .collect()
            }
            None => Vec::new(),
        };

        let having = having
            .map(|at| {
                let end = statement.clause_end(at + 1, HAVING_TERMINATORS, false);
                parse_predicate(statement, at + 1..end)
            })
            .transpose()?;

        Ok(Some(GroupBySpec { columns, having }))
    }
}

impl GroupByParser {
    /// Returns the grouping, if the statement has GROUP BY or HAVING.
    #[must_use]
    pub fn group_by(&self) -> Option<&GroupBySpec> {
        self.output().as_ref()
    }

    /// Returns the grouping columns (empty without GROUP BY).
    #[must_use]
    pub fn columns(&self) -> &[String] {
        self.group_by().map_or(&[][..], |spec| spec.columns.as_slice())
    }

    /// Returns the HAVING predicate.
    #[must_use]
    pub fn having(&self) -> Option<&Predicate> {
        self.group_by().and_then(|spec| spec.having.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ComparisonOp, Condition};

    #[test]
    fn test_group_by_with_having() {
        let parser =
            GroupByParser::new("SELECT status, COUNT(*) FROM t GROUP BY status HAVING COUNT(*) > 5")
                .unwrap();
        assert_eq!(parser.columns(), ["status"]);
        assert_eq!(
            parser.having().unwrap().conditions(),
            [&Condition::new("COUNT(*)", ComparisonOp::Gt, "5")]
        );
    }

    #[test]
    fn test_multiple_columns() {
        let parser =
            GroupByParser::new("SELECT a, b FROM t GROUP BY a, LOWER(b), t.c ORDER BY a").unwrap();
        assert_eq!(parser.columns(), ["a", "LOWER(b)", "t.c"]);
        assert!(parser.having().is_none());
    }

    #[test]
    fn test_absent() {
        let parser = GroupByParser::new("SELECT a FROM t WHERE a = 1").unwrap();
        assert!(parser.group_by().is_none());
        assert!(parser.columns().is_empty());
    }

    #[test]
    fn test_having_without_group_by() {
        let parser = GroupByParser::new("SELECT COUNT(*) FROM t HAVING COUNT(*) > 1").unwrap();
        let spec = parser.group_by().unwrap();
        assert!(spec.columns.is_empty());
        assert!(spec.having.is_some());
    }

    #[test]
    fn test_grouping_inside_subquery_is_ignored() {
        let parser =
            GroupByParser::new("SELECT * FROM (SELECT a FROM t GROUP BY a) x").unwrap();
        assert!(parser.group_by().is_none());
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            GroupByParser::new("SELECT a FROM t GROUP BY HAVING a > 1").unwrap_err(),
            ParseError::malformed_clause("GROUP BY", "")
        );
        assert_eq!(
            GroupByParser::new("SELECT a FROM t GROUP BY a,").unwrap_err(),
            ParseError::malformed_clause("GROUP BY", "a,")
        );
        assert_eq!(
            GroupByParser::new("SELECT a FROM t GROUP BY a HAVING").unwrap_err(),
            ParseError::malformed_condition("")
        );
    }
}
