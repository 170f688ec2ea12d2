//! FROM list extraction.

use super::base::{Clause, ClauseParser};
use super::error::{ParseError, Result};
use super::statement::Statement;
use super::tables::FROM_TERMINATORS;
use crate::ast::TableRef;
use crate::lexer::{Keyword, TokenKind};

/// The FROM clause: the comma-separated table references of the main query.
#[derive(Debug, Clone, Copy)]
pub struct FromList;

/// Parses the FROM list of a statement.
///
/// ```
/// use oxide_clause::FromParser;
///
/// let parser = FromParser::new("SELECT * FROM main.users AS u, orders").unwrap();
/// let names: Vec<String> = parser.tables().iter().map(ToString::to_string).collect();
/// assert_eq!(names, ["main.users AS u", "orders"]);
/// ```
pub type FromParser = ClauseParser<FromList>;

impl Clause for FromList {
    const NAME: &'static str = "FROM";
    type Output = Vec<TableRef>;

    fn extract(statement: &Statement) -> Result<Self::Output> {
        let from = statement
            .find_phrase(0, &["FROM"])
            .ok_or(ParseError::MissingClause { clause: Self::NAME })?;
        let body = from + 1..statement.clause_end(from + 1, FROM_TERMINATORS, true);
        if body.is_empty() {
            return Err(ParseError::malformed_clause(Self::NAME, ""));
        }

        statement
            .split_commas(body.clone())
            .into_iter()
            .map(|item| match table_ref(statement, item.start, item.end) {
                Some((table, next)) if next == item.end => Ok(table),
                _ => Err(ParseError::malformed_clause(
                    Self::NAME,
                    statement.slice(body.clone()),
                )),
            })
            .collect()
    }
}

impl FromParser {
    /// Returns the table references in source order.
    #[must_use]
    pub fn tables(&self) -> &[TableRef] {
        self.output()
    }
}

/// Reads `<dotted-name | (subquery)> [[AS] alias]` starting at `at`, not
/// past `end`. Returns the reference and the index after it.
pub(crate) fn table_ref(statement: &Statement, at: usize, end: usize) -> Option<(TableRef, usize)> {
    if at >= end {
        return None;
    }

    let (name, mut i) = if statement.is(at, &TokenKind::LeftParen) {
        let close = statement.partner(at).filter(|&c| c < end)?;
        (String::from(statement.slice(at..close + 1)), close + 1)
    } else {
        statement.dotted_name(at, end)?
    };
    let mut table = TableRef::new(name);

    let has_as = i < end && statement.is_keyword(i, Keyword::As);
    if has_as {
        i += 1;
    }
    match statement.tokens().get(i).filter(|_| i < end).and_then(|t| t.identifier()) {
        Some(alias) => {
            table = table.alias(alias);
            i += 1;
        }
        None if has_as => return None,
        None => {}
    }

    Some((table, i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(sql: &str) -> Vec<TableRef> {
        FromParser::new(sql).unwrap().into_output()
    }

    #[test]
    fn test_single_table() {
        assert_eq!(tables("SELECT id FROM users"), [TableRef::new("users")]);
    }

    #[test]
    fn test_qualified_and_aliased() {
        assert_eq!(
            tables("SELECT * FROM main.users AS u"),
            [TableRef::new("main.users").alias("u")]
        );
        assert_eq!(
            tables("SELECT * FROM db.sch.\"Users\" x WHERE x.a = 1"),
            [TableRef::new("db.sch.Users").alias("x")]
        );
    }

    #[test]
    fn test_comma_list() {
        assert_eq!(
            tables("SELECT * FROM a, b AS bb, c ORDER BY 1"),
            [
                TableRef::new("a"),
                TableRef::new("b").alias("bb"),
                TableRef::new("c")
            ]
        );
    }

    #[test]
    fn test_stops_at_join() {
        assert_eq!(
            tables("SELECT * FROM users u LEFT OUTER JOIN orders o ON u.id = o.user_id"),
            [TableRef::new("users").alias("u")]
        );
    }

    #[test]
    fn test_derived_table() {
        let tables = tables("SELECT t.id FROM (SELECT id FROM users WHERE a = 1) AS t");
        assert_eq!(tables.len(), 1);
        assert!(tables[0].is_subquery());
        assert_eq!(tables[0].name, "(SELECT id FROM users WHERE a = 1)");
        assert_eq!(tables[0].alias.as_deref(), Some("t"));
    }

    #[test]
    fn test_from_inside_subquery_is_ignored() {
        assert_eq!(
            FromParser::new("SELECT (SELECT 1 FROM t)").unwrap_err(),
            ParseError::MissingClause { clause: "FROM" }
        );
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            FromParser::new("SELECT * FROM WHERE a = 1").unwrap_err(),
            ParseError::malformed_clause("FROM", "")
        );
        assert_eq!(
            FromParser::new("SELECT * FROM a,, b").unwrap_err(),
            ParseError::malformed_clause("FROM", "a,, b")
        );
        assert_eq!(
            FromParser::new("SELECT * FROM users AS").unwrap_err(),
            ParseError::malformed_clause("FROM", "users AS")
        );
    }
}
