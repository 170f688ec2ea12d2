//! Subquery and table-usage extraction.

use super::base::{Clause, ClauseParser};
use super::error::{ParseError, Result};
use super::from::FromList;
use super::join::JoinList;
use super::statement::Statement;
use crate::ast::{SubqueryExtraction, TableRef};
use crate::lexer::{Keyword, TokenKind};

/// Parenthesized subqueries at any depth, and the tables the main query
/// reads.
#[derive(Debug, Clone, Copy)]
pub struct Subqueries;

/// Extracts the subqueries of a statement.
///
/// `tables_used` covers the FROM and JOIN tables of the main query only;
/// the returned subquery texts can be fed back to a new parser to inspect
/// their own tables.
pub type SubQueryParser = ClauseParser<Subqueries>;

impl Clause for Subqueries {
    const NAME: &'static str = "subquery";
    type Output = SubqueryExtraction;

    fn extract(statement: &Statement) -> Result<Self::Output> {
        let mut subqueries: Vec<String> = Vec::new();
        for open in 0..statement.len() {
            if !statement.is(open, &TokenKind::LeftParen)
                || !statement.is_keyword(open + 1, Keyword::Select)
            {
                continue;
            }
            let Some(close) = statement.partner(open) else {
                continue;
            };
            let text = statement.slice(open..close + 1);
            if !subqueries.iter().any(|s| s == text) {
                subqueries.push(String::from(text));
            }
        }

        let from = match FromList::extract(statement) {
            Ok(tables) => tables,
            Err(ParseError::MissingClause { .. }) => Vec::new(),
            Err(err) => return Err(err),
        };
        let joined = JoinList::extract(statement)?.into_iter().map(|join| join.table);

        let mut tables_used: Vec<TableRef> = Vec::new();
        for table in from.into_iter().chain(joined) {
            if !table.is_subquery() && !tables_used.contains(&table) {
                tables_used.push(table);
            }
        }

        Ok(SubqueryExtraction {
            subqueries,
            tables_used,
        })
    }
}

impl SubQueryParser {
    /// Returns the subquery texts, outer before inner.
    #[must_use]
    pub fn subqueries(&self) -> &[String] {
        &self.output().subqueries
    }

    /// Returns the tables the main query reads.
    #[must_use]
    pub fn tables_used(&self) -> &[TableRef] {
        &self.output().tables_used
    }
}
