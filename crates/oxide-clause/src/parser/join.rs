//! JOIN extraction.

use tracing::trace;

use super::base::{Clause, ClauseParser};
use super::error::{ParseError, Result};
use super::from::table_ref;
use super::predicate::parse_predicate;
use super::statement::Statement;
use super::tables::{CLAUSE_TERMINATORS, JOIN_PHRASES, match_any, match_table};
use crate::ast::{JoinClause, JoinType, TableRef};
use crate::lexer::{Keyword, TokenKind, column_path};

/// Every top-level JOIN of the main query.
#[derive(Debug, Clone, Copy)]
pub struct JoinList;

/// Parses the JOIN clauses of a statement.
pub type JoinParser = ClauseParser<JoinList>;

impl Clause for JoinList {
    const NAME: &'static str = "JOIN";
    type Output = Vec<JoinClause>;

    fn extract(statement: &Statement) -> Result<Self::Output> {
        let tokens = statement.tokens();
        let mut joins = Vec::new();
        let mut i = 0;
        while i < statement.len() {
            let matched = (statement.depth(i) == 0)
                .then(|| match_table(tokens, i, JOIN_PHRASES))
                .flatten();
            let Some((join_type, len)) = matched else {
                i += 1;
                continue;
            };
            let end = segment_end(statement, i + len);
            joins.push(join_clause(statement, join_type, i, i + len, end)?);
            i = end;
        }
        Ok(joins)
    }
}

impl JoinParser {
    /// Returns the joins in source order.
    #[must_use]
    pub fn joins(&self) -> &[JoinClause] {
        self.output()
    }
}

/// A join runs to the next join phrase, clause terminator, top-level comma
/// or the end of the statement.
fn segment_end(statement: &Statement, from: usize) -> usize {
    let tokens = statement.tokens();
    (from..statement.len())
        .find(|&i| {
            statement.depth(i) == 0
                && (matches!(tokens[i].kind, TokenKind::Comma)
                    || match_any(tokens, i, CLAUSE_TERMINATORS).is_some()
                    || match_table(tokens, i, JOIN_PHRASES).is_some())
        })
        .unwrap_or(statement.len())
}

fn join_clause(
    statement: &Statement,
    join_type: JoinType,
    phrase_at: usize,
    table_at: usize,
    end: usize,
) -> Result<JoinClause> {
    let malformed = || ParseError::malformed_clause(JoinList::NAME, statement.slice(phrase_at..end));

    let (table, next) = table_ref(statement, table_at, end).ok_or_else(malformed)?;
    let mut join = JoinClause {
        join_type,
        table,
        on: None,
        using: Vec::new(),
    };

    if statement.is_keyword(next, Keyword::On) && next < end {
        if next + 1 == end {
            return Err(malformed());
        }
        let predicate = parse_predicate(statement, next + 1..end)?;
        let conditions = predicate.conditions();
        if !conditions
            .iter()
            .any(|c| references_table(&join.table, &c.operand, &c.value))
        {
            if let Some(condition) = conditions.first() {
                return Err(ParseError::UnknownColumnReference {
                    table: join.table.qualifier().to_owned(),
                    predicate: condition.to_string(),
                });
            }
        }
        join.on = Some(String::from(statement.slice(next + 1..end)));
    } else if statement.is_keyword(next, Keyword::Using) && next < end {
        let open = next + 1;
        let close = statement
            .is(open, &TokenKind::LeftParen)
            .then(|| statement.partner(open))
            .flatten()
            .filter(|&c| c + 1 == end)
            .ok_or_else(malformed)?;
        for column in statement.split_commas(open + 1..close) {
            if !statement.is_column_like(column.clone()) {
                return Err(malformed());
            }
            join.using.push(String::from(statement.slice(column)));
        }
        if join.using.is_empty() {
            return Err(malformed());
        }
    } else if next < end {
        return Err(malformed());
    } else if !join_type.allows_missing_on() {
        return Err(ParseError::MissingClause { clause: "ON" });
    }

    trace!(join = %join.join_type, table = %join.table, "extracted join");
    Ok(join)
}

/// False only for a comparison between two qualified columns where neither
/// side is qualified by the joined table. An ON predicate is rejected when
/// none of its leaves references the joined table.
fn references_table(table: &TableRef, operand: &str, value: &str) -> bool {
    let (Some(left), Some(right)) = (column_qualifier(operand), column_qualifier(value)) else {
        return true;
    };
    let names = [table.qualifier(), table.table_name()];
    let refers = |qualifier: &str| names.iter().any(|n| n.eq_ignore_ascii_case(qualifier));
    refers(&left) || refers(&right)
}

/// Returns the table qualifier of a `table.column` (or `schema.table.column`)
/// reference, `None` for anything else.
fn column_qualifier(text: &str) -> Option<String> {
    let mut path = column_path(text)?;
    path.pop();
    path.pop()
}
