//! Statement classification and the combined clause view.

use core::fmt;

use serde::Serialize;
use tracing::debug;

use super::base::Clause;
use super::error::{ParseError, Result};
use super::from::FromList;
use super::group_by::Grouping;
use super::join::JoinList;
use super::select::Projection;
use super::statement::Statement;
use super::subquery::Subqueries;
use super::where_clause::WhereFilter;
use crate::ast::{Condition, GroupBySpec, JoinClause, Predicate, SelectItem, SubqueryExtraction, TableRef};
use crate::lexer::Keyword;

/// The kind of statement, by its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Drop,
    Alter,
}

impl StatementKind {
    /// Returns the leading keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::Drop => "DROP",
            Self::Alter => "ALTER",
        }
    }

    const fn from_keyword(keyword: Keyword) -> Option<Self> {
        Some(match keyword {
            Keyword::Select => Self::Select,
            Keyword::Insert => Self::Insert,
            Keyword::Update => Self::Update,
            Keyword::Delete => Self::Delete,
            Keyword::Create => Self::Create,
            Keyword::Drop => Self::Drop,
            Keyword::Alter => Self::Alter,
            _ => return None,
        })
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified statement with the clauses of its main query.
///
/// SELECT statements are fully decomposed. UPDATE and DELETE expose their
/// WHERE predicate; the other clause fields of non-SELECT kinds are left
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    /// Statement kind.
    pub kind: StatementKind,
    /// Normalized statement text.
    pub sql: String,
    /// Projected items.
    pub select: Vec<SelectItem>,
    /// FROM tables (empty without FROM).
    pub from: Vec<TableRef>,
    /// WHERE predicate.
    #[serde(rename = "where")]
    pub where_clause: Option<Predicate>,
    /// JOIN clauses.
    pub joins: Vec<JoinClause>,
    /// GROUP BY / HAVING.
    pub group_by: Option<GroupBySpec>,
    /// Subqueries and tables used.
    pub subqueries: SubqueryExtraction,
}

impl Query {
    /// Classifies and decomposes a single statement.
    ///
    /// # Errors
    ///
    /// - `EmptyStatement` for empty input.
    /// - `MultipleStatements` if more than one statement is present.
    /// - `UnsupportedStatement` for an unknown leading keyword.
    /// - Any clause error for a clause that is present but malformed.
    ///
    /// ```
    /// use oxide_clause::{Query, StatementKind};
    ///
    /// let query = Query::parse("select id from users where id = @id").unwrap();
    /// assert_eq!(query.kind, StatementKind::Select);
    /// assert_eq!(query.from[0].name, "users");
    /// assert_eq!(query.conditions().len(), 1);
    /// ```
    pub fn parse(sql: &str) -> Result<Self> {
        let statement = Statement::new(sql)?;
        match statement.statement_count() {
            0 => return Err(ParseError::EmptyStatement),
            1 => {}
            count => return Err(ParseError::MultipleStatements { count }),
        }
        if statement.is_empty() {
            return Err(ParseError::EmptyStatement);
        }

        let kind = statement
            .leading_keyword()
            .and_then(StatementKind::from_keyword)
            .ok_or_else(|| ParseError::UnsupportedStatement {
                keyword: String::from(statement.slice(0..1)),
            })?;

        let mut query = Self {
            kind,
            sql: String::from(statement.text()),
            select: Vec::new(),
            from: Vec::new(),
            where_clause: None,
            joins: Vec::new(),
            group_by: None,
            subqueries: SubqueryExtraction::default(),
        };
        match kind {
            StatementKind::Select => {
                query.select = Projection::extract(&statement)?;
                query.from = optional(FromList::extract(&statement))?.unwrap_or_default();
                query.where_clause = optional(WhereFilter::extract(&statement))?;
                query.joins = JoinList::extract(&statement)?;
                query.group_by = Grouping::extract(&statement)?;
                query.subqueries = Subqueries::extract(&statement)?;
            }
            StatementKind::Update | StatementKind::Delete => {
                query.where_clause = optional(WhereFilter::extract(&statement))?;
            }
            _ => {}
        }

        debug!(
            kind = %query.kind,
            tables = query.from.len(),
            joins = query.joins.len(),
            subqueries = query.subqueries.subqueries.len(),
            "parsed query"
        );
        Ok(query)
    }

    /// Returns the WHERE leaf conditions in source order.
    #[must_use]
    pub fn conditions(&self) -> Vec<&Condition> {
        self.where_clause
            .as_ref()
            .map_or_else(Vec::new, Predicate::conditions)
    }
}

/// Turns an absent clause into `None`.
fn optional<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ParseError::MissingClause { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}
