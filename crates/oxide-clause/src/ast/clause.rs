//! Structured clause values.

use core::fmt;

use serde::Serialize;

use super::Predicate;

/// A table reference in a FROM list or JOIN.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TableRef {
    /// Dotted table name without quotes (`users`, `main.users`,
    /// `db.schema.users`), or the verbatim parenthesized text of a derived
    /// table.
    pub name: String,
    /// Alias, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl TableRef {
    /// Creates a table reference without alias.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    /// Adds an alias to this table reference.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Returns true if this reference is a parenthesized subquery.
    #[must_use]
    pub fn is_subquery(&self) -> bool {
        self.name.starts_with('(')
    }

    /// Returns the last segment of the dotted name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        if self.is_subquery() {
            return &self.name;
        }
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Returns the name other clauses use to qualify this table's columns:
    /// the alias if present, otherwise the table name.
    #[must_use]
    pub fn qualifier(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.table_name())
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} AS {alias}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Join type, one per recognized join phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum JoinType {
    /// `JOIN`.
    #[serde(rename = "JOIN")]
    Join,
    /// `INNER JOIN`.
    #[serde(rename = "INNER JOIN")]
    Inner,
    /// `LEFT JOIN`.
    #[serde(rename = "LEFT JOIN")]
    Left,
    /// `LEFT OUTER JOIN`.
    #[serde(rename = "LEFT OUTER JOIN")]
    LeftOuter,
    /// `RIGHT JOIN`.
    #[serde(rename = "RIGHT JOIN")]
    Right,
    /// `RIGHT OUTER JOIN`.
    #[serde(rename = "RIGHT OUTER JOIN")]
    RightOuter,
    /// `FULL JOIN`.
    #[serde(rename = "FULL JOIN")]
    Full,
    /// `FULL OUTER JOIN`.
    #[serde(rename = "FULL OUTER JOIN")]
    FullOuter,
    /// `CROSS JOIN`.
    #[serde(rename = "CROSS JOIN")]
    Cross,
    /// `NATURAL JOIN`.
    #[serde(rename = "NATURAL JOIN")]
    Natural,
    /// `SELF JOIN`.
    #[serde(rename = "SELF JOIN")]
    SelfJoin,
}

impl JoinType {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "JOIN",
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
            Self::Right => "RIGHT JOIN",
            Self::RightOuter => "RIGHT OUTER JOIN",
            Self::Full => "FULL JOIN",
            Self::FullOuter => "FULL OUTER JOIN",
            Self::Cross => "CROSS JOIN",
            Self::Natural => "NATURAL JOIN",
            Self::SelfJoin => "SELF JOIN",
        }
    }

    /// Returns true if the join may omit its ON predicate.
    #[must_use]
    pub const fn allows_missing_on(&self) -> bool {
        matches!(self, Self::Cross | Self::Natural)
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinClause {
    /// The type of join.
    pub join_type: JoinType,
    /// The joined table.
    pub table: TableRef,
    /// The ON predicate, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<String>,
    /// USING columns (alternative to ON).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub using: Vec<String>,
}

/// GROUP BY columns and the optional HAVING predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupBySpec {
    /// Grouping expressions, verbatim, in source order. Empty only when
    /// HAVING appears without GROUP BY.
    pub columns: Vec<String>,
    /// The HAVING predicate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub having: Option<Predicate>,
}

/// One projected item of a SELECT list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectItem {
    /// Column-like tokens the item references (`*` and `t.*` for wildcards).
    pub columns: Vec<String>,
    /// The item text when it is not a bare column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Alias, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl SelectItem {
    /// Returns true if the item is `*` or `table.*`.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.expression.is_none() && self.columns.len() == 1 && self.columns[0].ends_with('*')
    }
}

/// Subqueries found in a statement and the tables its main query reads.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SubqueryExtraction {
    /// Verbatim subquery texts including parentheses, outer before inner,
    /// without duplicates.
    pub subqueries: Vec<String>,
    /// FROM/JOIN tables of the main query, without duplicates.
    pub tables_used: Vec<TableRef>,
}
