//! Table metadata and validation of parsed clauses against it.
//!
//! A [`TableSchema`] lists the columns of one table. [`SchemaValidator`]
//! checks that the columns a query references exist and, optionally, that
//! every compared value is a bind placeholder.
//!
//! ```
//! use oxide_clause::schema::{SchemaValidator, TableSchema, ValidationOptions};
//! use oxide_clause::{ParseError, WhereParser};
//!
//! let schema = TableSchema::from_json(
//!     r#"{"name": "users", "columns": [{"name": "id", "not_null": true}, {"name": "email"}]}"#,
//! )
//! .unwrap();
//! let validator = SchemaValidator::new(&schema).with_options(ValidationOptions {
//!     require_placeholders: true,
//! });
//!
//! let ok = WhereParser::new("SELECT * FROM users WHERE id = @id").unwrap();
//! assert!(validator.validate_conditions(ok.conditions()).is_ok());
//!
//! let literal = WhereParser::new("SELECT * FROM users WHERE id = 5").unwrap();
//! assert_eq!(
//!     validator.validate_conditions(literal.conditions()).unwrap_err(),
//!     ParseError::MalformedParameter { token: String::from("5") },
//! );
//! ```

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::ast::{ComparisonOp, Condition, SelectItem};
use crate::lexer::{Keyword, column_path, is_placeholder};
use crate::parser::{ParseError, Query, Result, Statement};

/// A column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Declared SQL type, as written in the table definition.
    #[serde(default, rename = "type")]
    pub declared_type: String,
    /// Whether the column is declared NOT NULL.
    #[serde(default)]
    pub not_null: bool,
}

impl ColumnInfo {
    /// Creates a nullable column with no declared type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: String::new(),
            not_null: false,
        }
    }

    /// Sets the declared type.
    #[must_use]
    pub fn declared_type(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = declared_type.into();
        self
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }
}

/// The columns of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnInfo>,
}

impl TableSchema {
    /// Creates a table with no columns.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: ColumnInfo) -> Self {
        self.columns.push(column);
        self
    }

    /// Reads a table definition from JSON.
    ///
    /// # Errors
    ///
    /// Returns the deserialization error for malformed input.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Looks up a column by name (case-insensitive).
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// Validation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Require every compared value to be a bind placeholder.
    pub require_placeholders: bool,
}

/// Checks parsed clauses against a [`TableSchema`].
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator<'a> {
    schema: &'a TableSchema,
    options: ValidationOptions,
}

impl<'a> SchemaValidator<'a> {
    /// Creates a validator with default options.
    #[must_use]
    pub fn new(schema: &'a TableSchema) -> Self {
        Self {
            schema,
            options: ValidationOptions::default(),
        }
    }

    /// Replaces the validation options.
    #[must_use]
    pub const fn with_options(mut self, options: ValidationOptions) -> Self {
        self.options = options;
        self
    }

    /// Checks WHERE/HAVING/ON conditions.
    ///
    /// Column-like operands must name a column of the table; qualifiers are
    /// ignored. Operands that are expressions (`COUNT(*)`, `a + 1`) are not
    /// checked.
    ///
    /// # Errors
    ///
    /// Returns `UnknownColumn` for a missing column, and `MalformedParameter`
    /// for a literal value when placeholders are required.
    pub fn validate_conditions<'c>(&self, conditions: impl IntoIterator<Item = &'c Condition>) -> Result<()> {
        for condition in conditions {
            if let Some(column) = self.column(&condition.operand)? {
                if column.not_null && condition.operator == ComparisonOp::IsNull {
                    warn!(
                        table = %self.schema.name,
                        column = %column.name,
                        "IS NULL on a NOT NULL column is never true"
                    );
                }
            }
            if self.options.require_placeholders {
                check_placeholders(condition)?;
            }
            trace!(%condition, "condition validated");
        }
        Ok(())
    }

    /// Checks that every column a projection references exists.
    ///
    /// # Errors
    ///
    /// Returns `UnknownColumn` for a missing column.
    pub fn validate_select(&self, items: &[SelectItem]) -> Result<()> {
        for column in items.iter().flat_map(|item| &item.columns) {
            if !column.ends_with('*') {
                self.column(column)?;
            }
        }
        Ok(())
    }

    /// Checks the projection and WHERE conditions of a parsed query. UPDATE
    /// and DELETE statements are checked through their WHERE predicate.
    ///
    /// # Errors
    ///
    /// See [`Self::validate_select`] and [`Self::validate_conditions`].
    pub fn validate_query(&self, query: &Query) -> Result<()> {
        self.validate_select(&query.select)?;
        self.validate_conditions(query.conditions())
    }

    /// Resolves a column reference. Returns `None` for text that is not a
    /// column reference.
    fn column(&self, reference: &str) -> Result<Option<&'a ColumnInfo>> {
        let Some(name) = column_path(reference).and_then(|mut path| path.pop()) else {
            return Ok(None);
        };
        self.schema
            .find(&name)
            .map(Some)
            .ok_or_else(|| ParseError::UnknownColumn {
                table: self.schema.name.clone(),
                column: String::from(reference),
            })
    }
}

/// Checks that every value of a comparison is a placeholder.
fn check_placeholders(condition: &Condition) -> Result<()> {
    let operator = condition.operator;
    if operator.is_unary() || operator.is_existential() {
        return Ok(());
    }
    let values = match operator {
        ComparisonOp::In | ComparisonOp::NotIn => in_list_values(&condition.value)?,
        ComparisonOp::Between | ComparisonOp::NotBetween => between_values(&condition.value)?,
        _ => vec![condition.value.clone()],
    };

    match values.into_iter().find(|value| !is_placeholder(value)) {
        Some(token) => Err(ParseError::MalformedParameter { token }),
        None => Ok(()),
    }
}

/// Elements of `(a, b, ...)`; none for an IN subquery.
fn in_list_values(value: &str) -> Result<Vec<String>> {
    let statement = Statement::new(value)?;
    if statement.is_keyword(1, Keyword::Select) {
        return Ok(Vec::new());
    }
    let inner = 1..statement.len().saturating_sub(1);
    Ok(statement
        .split_commas(inner)
        .into_iter()
        .map(|element| String::from(statement.slice(element)))
        .collect())
}

/// Bounds of `low AND high`.
fn between_values(value: &str) -> Result<Vec<String>> {
    let statement = Statement::new(value)?;
    let and = (0..statement.len())
        .find(|&i| statement.depth(i) == 0 && statement.is_keyword(i, Keyword::And))
        .unwrap_or(statement.len());
    Ok(vec![
        String::from(statement.slice(0..and)),
        String::from(statement.slice(and + 1..statement.len())),
    ])
}
