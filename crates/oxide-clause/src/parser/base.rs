//! Shared behavior of the clause parsers.

use core::fmt;

use tracing::debug;

use super::error::Result;
use super::statement::Statement;

/// One clause extraction over a tokenized statement.
pub trait Clause {
    /// Clause name used in logs and errors.
    const NAME: &'static str;

    /// The structured value extracted.
    type Output: Clone + fmt::Debug;

    /// Extracts the clause from `statement`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` when the clause is mandatory and absent, or
    /// present but malformed.
    fn extract(statement: &Statement) -> Result<Self::Output>;
}

/// A parser for clause `C`: normalizes the input, extracts the clause once at
/// construction and keeps the result.
#[derive(Debug, Clone)]
pub struct ClauseParser<C: Clause> {
    statement: Statement,
    output: C::Output,
}

impl<C: Clause> ClauseParser<C> {
    /// Parses `sql`.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the text cannot be tokenized or the clause
    /// cannot be extracted.
    pub fn new(sql: &str) -> Result<Self> {
        Self::from_statement(Statement::new(sql)?)
    }

    /// Extracts the clause from an already tokenized statement.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the clause cannot be extracted.
    pub fn from_statement(statement: Statement) -> Result<Self> {
        let output = C::extract(&statement)?;
        debug!(clause = C::NAME, sql = statement.text(), "extracted clause");
        Ok(Self { statement, output })
    }

    /// Returns the normalized statement.
    #[must_use]
    pub const fn statement(&self) -> &Statement {
        &self.statement
    }

    /// Returns the extracted clause value.
    #[must_use]
    pub const fn output(&self) -> &C::Output {
        &self.output
    }

    /// Consumes the parser, returning the extracted clause value.
    #[must_use]
    pub fn into_output(self) -> C::Output {
        self.output
    }
}
