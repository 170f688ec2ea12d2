//! Parser error types.

use thiserror::Error;

/// Errors raised while decomposing a statement into clauses.
///
/// Every variant names the clause and/or carries the offending fragment
/// verbatim, so hand-written SQL can be debugged from the message alone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input was empty or only whitespace/comments.
    #[error("empty statement")]
    EmptyStatement,

    /// The input holds more than one non-empty `;`-separated statement.
    #[error("expected a single statement, found {count}")]
    MultipleStatements {
        /// Number of non-empty statements found.
        count: usize,
    },

    /// The statement does not start with a recognized keyword.
    #[error("unsupported statement starting with '{keyword}'")]
    UnsupportedStatement {
        /// The leading word of the statement.
        keyword: String,
    },

    /// A clause the parser requires is absent.
    #[error("missing {clause} clause")]
    MissingClause {
        /// Clause keyword, e.g. `FROM`.
        clause: &'static str,
    },

    /// A clause is present but its body cannot be decomposed.
    #[error("malformed {clause} clause: '{fragment}'")]
    MalformedClause {
        /// Clause keyword.
        clause: &'static str,
        /// The offending text.
        fragment: String,
    },

    /// A WHERE/HAVING/ON fragment matches no comparison grammar.
    #[error("malformed condition: '{fragment}'")]
    MalformedCondition {
        /// The offending fragment (empty for an empty clause body).
        fragment: String,
    },

    /// A value that must be a bind placeholder is something else.
    #[error("expected a placeholder (?, ?N, $N, @name, :name), found '{token}'")]
    MalformedParameter {
        /// The offending value.
        token: String,
    },

    /// A function call has the wrong number of arguments.
    #[error("{function} expects {min}..={max} arguments, found {actual}")]
    Arity {
        /// Function name as written.
        function: String,
        /// Minimum argument count.
        min: usize,
        /// Maximum argument count.
        max: usize,
        /// Argument count found.
        actual: usize,
    },

    /// An ON predicate compares columns of which none belongs to the joined
    /// table.
    #[error("join on '{table}' has a predicate that does not reference it: '{predicate}'")]
    UnknownColumnReference {
        /// The joined table (alias if given).
        table: String,
        /// The offending comparison.
        predicate: String,
    },

    /// A column does not exist in the table schema.
    #[error("unknown column '{column}' in table '{table}'")]
    UnknownColumn {
        /// Table name.
        table: String,
        /// Column name as referenced.
        column: String,
    },

    /// The lexer rejected the input.
    #[error("{message} at position {position}")]
    Lex {
        /// Lexer message.
        message: String,
        /// Byte offset in the normalized text.
        position: usize,
    },

    /// A parenthesis has no partner.
    #[error("unbalanced parenthesis at position {position}")]
    UnbalancedParentheses {
        /// Byte offset in the normalized text.
        position: usize,
    },

    /// Parentheses nest deeper than the parser accepts.
    #[error("parentheses nested deeper than {max} levels")]
    NestingTooDeep {
        /// The nesting limit.
        max: usize,
    },
}

/// Result type for clause parsing.
pub type Result<T> = std::result::Result<T, ParseError>;

impl ParseError {
    pub(crate) fn malformed_condition(fragment: impl Into<String>) -> Self {
        Self::MalformedCondition {
            fragment: fragment.into(),
        }
    }

    pub(crate) fn malformed_clause(clause: &'static str, fragment: impl Into<String>) -> Self {
        Self::MalformedClause {
            clause,
            fragment: fragment.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_fragment() {
        let err = ParseError::malformed_condition("a ~ 1");
        assert_eq!(err.to_string(), "malformed condition: 'a ~ 1'");

        let err = ParseError::MissingClause { clause: "FROM" };
        assert_eq!(err.to_string(), "missing FROM clause");

        let err = ParseError::Arity {
            function: String::from("SUBSTR"),
            min: 2,
            max: 3,
            actual: 1,
        };
        assert_eq!(err.to_string(), "SUBSTR expects 2..=3 arguments, found 1");
    }
}
