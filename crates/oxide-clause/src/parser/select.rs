//! SELECT list extraction.
//!
//! Each projected item is classified, in order, as a wildcard, a CASE
//! expression, a function call or arithmetic expression, or a bare column.
//! Function calls with a known name have their argument count checked.

use core::ops::Range;

use super::base::{Clause, ClauseParser};
use super::error::{ParseError, Result};
use super::statement::Statement;
use super::tables::{COMPARISON_OPERATORS, SELECT_TERMINATORS, function_arity, match_table};
use crate::ast::SelectItem;
use crate::lexer::{Keyword, TokenKind};

/// The projection of the main SELECT.
#[derive(Debug, Clone, Copy)]
pub struct Projection;

/// Parses the SELECT list of a statement.
///
/// The main SELECT is the first one at the top level: CTE bodies are
/// parenthesized and skipped, and only the first branch of a set operation
/// is read.
///
/// ```
/// use oxide_clause::SelectParser;
///
/// let parser = SelectParser::new("SELECT id, UPPER(name) AS n FROM users").unwrap();
/// assert_eq!(parser.items()[1].columns, ["name"]);
/// assert_eq!(parser.items()[1].alias.as_deref(), Some("n"));
/// ```
pub type SelectParser = ClauseParser<Projection>;

impl Clause for Projection {
    const NAME: &'static str = "SELECT";
    type Output = Vec<SelectItem>;

    fn extract(statement: &Statement) -> Result<Self::Output> {
        let select = statement
            .find_phrase(0, &["SELECT"])
            .ok_or(ParseError::MissingClause { clause: Self::NAME })?;

        let mut start = select + 1;
        if statement.is_keyword(start, Keyword::Distinct) || statement.is_keyword(start, Keyword::All) {
            start += 1;
        }
        let body = start..statement.clause_end(start, SELECT_TERMINATORS, false);
        if body.is_empty() {
            return Err(ParseError::malformed_clause(Self::NAME, ""));
        }

        statement
            .split_commas(body.clone())
            .into_iter()
            .map(|item| {
                if item.is_empty() {
                    return Err(ParseError::malformed_clause(
                        Self::NAME,
                        statement.slice(body.clone()),
                    ));
                }
                select_item(statement, item)
            })
            .collect()
    }
}

impl SelectParser {
    /// Returns the projected items in source order.
    #[must_use]
    pub fn items(&self) -> &[SelectItem] {
        self.output()
    }
}

fn select_item(statement: &Statement, item: Range<usize>) -> Result<SelectItem> {
    let (expr, alias) = split_alias(statement, item);
    let text = String::from(statement.slice(expr.clone()));

    if is_wildcard(statement, expr.clone()) || statement.is_column_like(expr.clone()) {
        return Ok(SelectItem {
            columns: vec![text],
            expression: None,
            alias,
        });
    }

    let mut columns = Vec::new();
    if (expr.start..expr.end).any(|i| statement.is_keyword(i, Keyword::Case)) {
        // Calls inside a CASE are still checked.
        collect_columns(statement, expr.clone(), &mut Vec::new())?;
        case_columns(statement, expr, &mut columns);
    } else {
        collect_columns(statement, expr, &mut columns)?;
    }

    Ok(SelectItem {
        columns,
        expression: Some(text),
        alias,
    })
}

/// Strips `AS alias` or a bare trailing alias.
fn split_alias(statement: &Statement, item: Range<usize>) -> (Range<usize>, Option<String>) {
    let last = item.end - 1;
    let Some(alias) = statement.token(last).identifier() else {
        return (item, None);
    };

    if item.len() >= 3 && statement.is_keyword(last - 1, Keyword::As) {
        return (item.start..last - 1, Some(String::from(alias)));
    }
    let bare = item.len() >= 2
        && matches!(
            statement.token(last - 1).kind,
            TokenKind::Identifier(_)
                | TokenKind::QuotedIdentifier(_)
                | TokenKind::RightParen
                | TokenKind::Integer(_)
                | TokenKind::Float(_)
                | TokenKind::String(_)
                | TokenKind::Placeholder(_)
                | TokenKind::Keyword(Keyword::End)
        );
    if bare {
        (item.start..last, Some(String::from(alias)))
    } else {
        (item, None)
    }
}

/// `*` or `name.*`.
fn is_wildcard(statement: &Statement, expr: Range<usize>) -> bool {
    let last = expr.end - 1;
    statement.is(last, &TokenKind::Star)
        && (expr.len() == 1
            || (expr.len() >= 3
                && statement.is(last - 1, &TokenKind::Dot)
                && statement.is_column_like(expr.start..last - 1)))
}

/// Collects the column references of an expression, checking the argument
/// count of every known function call on the way.
fn collect_columns(statement: &Statement, expr: Range<usize>, columns: &mut Vec<String>) -> Result<()> {
    let mut i = expr.start;
    while i < expr.end {
        let token = statement.token(i);
        // `CAST(x AS INTEGER)`: the type name is not a column.
        if token.identifier().is_none() || (i > expr.start && statement.is_keyword(i - 1, Keyword::As)) {
            i += 1;
            continue;
        }

        if matches!(token.kind, TokenKind::Identifier(_))
            && i + 1 < expr.end
            && statement.is(i + 1, &TokenKind::LeftParen)
        {
            check_arity(statement, i)?;
            i += 2;
            continue;
        }

        let next = statement.dotted_name(i, expr.end).map_or(i + 1, |(_, next)| next);
        push_unique(columns, statement.slice(i..next));
        i = next;
    }
    Ok(())
}

fn check_arity(statement: &Statement, name_at: usize) -> Result<()> {
    let open = name_at + 1;
    let (Some(name), Some(close)) = (statement.token(name_at).identifier(), statement.partner(open)) else {
        return Ok(());
    };
    let Some((min, max)) = function_arity(name) else {
        return Ok(());
    };

    let actual = statement.split_commas(open + 1..close).len();
    if (min..=max).contains(&actual) {
        Ok(())
    } else {
        Err(ParseError::Arity {
            function: String::from(name),
            min,
            max,
            actual,
        })
    }
}

/// Column-like operands of `WHEN <operand> <comparator>` fragments and of a
/// simple CASE.
fn case_columns(statement: &Statement, expr: Range<usize>, columns: &mut Vec<String>) {
    let tokens = statement.tokens();
    let find = |from: usize, keyword: Keyword| {
        (from..expr.end)
            .find(|&j| statement.is_keyword(j, keyword))
            .unwrap_or(expr.end)
    };

    for i in expr.clone() {
        if statement.is_keyword(i, Keyword::Case) && !statement.is_keyword(i + 1, Keyword::When) {
            let operand = i + 1..find(i + 1, Keyword::When);
            if statement.is_column_like(operand.clone()) {
                push_unique(columns, statement.slice(operand));
            }
        }
        if statement.is_keyword(i, Keyword::When) {
            let then = find(i + 1, Keyword::Then);
            let operator = (i + 1..then).find(|&j| match_table(&tokens[..then], j, COMPARISON_OPERATORS).is_some());
            if let Some(operator) = operator.filter(|&op| statement.is_column_like(i + 1..op)) {
                push_unique(columns, statement.slice(i + 1..operator));
            }
        }
    }
}

fn push_unique(columns: &mut Vec<String>, column: &str) {
    if !columns.iter().any(|c| c == column) {
        columns.push(String::from(column));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(sql: &str) -> Vec<SelectItem> {
        SelectParser::new(sql).unwrap().into_output()
    }

    fn column(name: &str) -> SelectItem {
        SelectItem {
            columns: vec![String::from(name)],
            expression: None,
            alias: None,
        }
    }

    #[test]
    fn test_columns_and_wildcards() {
        let items = items("SELECT DISTINCT u.*, name, t.email FROM users u");
        assert_eq!(items, [column("u.*"), column("name"), column("t.email")]);
        assert!(items[0].is_wildcard());
        assert_eq!(self::items("SELECT * FROM t"), [column("*")]);
    }

    #[test]
    fn test_aliases() {
        let items = items("SELECT name AS n, email e, COUNT(*) total FROM users");
        assert_eq!(items[0].alias.as_deref(), Some("n"));
        assert_eq!(items[0].columns, ["name"]);
        assert_eq!(items[1].alias.as_deref(), Some("e"));
        assert_eq!(items[1].columns, ["email"]);
        assert_eq!(items[2].alias.as_deref(), Some("total"));
        assert_eq!(items[2].expression.as_deref(), Some("COUNT(*)"));
        assert!(items[2].columns.is_empty());
    }

    #[test]
    fn test_functions() {
        let items = items("SELECT UPPER(TRIM(name)), COALESCE(nick, u.name, 'x'), my_udf(a, b, c) FROM users u");
        assert_eq!(items[0].columns, ["name"]);
        assert_eq!(items[0].expression.as_deref(), Some("UPPER(TRIM(name))"));
        assert_eq!(items[1].columns, ["nick", "u.name"]);
        assert_eq!(items[2].columns, ["a", "b", "c"]);
    }

    #[test]
    fn test_arithmetic() {
        let items = items("SELECT price * qty AS cost, first || ' ' || last FROM t");
        assert_eq!(items[0].columns, ["price", "qty"]);
        assert_eq!(items[0].expression.as_deref(), Some("price * qty"));
        assert_eq!(items[0].alias.as_deref(), Some("cost"));
        assert_eq!(items[1].columns, ["first", "last"]);
    }

    #[test]
    fn test_case() {
        let items = items(
            "SELECT CASE WHEN status = 'a' THEN 1 WHEN t.kind <> 2 THEN label ELSE 0 END AS flag FROM t",
        );
        assert_eq!(items[0].columns, ["status", "t.kind"]);
        assert_eq!(items[0].alias.as_deref(), Some("flag"));

        let items = self::items("SELECT CASE grade WHEN 1 THEN 'x' END FROM t");
        assert_eq!(items[0].columns, ["grade"]);
    }

    #[test]
    fn test_literals() {
        let items = items("SELECT 1 + 2, 'x', CAST(a AS INTEGER)");
        assert!(items[0].columns.is_empty());
        assert_eq!(items[1].expression.as_deref(), Some("'x'"));
        assert_eq!(items[2].columns, ["a"]);
    }

    #[test]
    fn test_main_select() {
        assert_eq!(
            items("WITH x AS (SELECT a FROM t) SELECT b FROM x"),
            [column("b")]
        );
        assert_eq!(
            items("SELECT a FROM t UNION SELECT b FROM u"),
            [column("a")]
        );
    }

    #[test]
    fn test_arity() {
        assert_eq!(
            SelectParser::new("SELECT SUBSTR(name) FROM t").unwrap_err(),
            ParseError::Arity {
                function: String::from("SUBSTR"),
                min: 2,
                max: 3,
                actual: 1,
            }
        );
        assert_eq!(
            SelectParser::new("SELECT UPPER(LOWER(a, b)) FROM t").unwrap_err(),
            ParseError::Arity {
                function: String::from("LOWER"),
                min: 1,
                max: 1,
                actual: 2,
            }
        );
        assert!(matches!(
            SelectParser::new("SELECT count() FROM t").unwrap_err(),
            ParseError::Arity { actual: 0, .. }
        ));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            SelectParser::new("UPDATE t SET a = 1").unwrap_err(),
            ParseError::MissingClause { clause: "SELECT" }
        );
        assert_eq!(
            SelectParser::new("SELECT FROM t").unwrap_err(),
            ParseError::malformed_clause("SELECT", "")
        );
        assert_eq!(
            SelectParser::new("SELECT a,, b FROM t").unwrap_err(),
            ParseError::malformed_clause("SELECT", "a,, b")
        );
    }
}
