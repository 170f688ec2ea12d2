//! Recursive descent parser for WHERE, HAVING and ON predicates.
//!
//! ```text
//! predicate  := and_chain ( OR and_chain )*
//! and_chain  := unit ( AND unit )*
//! unit       := '(' predicate ')' | comparison
//! comparison := [NOT] EXISTS '(' ... ')'
//!             | operand op value
//! ```
//!
//! Operands and values are kept as verbatim text; only the operator is
//! interpreted.

use core::ops::Range;

use super::error::{ParseError, Result};
use super::statement::Statement;
use super::tables::{COMPARISON_OPERATORS, EXISTENTIAL_OPERATORS, match_table};
use crate::ast::{ComparisonOp, Condition, Predicate};
use crate::lexer::{Keyword, Token, TokenKind};

/// Parses the tokens in `range` as a predicate.
///
/// # Errors
///
/// Returns `MalformedCondition` for an empty range or any fragment that does
/// not match the comparison grammar.
pub fn parse_predicate(statement: &Statement, range: Range<usize>) -> Result<Predicate> {
    let mut parser = PredicateParser {
        statement,
        tokens: &statement.tokens()[..range.end],
        pos: range.start,
        range,
    };
    if parser.range.is_empty() {
        return Err(ParseError::malformed_condition(""));
    }
    let predicate = parser.parse_or()?;
    if parser.pos < parser.range.end {
        return Err(ParseError::malformed_condition(
            statement.slice(parser.pos..parser.range.end),
        ));
    }
    Ok(predicate)
}

struct PredicateParser<'a> {
    statement: &'a Statement,
    /// Statement tokens cut at the end of the range.
    tokens: &'a [Token],
    pos: usize,
    range: Range<usize>,
}

impl PredicateParser<'_> {
    fn parse_or(&mut self) -> Result<Predicate> {
        let mut terms = vec![self.parse_and()?];
        while self.check_keyword(Keyword::Or) {
            self.pos += 1;
            terms.push(self.parse_and()?);
        }
        Ok(collapse(terms, Predicate::Or))
    }

    fn parse_and(&mut self) -> Result<Predicate> {
        let mut terms = vec![self.parse_unit()?];
        while self.check_keyword(Keyword::And) {
            self.pos += 1;
            terms.push(self.parse_unit()?);
        }
        Ok(collapse(terms, Predicate::And))
    }

    fn parse_unit(&mut self) -> Result<Predicate> {
        if self.pos >= self.range.end {
            // Dangling AND/OR.
            return Err(ParseError::malformed_condition(
                self.statement.slice(self.range.clone()),
            ));
        }

        if let Some(close) = self.group_close(self.pos) {
            let inner = parse_predicate(self.statement, self.pos + 1..close)?;
            self.pos = close + 1;
            return Ok(Predicate::Group(Box::new(inner)));
        }

        self.parse_comparison().map(Predicate::Leaf)
    }

    /// Returns the closing parenthesis if the token at `at` opens a
    /// parenthesized predicate rather than a parenthesized operand.
    fn group_close(&self, at: usize) -> Option<usize> {
        if !matches!(self.tokens[at].kind, TokenKind::LeftParen) {
            return None;
        }
        let close = self.statement.partner(at).filter(|&c| c < self.range.end)?;
        let subquery = self.statement.is_keyword(at + 1, Keyword::Select);
        let followed_by_stop = close + 1 == self.range.end || self.is_logical(close + 1);
        (!subquery && followed_by_stop).then_some(close)
    }

    fn parse_comparison(&mut self) -> Result<Condition> {
        let start = self.pos;

        if let Some((operator, len)) = match_table(self.tokens, start, EXISTENTIAL_OPERATORS) {
            let open = start + len;
            let close = self.paren_close(open).ok_or_else(|| self.malformed_from(start))?;
            self.pos = self.expect_stop(start, close + 1)?;
            return Ok(Condition::new(
                "",
                operator,
                self.statement.slice(open..close + 1),
            ));
        }

        let (op_at, operator, len) = self.find_operator(start)?;
        let value_start = op_at + len;
        let value_end = match operator {
            ComparisonOp::IsNull | ComparisonOp::IsNotNull => value_start,
            ComparisonOp::In | ComparisonOp::NotIn => {
                self.paren_close(value_start)
                    .ok_or_else(|| self.malformed_from(start))?
                    + 1
            }
            ComparisonOp::Between | ComparisonOp::NotBetween => {
                let and_at = self.skip_operand(value_start);
                if and_at == value_start || !self.check_keyword_at(and_at, Keyword::And) {
                    return Err(self.malformed_from(start));
                }
                self.skip_operand(and_at + 1)
            }
            _ => self.skip_operand(value_start),
        };

        if !operator.is_unary() && value_end == value_start {
            return Err(self.malformed_from(start));
        }
        self.pos = self.expect_stop(start, value_end)?;

        Ok(Condition::new(
            self.statement.slice(start..op_at),
            operator,
            self.statement.slice(value_start..value_end),
        ))
    }

    /// Finds the first comparison operator of the fragment starting at
    /// `start`, skipping parenthesized spans.
    fn find_operator(&self, start: usize) -> Result<(usize, ComparisonOp, usize)> {
        let mut i = start;
        while i < self.range.end && !self.is_logical(i) {
            if let Some((operator, len)) = match_table(self.tokens, i, COMPARISON_OPERATORS) {
                if i == start {
                    break;
                }
                return Ok((i, operator, len));
            }
            i = self.next(i);
        }
        Err(self.malformed_from(start))
    }

    /// Returns the index of the next AND/OR (or the range end) from `from`.
    fn skip_operand(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.range.end && !self.is_logical(i) {
            i = self.next(i);
        }
        i
    }

    /// Checks that a comparison ends at `at`.
    fn expect_stop(&self, start: usize, at: usize) -> Result<usize> {
        if at == self.range.end || self.is_logical(at) {
            Ok(at)
        } else {
            Err(self.malformed_from(start))
        }
    }

    /// Returns the closing partner of a `(` at `at` inside the range.
    fn paren_close(&self, at: usize) -> Option<usize> {
        if at >= self.range.end || !matches!(self.tokens[at].kind, TokenKind::LeftParen) {
            return None;
        }
        self.statement.partner(at).filter(|&c| c < self.range.end)
    }

    /// Steps over one token, or over a whole parenthesized span.
    fn next(&self, i: usize) -> usize {
        self.paren_close(i).map_or(i + 1, |close| close + 1)
    }

    fn is_logical(&self, i: usize) -> bool {
        self.check_keyword_at(i, Keyword::And) || self.check_keyword_at(i, Keyword::Or)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.check_keyword_at(self.pos, keyword)
    }

    fn check_keyword_at(&self, i: usize, keyword: Keyword) -> bool {
        i < self.range.end && self.tokens[i].is_keyword(keyword)
    }

    fn malformed_from(&self, start: usize) -> ParseError {
        ParseError::malformed_condition(self.statement.slice(start..self.skip_operand(start)))
    }
}

fn collapse(mut terms: Vec<Predicate>, wrap: fn(Vec<Predicate>) -> Predicate) -> Predicate {
    if terms.len() == 1 {
        terms.remove(0)
    } else {
        wrap(terms)
    }
}
