//! The tokenized statement shared by every clause parser.

use core::ops::Range;

use tracing::trace;

use super::error::{ParseError, Result};
use super::tables::{JOIN_PHRASES, Phrase, SET_OPERATORS, match_any, match_table, matches_phrase};
use crate::lexer::{Keyword, Lexer, Token, TokenKind, normalize};

/// Deepest parenthesis nesting accepted. Recursive parts of the parsers
/// (predicate groups, nested function calls) are bounded by it.
pub const MAX_NESTING_DEPTH: usize = 256;

/// A normalized SQL statement with its token stream and precomputed
/// parenthesis structure.
///
/// Token ranges handed around by the clause parsers index into
/// [`Statement::tokens`]. Depth 0 is the top level of the main query:
/// anything inside parentheses (subqueries, argument lists, CTE bodies) has a
/// greater depth, so clause scanning never sees it.
#[derive(Debug, Clone)]
pub struct Statement {
    text: String,
    tokens: Vec<Token>,
    /// Nesting depth outside each token; a parenthesis has the depth of the
    /// text around it.
    depth: Vec<usize>,
    /// Index of the partner of every parenthesis token.
    partner: Vec<Option<usize>>,
    /// End of the first branch of the first statement: the first top-level
    /// `;` or set operator, or `Eof`.
    end: usize,
}

impl Statement {
    /// Normalizes and tokenizes `sql`.
    ///
    /// # Errors
    ///
    /// Returns `Lex` for unterminated literals or stray characters,
    /// `UnbalancedParentheses` for unpaired parentheses and `NestingTooDeep`
    /// past [`MAX_NESTING_DEPTH`].
    pub fn new(sql: &str) -> Result<Self> {
        let text = normalize(sql);
        let mut tokens = Lexer::new(&text).tokenize();
        // Empty segments before the first statement.
        let leading = tokens
            .iter()
            .take_while(|t| matches!(t.kind, TokenKind::Semicolon))
            .count();
        tokens.drain(..leading);

        if let Some(err) = tokens.iter().find_map(|t| match &t.kind {
            TokenKind::Error(message) => Some(ParseError::Lex {
                message: message.clone(),
                position: t.span.start,
            }),
            _ => None,
        }) {
            return Err(err);
        }

        let mut depth = Vec::with_capacity(tokens.len());
        let mut partner = vec![None; tokens.len()];
        let mut open: Vec<usize> = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::LeftParen => {
                    depth.push(open.len());
                    open.push(i);
                    if open.len() > MAX_NESTING_DEPTH {
                        return Err(ParseError::NestingTooDeep {
                            max: MAX_NESTING_DEPTH,
                        });
                    }
                }
                TokenKind::RightParen => {
                    let Some(start) = open.pop() else {
                        return Err(ParseError::UnbalancedParentheses {
                            position: token.span.start,
                        });
                    };
                    partner[start] = Some(i);
                    partner[i] = Some(start);
                    depth.push(open.len());
                }
                _ => depth.push(open.len()),
            }
        }
        if let Some(&start) = open.first() {
            return Err(ParseError::UnbalancedParentheses {
                position: tokens[start].span.start,
            });
        }

        let end = (0..tokens.len())
            .find(|&i| {
                depth[i] == 0
                    && (matches!(tokens[i].kind, TokenKind::Semicolon | TokenKind::Eof)
                        || match_any(&tokens, i, SET_OPERATORS).is_some())
            })
            .unwrap_or(tokens.len());

        trace!(tokens = tokens.len(), end, "tokenized statement");
        Ok(Self {
            text,
            tokens,
            depth,
            partner,
            end,
        })
    }

    /// Returns the normalized text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the tokens of the first branch of the first statement (no
    /// `;`, no `UNION`/`INTERSECT`/`EXCEPT` tail, no `Eof`).
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens[..self.end]
    }

    /// Returns the number of tokens in the first branch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end
    }

    /// Returns true if the first branch has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end == 0
    }

    /// Returns the token at `i`.
    #[must_use]
    pub fn token(&self, i: usize) -> &Token {
        &self.tokens[i]
    }

    /// Returns the nesting depth of the token at `i`.
    #[must_use]
    pub fn depth(&self, i: usize) -> usize {
        self.depth[i]
    }

    /// Returns the partner of the parenthesis at `i`.
    #[must_use]
    pub fn partner(&self, i: usize) -> Option<usize> {
        self.partner[i]
    }

    /// Returns true if the token at `i` is the given keyword.
    #[must_use]
    pub fn is_keyword(&self, i: usize, keyword: Keyword) -> bool {
        i < self.end && self.tokens[i].is_keyword(keyword)
    }

    /// Returns true if the token at `i` is of the given kind (ignoring
    /// payloads).
    #[must_use]
    pub fn is(&self, i: usize, kind: &TokenKind) -> bool {
        i < self.end
            && core::mem::discriminant(&self.tokens[i].kind) == core::mem::discriminant(kind)
    }

    /// Returns the verbatim text covered by a token range.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> &str {
        if range.start >= range.end {
            return "";
        }
        self.tokens[range.start]
            .span
            .to(self.tokens[range.end - 1].span)
            .slice(&self.text)
    }

    /// Returns the number of non-empty `;`-separated statements.
    #[must_use]
    pub fn statement_count(&self) -> usize {
        let mut count = 0;
        let mut in_statement = false;
        for (token, &depth) in self.tokens.iter().zip(&self.depth) {
            match token.kind {
                TokenKind::Semicolon if depth == 0 => in_statement = false,
                TokenKind::Eof => {}
                _ if !in_statement => {
                    in_statement = true;
                    count += 1;
                }
                _ => {}
            }
        }
        count
    }

    /// Finds the first top-level occurrence of `phrase` at or after `from`.
    #[must_use]
    pub fn find_phrase(&self, from: usize, phrase: Phrase) -> Option<usize> {
        let tokens = self.tokens();
        (from..self.end).find(|&i| self.depth[i] == 0 && matches_phrase(tokens, i, phrase))
    }

    /// Returns the first top-level index at or after `from` that ends a
    /// clause: one of `terminators`, a join phrase if `stop_at_joins`, or the
    /// end of the statement.
    #[must_use]
    pub fn clause_end(&self, from: usize, terminators: &[Phrase], stop_at_joins: bool) -> usize {
        let tokens = self.tokens();
        (from..self.end)
            .find(|&i| {
                self.depth[i] == 0
                    && (match_any(tokens, i, terminators).is_some()
                        || (stop_at_joins && match_table(tokens, i, JOIN_PHRASES).is_some()))
            })
            .unwrap_or(self.end)
    }

    /// Splits `range` on commas at the depth of its first token.
    #[must_use]
    pub fn split_commas(&self, range: Range<usize>) -> Vec<Range<usize>> {
        if range.is_empty() {
            return Vec::new();
        }
        let base = self.depth[range.start];
        let mut parts = Vec::new();
        let mut start = range.start;
        for i in range.clone() {
            if self.depth[i] == base && matches!(self.tokens[i].kind, TokenKind::Comma) {
                parts.push(start..i);
                start = i + 1;
            }
        }
        parts.push(start..range.end);
        parts
    }

    /// Returns true if the range is a dotted identifier (`a`, `t.a`,
    /// `s.t.a`).
    #[must_use]
    pub fn is_column_like(&self, range: Range<usize>) -> bool {
        !range.is_empty()
            && range.len() % 2 == 1
            && range.clone().enumerate().all(|(n, i)| {
                if n % 2 == 0 {
                    self.tokens[i].identifier().is_some()
                } else {
                    matches!(self.tokens[i].kind, TokenKind::Dot)
                }
            })
    }

    /// Reads a dotted identifier starting at `at`. Returns the unquoted name
    /// joined by `.` and the index after it.
    #[must_use]
    pub fn dotted_name(&self, at: usize, end: usize) -> Option<(String, usize)> {
        let mut name = String::from(self.tokens.get(at).filter(|_| at < end)?.identifier()?);
        let mut i = at + 1;
        while i + 1 < end
            && matches!(self.tokens[i].kind, TokenKind::Dot)
            && self.tokens[i + 1].identifier().is_some()
        {
            name.push('.');
            name.push_str(self.tokens[i + 1].identifier().unwrap_or_default());
            i += 2;
        }
        Some((name, i))
    }

    /// Returns the first top-level statement keyword, looking past a
    /// leading `WITH` and its CTE list.
    #[must_use]
    pub fn leading_keyword(&self) -> Option<Keyword> {
        let first = self.tokens().first()?.as_keyword()?;
        if first != Keyword::With {
            return Some(first);
        }
        self.tokens()
            .iter()
            .zip(&self.depth)
            .skip(1)
            .filter(|&(_, &d)| d == 0)
            .find_map(|(t, _)| {
                t.as_keyword().filter(|kw| {
                    matches!(
                        kw,
                        Keyword::Select | Keyword::Insert | Keyword::Update | Keyword::Delete
                    )
                })
            })
    }
}
