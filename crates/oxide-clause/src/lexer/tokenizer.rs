//! SQL tokenizer implementation.

use super::{Keyword, Span, Token, TokenKind};

/// A lexer that tokenizes SQL input.
///
/// Quoted literals and identifiers become single tokens, so everything that
/// scans the token stream (clause boundaries, parenthesis depth) is blind to
/// keywords, commas and parentheses written inside quotes.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advances while `pred` holds.
    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    /// Skips whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.advance_while(char::is_whitespace);

            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                self.advance_while(|c| c != '\n');
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance(); // /
                self.advance(); // *
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    /// Creates a token spanning from the token start to the current position.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    /// Creates an error token.
    fn error(&self, message: impl Into<String>) -> Token {
        self.make_token(TokenKind::Error(message.into()))
    }

    /// Returns the text of the current token so far.
    fn text(&self) -> &'a str {
        &self.input[self.start..self.pos]
    }

    /// Scans an identifier or keyword. The first character is consumed.
    fn scan_identifier(&mut self) -> Token {
        self.advance_while(is_identifier_char);
        let text = self.text();
        match Keyword::from_str(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier(String::from(text))),
        }
    }

    /// Scans quoted content up to `close`, treating a doubled `close` as an
    /// escaped quote. The opening quote is consumed.
    fn scan_quoted(&mut self, close: char) -> Option<String> {
        let mut value = String::new();
        loop {
            match self.advance()? {
                c if c == close => {
                    if self.peek() == Some(close) {
                        self.advance();
                        value.push(close);
                    } else {
                        return Some(value);
                    }
                }
                c => value.push(c),
            }
        }
    }

    /// Scans a string literal. The opening quote is consumed.
    fn scan_string(&mut self) -> Token {
        match self.scan_quoted('\'') {
            Some(value) => self.make_token(TokenKind::String(value)),
            None => self.error("Unterminated string literal"),
        }
    }

    /// Scans a quoted identifier. The opening quote is consumed.
    fn scan_quoted_identifier(&mut self, close: char) -> Token {
        match self.scan_quoted(close) {
            Some(name) => self.make_token(TokenKind::QuotedIdentifier(name)),
            None => self.error("Unterminated quoted identifier"),
        }
    }

    /// Scans a number (integer or float). The first digit is consumed.
    fn scan_number(&mut self) -> Token {
        let mut is_float = false;

        self.advance_while(|c| c.is_ascii_digit());

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }

        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            is_float = true;
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            self.advance_while(|c| c.is_ascii_digit());
        }

        let text = self.text();
        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return self.make_token(TokenKind::Integer(i));
            }
        }
        // Integers too wide for i64 still lex as numbers.
        match text.parse::<f64>() {
            Ok(f) => self.make_token(TokenKind::Float(f)),
            Err(e) => self.error(format!("Invalid number {text}: {e}")),
        }
    }

    /// Scans a placeholder whose sigil is consumed. `named` placeholders
    /// require an identifier after the sigil, numbered ones digits.
    fn scan_placeholder(&mut self, sigil: char) -> Token {
        match sigil {
            '?' => self.advance_while(|c| c.is_ascii_digit()),
            '$' => {
                if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    return self.error("Expected digits after $");
                }
                self.advance_while(|c| c.is_ascii_digit());
            }
            _ => {
                if !self.peek().is_some_and(|c| c.is_alphabetic() || c == '_') {
                    return self.error(format!("Expected parameter name after {sigil}"));
                }
                self.advance_while(is_identifier_char);
            }
        }
        self.make_token(TokenKind::Placeholder(String::from(self.text())))
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '.' => self.make_token(TokenKind::Dot),
            '+' => self.make_token(TokenKind::Plus),
            '-' => self.make_token(TokenKind::Minus),
            '*' => self.make_token(TokenKind::Star),
            '/' => self.make_token(TokenKind::Slash),
            '%' => self.make_token(TokenKind::Percent),
            '~' => self.make_token(TokenKind::BitNot),
            '&' => self.make_token(TokenKind::BitAnd),
            '=' => {
                // `==` is accepted as a synonym, as SQLite does.
                if self.peek() == Some('=') {
                    self.advance();
                }
                self.make_token(TokenKind::Eq)
            }
            '<' => match self.peek() {
                Some('=') => {
                    self.advance();
                    self.make_token(TokenKind::LtEq)
                }
                Some('>') => {
                    self.advance();
                    self.make_token(TokenKind::LtGt)
                }
                Some('<') => {
                    self.advance();
                    self.make_token(TokenKind::LeftShift)
                }
                _ => self.make_token(TokenKind::Lt),
            },
            '>' => match self.peek() {
                Some('=') => {
                    self.advance();
                    self.make_token(TokenKind::GtEq)
                }
                Some('>') => {
                    self.advance();
                    self.make_token(TokenKind::RightShift)
                }
                _ => self.make_token(TokenKind::Gt),
            },
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                } else {
                    self.error("Unexpected character: !")
                }
            }
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    self.make_token(TokenKind::Concat)
                } else {
                    self.make_token(TokenKind::BitOr)
                }
            }
            ':' => {
                if self.peek() == Some(':') {
                    self.advance();
                    self.make_token(TokenKind::DoubleColon)
                } else {
                    self.scan_placeholder(':')
                }
            }
            '?' | '$' | '@' => self.scan_placeholder(c),
            '\'' => self.scan_string(),
            '"' => self.scan_quoted_identifier('"'),
            '`' => self.scan_quoted_identifier('`'),
            '[' => self.scan_quoted_identifier(']'),
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_identifier(),
            _ => self.error(format!("Unexpected character: {c}")),
        }
    }

    /// Tokenizes the entire input. The last token is always `Eof`.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Returns true if `text` is exactly one bind placeholder.
#[must_use]
pub fn is_placeholder(text: &str) -> bool {
    let mut lexer = Lexer::new(text);
    matches!(lexer.next_token().kind, TokenKind::Placeholder(_)) && lexer.next_token().is_eof()
}

/// Splits a dotted column reference (`id`, `u.id`, `main."users".id`) into
/// its unquoted segments. Returns `None` if `text` is anything else.
#[must_use]
pub fn column_path(text: &str) -> Option<Vec<String>> {
    let mut lexer = Lexer::new(text);
    let mut path = Vec::new();
    loop {
        path.push(String::from(lexer.next_token().identifier()?));
        match lexer.next_token().kind {
            TokenKind::Dot => {}
            TokenKind::Eof => return Some(path),
            _ => return None,
        }
    }
}
