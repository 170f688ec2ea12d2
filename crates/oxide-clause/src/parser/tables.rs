//! Immutable keyword, operator and function tables shared by the clause
//! parsers.
//!
//! Phrases are sequences of token spellings (see [`Token::matches_word`]).
//! Wherever two phrases share a prefix the longer one comes first, so a
//! first-match scan always picks the most specific phrase.

use crate::ast::{ComparisonOp, JoinType};
use crate::lexer::Token;

/// A keyword phrase, one spelling per token.
pub type Phrase = &'static [&'static str];

/// Join phrases, longest first.
pub const JOIN_PHRASES: &[(Phrase, JoinType)] = &[
    (&["SELF", "JOIN"], JoinType::SelfJoin),
    (&["NATURAL", "JOIN"], JoinType::Natural),
    (&["INNER", "JOIN"], JoinType::Inner),
    (&["LEFT", "OUTER", "JOIN"], JoinType::LeftOuter),
    (&["RIGHT", "OUTER", "JOIN"], JoinType::RightOuter),
    (&["FULL", "OUTER", "JOIN"], JoinType::FullOuter),
    (&["LEFT", "JOIN"], JoinType::Left),
    (&["RIGHT", "JOIN"], JoinType::Right),
    (&["FULL", "JOIN"], JoinType::Full),
    (&["CROSS", "JOIN"], JoinType::Cross),
    (&["JOIN"], JoinType::Join),
];

/// Every keyword phrase that ends a clause, join phrases excluded.
pub const CLAUSE_TERMINATORS: &[Phrase] = &[
    &["WHERE"],
    &["GROUP", "BY"],
    &["ORDER", "BY"],
    &["LIMIT"],
    &["OFFSET"],
    &["HAVING"],
    &["UNION"],
    &["INTERSECT"],
    &["EXCEPT"],
];

/// Set operators; only the branch before the first one is decomposed.
pub const SET_OPERATORS: &[Phrase] = &[&["UNION"], &["INTERSECT"], &["EXCEPT"]];

/// Phrases ending a SELECT list.
pub const SELECT_TERMINATORS: &[Phrase] = &[
    &["FROM"],
    &["WHERE"],
    &["GROUP", "BY"],
    &["ORDER", "BY"],
    &["LIMIT"],
    &["OFFSET"],
    &["HAVING"],
    &["UNION"],
    &["INTERSECT"],
    &["EXCEPT"],
];

/// Phrases ending a FROM list (join phrases end it as well).
pub const FROM_TERMINATORS: &[Phrase] = CLAUSE_TERMINATORS;

/// Phrases ending a WHERE clause.
pub const WHERE_TERMINATORS: &[Phrase] = &[
    &["GROUP", "BY"],
    &["ORDER", "BY"],
    &["LIMIT"],
    &["OFFSET"],
    &["HAVING"],
    &["UNION"],
    &["INTERSECT"],
    &["EXCEPT"],
];

/// Phrases ending a GROUP BY list.
pub const GROUP_BY_TERMINATORS: &[Phrase] = &[
    &["HAVING"],
    &["ORDER", "BY"],
    &["LIMIT"],
    &["OFFSET"],
    &["UNION"],
    &["INTERSECT"],
    &["EXCEPT"],
];

/// Phrases ending a HAVING predicate.
pub const HAVING_TERMINATORS: &[Phrase] = &[
    &["ORDER", "BY"],
    &["LIMIT"],
    &["OFFSET"],
    &["UNION"],
    &["INTERSECT"],
    &["EXCEPT"],
];

/// Comparison operators, longest first.
pub const COMPARISON_OPERATORS: &[(Phrase, ComparisonOp)] = &[
    (&["IS", "NOT", "NULL"], ComparisonOp::IsNotNull),
    (&["NOT", "BETWEEN"], ComparisonOp::NotBetween),
    (&["NOT", "LIKE"], ComparisonOp::NotLike),
    (&["NOT", "IN"], ComparisonOp::NotIn),
    (&["IS", "NULL"], ComparisonOp::IsNull),
    (&["BETWEEN"], ComparisonOp::Between),
    (&["LIKE"], ComparisonOp::Like),
    (&["IN"], ComparisonOp::In),
    (&["<="], ComparisonOp::LtEq),
    (&[">="], ComparisonOp::GtEq),
    (&["!="], ComparisonOp::NotEq),
    (&["<>"], ComparisonOp::LtGt),
    (&["="], ComparisonOp::Eq),
    (&["<"], ComparisonOp::Lt),
    (&[">"], ComparisonOp::Gt),
];

/// Operators that open a predicate without a left operand.
pub const EXISTENTIAL_OPERATORS: &[(Phrase, ComparisonOp)] = &[
    (&["NOT", "EXISTS"], ComparisonOp::NotExists),
    (&["EXISTS"], ComparisonOp::Exists),
];

/// Allowed argument counts `(name, min, max)` for known functions.
/// Functions not listed are not checked.
pub const FUNCTION_ARITY: &[(&str, usize, usize)] = &[
    ("COUNT", 1, 1),
    ("SUM", 1, 1),
    ("AVG", 1, 1),
    ("MIN", 1, 1),
    ("MAX", 1, 1),
    ("UPPER", 1, 1),
    ("LOWER", 1, 1),
    ("LENGTH", 1, 1),
    ("ABS", 1, 1),
    ("ROUND", 1, 2),
    ("TRIM", 1, 2),
    ("LTRIM", 1, 2),
    ("RTRIM", 1, 2),
    ("SUBSTR", 2, 3),
    ("SUBSTRING", 2, 3),
    ("IFNULL", 2, 2),
    ("NULLIF", 2, 2),
    ("REPLACE", 3, 3),
    ("COALESCE", 1, 255),
    ("CONCAT", 1, 255),
];

/// Looks up the allowed argument range of a function (case-insensitive).
#[must_use]
pub fn function_arity(name: &str) -> Option<(usize, usize)> {
    FUNCTION_ARITY
        .iter()
        .find(|(known, _, _)| known.eq_ignore_ascii_case(name))
        .map(|&(_, min, max)| (min, max))
}

/// Returns true if `phrase` is spelled by the tokens starting at `at`.
#[must_use]
pub fn matches_phrase(tokens: &[Token], at: usize, phrase: &[&str]) -> bool {
    tokens.len() >= at + phrase.len()
        && phrase
            .iter()
            .zip(&tokens[at..])
            .all(|(word, token)| token.matches_word(word))
}

/// Returns the value and token length of the first phrase in `table` that
/// matches at `at`.
#[must_use]
pub fn match_table<T: Copy>(tokens: &[Token], at: usize, table: &[(Phrase, T)]) -> Option<(T, usize)> {
    table
        .iter()
        .find(|(phrase, _)| matches_phrase(tokens, at, phrase))
        .map(|&(phrase, value)| (value, phrase.len()))
}

/// Returns the token length of the first phrase in `phrases` matching at
/// `at`.
#[must_use]
pub fn match_any(tokens: &[Token], at: usize, phrases: &[Phrase]) -> Option<usize> {
    phrases
        .iter()
        .find(|phrase| matches_phrase(tokens, at, phrase))
        .map(|phrase| phrase.len())
}
