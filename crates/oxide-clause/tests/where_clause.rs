//! Tests for WHERE extraction: operators, placeholders, precedence, groups
//! and errors.

mod common;
use common::*;

use oxide_clause::{ComparisonOp, Condition, ParseError, Predicate, WhereParser};

#[test]
fn where_single_placeholder() {
    assert_eq!(
        conditions("SELECT * FROM users WHERE id = @id"),
        [Condition::new("id", ComparisonOp::Eq, "@id")]
    );
}

#[test]
fn where_is_not_null_has_empty_value() {
    let conditions = conditions("SELECT * FROM users WHERE a IS NOT NULL");
    assert_eq!(conditions[0].operator, ComparisonOp::IsNotNull);
    assert_eq!(conditions[0].value, "");
}

#[test]
fn where_in_list_kept_verbatim() {
    assert_eq!(
        conditions("SELECT * FROM users WHERE role IN (@a,@b)"),
        [Condition::new("role", ComparisonOp::In, "(@a,@b)")]
    );
}

#[test]
fn where_and_or_keeps_source_order() {
    let parser = WhereParser::new("SELECT * FROM t WHERE a=1 AND b=2 OR c=3").unwrap();
    assert_eq!(rendered(&parser.into_output().into_conditions()), ["a = 1", "b = 2", "c = 3"]);
}

#[test]
fn where_and_binds_tighter_than_or() {
    let parser = WhereParser::new("SELECT * FROM t WHERE a=1 AND b=2 OR c=3").unwrap();
    let Predicate::Or(terms) = parser.predicate() else {
        panic!("expected OR root, got {:?}", parser.predicate());
    };
    assert_eq!(terms.len(), 2);
    assert!(matches!(&terms[0], Predicate::And(inner) if inner.len() == 2));
    assert!(matches!(&terms[1], Predicate::Leaf(c) if c.operand == "c"));
}

#[test]
fn where_parenthesized_group() {
    let parser = WhereParser::new("SELECT * FROM t WHERE (a = 1 OR b = 2) AND c = 3").unwrap();
    assert_eq!(rendered(&parser.into_output().into_conditions()), ["a = 1", "b = 2", "c = 3"]);
}

#[test]
fn where_every_operator() {
    let cases = [
        ("a = 1", ComparisonOp::Eq, "1"),
        ("a != 1", ComparisonOp::NotEq, "1"),
        ("a <> 1", ComparisonOp::LtGt, "1"),
        ("a < 1", ComparisonOp::Lt, "1"),
        ("a <= 1", ComparisonOp::LtEq, "1"),
        ("a > 1", ComparisonOp::Gt, "1"),
        ("a >= 1", ComparisonOp::GtEq, "1"),
        ("a LIKE 'x%'", ComparisonOp::Like, "'x%'"),
        ("a NOT LIKE :p", ComparisonOp::NotLike, ":p"),
        ("a IN (1, 2)", ComparisonOp::In, "(1, 2)"),
        ("a NOT IN (?1, ?2)", ComparisonOp::NotIn, "(?1, ?2)"),
        ("a IS NULL", ComparisonOp::IsNull, ""),
        ("a IS NOT NULL", ComparisonOp::IsNotNull, ""),
        ("a BETWEEN $1 AND $2", ComparisonOp::Between, "$1 AND $2"),
        ("a NOT BETWEEN 1 AND 9", ComparisonOp::NotBetween, "1 AND 9"),
    ];
    for (predicate, operator, value) in cases {
        let sql = format!("SELECT * FROM t WHERE {predicate}");
        assert_eq!(conditions(&sql), [Condition::new("a", operator, value)], "{sql}");
    }
}

#[test]
fn where_operators_are_case_insensitive() {
    assert_eq!(
        conditions("select * from t where name like @n and deleted_at is null"),
        [
            Condition::new("name", ComparisonOp::Like, "@n"),
            Condition::new("deleted_at", ComparisonOp::IsNull, ""),
        ]
    );
}

#[test]
fn where_operator_inside_identifier_is_not_matched() {
    assert_eq!(
        conditions("SELECT * FROM t WHERE island = 1 AND indexes = 2"),
        [
            Condition::new("island", ComparisonOp::Eq, "1"),
            Condition::new("indexes", ComparisonOp::Eq, "2"),
        ]
    );
}

#[test]
fn where_string_literals_are_opaque() {
    assert_eq!(
        conditions("SELECT * FROM t WHERE note = 'a = b AND c' OR x = 1"),
        [
            Condition::new("note", ComparisonOp::Eq, "'a = b AND c'"),
            Condition::new("x", ComparisonOp::Eq, "1"),
        ]
    );
}

#[test]
fn where_exists_subquery() {
    assert_eq!(
        conditions("SELECT * FROM u WHERE EXISTS (SELECT 1 FROM o WHERE o.uid = u.id AND o.x = 1)"),
        [Condition::new(
            "",
            ComparisonOp::Exists,
            "(SELECT 1 FROM o WHERE o.uid = u.id AND o.x = 1)"
        )]
    );
}

#[test]
fn where_missing() {
    assert_eq!(
        WhereParser::new("SELECT * FROM t").unwrap_err(),
        ParseError::MissingClause { clause: "WHERE" }
    );
}

#[test]
fn where_bare_is_an_error() {
    assert!(matches!(
        WhereParser::new("SELECT * FROM t WHERE").unwrap_err(),
        ParseError::MalformedCondition { .. }
    ));
}

#[test]
fn where_fragment_without_operator() {
    assert_eq!(
        WhereParser::new("SELECT * FROM t WHERE a = 1 AND active").unwrap_err(),
        ParseError::MalformedCondition {
            fragment: String::from("active")
        }
    );
    assert_eq!(
        WhereParser::new("SELECT * FROM t WHERE a = 1 AND active")
            .unwrap_err()
            .to_string(),
        "malformed condition: 'active'"
    );
}

#[test]
fn where_of_later_union_branch_ignored() {
    assert_eq!(
        WhereParser::new("SELECT a FROM t UNION SELECT b FROM u WHERE b = 1 GROUP BY b").unwrap_err(),
        ParseError::MissingClause { clause: "WHERE" }
    );
    assert_eq!(
        rendered(&conditions("SELECT a FROM t WHERE a = @a INTERSECT SELECT b FROM u WHERE b = 1")),
        ["a = @a"]
    );
}
