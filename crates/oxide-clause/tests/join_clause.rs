//! Tests for JOIN extraction: every join phrase, aliases, ON/USING, chained
//! joins and the reference sanity check.

mod common;
use common::*;

use oxide_clause::{JoinClause, JoinParser, JoinType, ParseError, TableRef};

#[test]
fn join_inner_without_alias() {
    assert_eq!(
        joins("SELECT * FROM users INNER JOIN orders ON users.id = orders.user_id"),
        [JoinClause {
            join_type: JoinType::Inner,
            table: TableRef::new("orders"),
            on: Some(String::from("users.id = orders.user_id")),
            using: Vec::new(),
        }]
    );
}

#[test]
fn join_every_phrase() {
    let cases = [
        ("JOIN", JoinType::Join),
        ("INNER JOIN", JoinType::Inner),
        ("LEFT JOIN", JoinType::Left),
        ("LEFT OUTER JOIN", JoinType::LeftOuter),
        ("RIGHT JOIN", JoinType::Right),
        ("RIGHT OUTER JOIN", JoinType::RightOuter),
        ("FULL JOIN", JoinType::Full),
        ("FULL OUTER JOIN", JoinType::FullOuter),
        ("SELF JOIN", JoinType::SelfJoin),
        ("left outer join", JoinType::LeftOuter),
    ];
    for (phrase, join_type) in cases {
        let sql = format!("SELECT * FROM a {phrase} b ON a.id = b.a_id");
        let joins = joins(&sql);
        assert_eq!(joins.len(), 1, "{sql}");
        assert_eq!(joins[0].join_type, join_type, "{sql}");
        assert_eq!(joins[0].table, TableRef::new("b"), "{sql}");
    }
}

#[test]
fn join_chain_does_not_cross_contaminate() {
    let joins = joins(
        "SELECT u.name, o.total, p.title FROM users u \
         INNER JOIN orders o ON u.id = o.user_id \
         LEFT JOIN products AS p ON p.id = o.product_id \
         CROSS JOIN settings \
         WHERE u.active = 1 ORDER BY o.total",
    );
    assert_eq!(joins.len(), 3);
    assert_eq!(joins[0].table, TableRef::new("orders").alias("o"));
    assert_eq!(joins[0].on.as_deref(), Some("u.id = o.user_id"));
    assert_eq!(joins[1].table, TableRef::new("products").alias("p"));
    assert_eq!(joins[1].on.as_deref(), Some("p.id = o.product_id"));
    assert_eq!(joins[2].join_type, JoinType::Cross);
    assert_eq!(joins[2].table, TableRef::new("settings"));
    assert!(joins[2].on.is_none());
}

#[test]
fn join_absent_is_empty() {
    assert!(joins("SELECT * FROM users WHERE id = 1").is_empty());
}

#[test]
fn join_on_derived_table() {
    let joins = joins("SELECT * FROM a JOIN (SELECT id FROM b) bb ON bb.id = a.id");
    assert_eq!(joins[0].table.name, "(SELECT id FROM b)");
    assert_eq!(joins[0].table.qualifier(), "bb");
}

#[test]
fn join_using_columns() {
    let joins = joins("SELECT * FROM a LEFT JOIN b USING (id)");
    assert_eq!(joins[0].using, ["id"]);
}

#[test]
fn join_missing_on() {
    assert_eq!(
        JoinParser::new("SELECT * FROM a INNER JOIN b WHERE a.id = 1").unwrap_err(),
        ParseError::MissingClause { clause: "ON" }
    );
}

#[test]
fn join_malformed_on() {
    assert!(matches!(
        JoinParser::new("SELECT * FROM a JOIN b ON a.id b.id").unwrap_err(),
        ParseError::MalformedCondition { .. }
    ));
}

#[test]
fn join_predicate_not_referencing_joined_table() {
    let err = JoinParser::new("SELECT * FROM a JOIN b ON a.id = a.parent_id").unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownColumnReference {
            table: String::from("b"),
            predicate: String::from("a.id = a.parent_id"),
        }
    );
}

#[test]
fn join_chain_with_cross_table_conjunct() {
    let joins = joins(
        "SELECT * FROM a JOIN b ON a.id = b.aid JOIN c ON c.bid = b.id AND a.t = b.t",
    );
    assert_eq!(joins.len(), 2);
    assert_eq!(joins[1].table, TableRef::new("c"));
    assert_eq!(joins[1].on.as_deref(), Some("c.bid = b.id AND a.t = b.t"));
}

#[test]
fn join_alias_satisfies_reference_check() {
    let joins = joins("SELECT * FROM emp e SELF JOIN emp m ON e.manager_id = m.id");
    assert_eq!(joins[0].table, TableRef::new("emp").alias("m"));
}

#[test]
fn join_of_later_union_branch_ignored() {
    assert!(joins("SELECT a FROM t UNION SELECT b FROM u JOIN v ON u.id = v.uid").is_empty());
}
