//! Tests for subquery extraction and the tables used by the main query.

mod common;
use common::*;

use oxide_clause::TableRef;

#[test]
fn subqueries_two_in_from() {
    let extraction = subqueries(
        "SELECT * FROM (SELECT id FROM users) a JOIN (SELECT user_id FROM orders) b ON a.id = b.user_id",
    );
    assert_eq!(
        extraction.subqueries,
        ["(SELECT id FROM users)", "(SELECT user_id FROM orders)"]
    );
}

#[test]
fn subqueries_nested_outer_then_inner() {
    let extraction = subqueries(
        "SELECT * FROM t WHERE a IN (SELECT a FROM u WHERE b IN (SELECT b FROM v))",
    );
    assert_eq!(
        extraction.subqueries,
        [
            "(SELECT a FROM u WHERE b IN (SELECT b FROM v))",
            "(SELECT b FROM v)",
        ]
    );
}

#[test]
fn subqueries_none() {
    let extraction = subqueries("SELECT COUNT(*) FROM t WHERE a IN (1, 2)");
    assert!(extraction.subqueries.is_empty());
    assert_eq!(extraction.tables_used, [TableRef::new("t")]);
}

#[test]
fn subqueries_string_literal_is_not_a_subquery() {
    let extraction = subqueries("SELECT * FROM t WHERE note = '(SELECT 1)'");
    assert!(extraction.subqueries.is_empty());
}

#[test]
fn subqueries_tables_used_is_main_query_only() {
    let extraction = subqueries(
        "SELECT * FROM users u LEFT JOIN orders o ON o.uid = u.id \
         WHERE u.id IN (SELECT uid FROM bans)",
    );
    assert_eq!(
        table_names(&extraction.tables_used),
        ["users AS u", "orders AS o"]
    );

    // Re-running on a returned subquery reveals its own tables.
    let text = &extraction.subqueries[0];
    let inner = subqueries(&text[1..text.len() - 1]);
    assert_eq!(inner.tables_used, [TableRef::new("bans")]);
}

#[test]
fn subqueries_scalar_in_projection() {
    let extraction = subqueries("SELECT (SELECT MAX(id) FROM t) AS top");
    assert_eq!(extraction.subqueries, ["(SELECT MAX(id) FROM t)"]);
    assert!(extraction.tables_used.is_empty());
}
