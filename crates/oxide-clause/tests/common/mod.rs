#![allow(dead_code)]

use oxide_clause::{
    Condition, FromParser, GroupByParser, GroupBySpec, JoinClause, JoinParser, ParseError, Query,
    SelectItem, SelectParser, SubQueryParser, SubqueryExtraction, TableRef, WhereParser,
};

pub fn parse(sql: &str) -> Query {
    Query::parse(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    Query::parse(sql).expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn tables(sql: &str) -> Vec<TableRef> {
    FromParser::new(sql)
        .unwrap_or_else(|e| panic!("Failed to parse FROM: {sql}\nError: {e:?}"))
        .into_output()
}

pub fn conditions(sql: &str) -> Vec<Condition> {
    WhereParser::new(sql)
        .unwrap_or_else(|e| panic!("Failed to parse WHERE: {sql}\nError: {e:?}"))
        .into_output()
        .into_conditions()
}

pub fn joins(sql: &str) -> Vec<JoinClause> {
    JoinParser::new(sql)
        .unwrap_or_else(|e| panic!("Failed to parse JOIN: {sql}\nError: {e:?}"))
        .into_output()
}

pub fn group_by(sql: &str) -> Option<GroupBySpec> {
    GroupByParser::new(sql)
        .unwrap_or_else(|e| panic!("Failed to parse GROUP BY: {sql}\nError: {e:?}"))
        .into_output()
}

pub fn select_items(sql: &str) -> Vec<SelectItem> {
    SelectParser::new(sql)
        .unwrap_or_else(|e| panic!("Failed to parse SELECT: {sql}\nError: {e:?}"))
        .into_output()
}

pub fn subqueries(sql: &str) -> SubqueryExtraction {
    SubQueryParser::new(sql)
        .unwrap_or_else(|e| panic!("Failed to parse subqueries: {sql}\nError: {e:?}"))
        .into_output()
}

/// Renders a table list as `name [AS alias]` strings.
pub fn table_names(tables: &[TableRef]) -> Vec<String> {
    tables.iter().map(ToString::to_string).collect()
}

/// Renders conditions as `operand operator value` strings.
pub fn rendered(conditions: &[Condition]) -> Vec<String> {
    conditions.iter().map(ToString::to_string).collect()
}

/// Verifies that parsing is a pure function of the input and that the
/// normalized text parses to the same query.
pub fn fixed_point(sql: &str) {
    let first = parse(sql);
    let second = parse(sql);
    assert_eq!(first, second, "Parsing is not idempotent for: {sql}");
    let reparsed = parse(&first.sql);
    assert_eq!(
        first, reparsed,
        "Normalized text parses differently.\n  Input:      {sql}\n  Normalized: {}",
        first.sql
    );
}
