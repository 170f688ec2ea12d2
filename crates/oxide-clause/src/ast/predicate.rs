//! Conditions and boolean predicate trees.

use core::fmt;

use serde::Serialize;

/// Comparison operators recognized in WHERE, HAVING and ON predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ComparisonOp {
    /// `=`
    #[serde(rename = "=")]
    Eq,
    /// `!=`
    #[serde(rename = "!=")]
    NotEq,
    /// `<>`
    #[serde(rename = "<>")]
    LtGt,
    /// `<`
    #[serde(rename = "<")]
    Lt,
    /// `<=`
    #[serde(rename = "<=")]
    LtEq,
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `>=`
    #[serde(rename = ">=")]
    GtEq,
    /// `LIKE`
    #[serde(rename = "LIKE")]
    Like,
    /// `NOT LIKE`
    #[serde(rename = "NOT LIKE")]
    NotLike,
    /// `IN (...)`
    #[serde(rename = "IN")]
    In,
    /// `NOT IN (...)`
    #[serde(rename = "NOT IN")]
    NotIn,
    /// `IS NULL`
    #[serde(rename = "IS NULL")]
    IsNull,
    /// `IS NOT NULL`
    #[serde(rename = "IS NOT NULL")]
    IsNotNull,
    /// `BETWEEN low AND high`
    #[serde(rename = "BETWEEN")]
    Between,
    /// `NOT BETWEEN low AND high`
    #[serde(rename = "NOT BETWEEN")]
    NotBetween,
    /// `EXISTS (subquery)`
    #[serde(rename = "EXISTS")]
    Exists,
    /// `NOT EXISTS (subquery)`
    #[serde(rename = "NOT EXISTS")]
    NotExists,
}

impl ComparisonOp {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::LtGt => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
            Self::Exists => "EXISTS",
            Self::NotExists => "NOT EXISTS",
        }
    }

    /// Returns true for operators that take no right-hand value.
    #[must_use]
    pub const fn is_unary(&self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }

    /// Returns true for `EXISTS`/`NOT EXISTS`, which have no left operand.
    #[must_use]
    pub const fn is_existential(&self) -> bool {
        matches!(self, Self::Exists | Self::NotExists)
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `<operand> <operator> <value>` comparison.
///
/// `operand` and `value` are verbatim slices of the normalized statement.
/// `value` is empty for `IS [NOT] NULL`, the parenthesized list for
/// `[NOT] IN`, `low AND high` for `[NOT] BETWEEN`; `operand` is empty for
/// `[NOT] EXISTS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Condition {
    /// Left-hand side, e.g. `users.id` or `COUNT(*)`.
    pub operand: String,
    /// The comparison operator.
    pub operator: ComparisonOp,
    /// Right-hand side, e.g. `@id`, `'x'`, `(@a,@b)`.
    pub value: String,
}

impl Condition {
    /// Creates a condition.
    #[must_use]
    pub fn new(operand: impl Into<String>, operator: ComparisonOp, value: impl Into<String>) -> Self {
        Self {
            operand: operand.into(),
            operator,
            value: value.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.operand.is_empty(), self.value.is_empty()) {
            (true, _) => write!(f, "{} {}", self.operator, self.value),
            (false, true) => write!(f, "{} {}", self.operand, self.operator),
            (false, false) => write!(f, "{} {} {}", self.operand, self.operator, self.value),
        }
    }
}

/// A boolean predicate. AND binds tighter than OR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    /// A single comparison.
    Leaf(Condition),
    /// Conjunction of two or more predicates.
    And(Vec<Predicate>),
    /// Disjunction of two or more predicates.
    Or(Vec<Predicate>),
    /// A parenthesized predicate.
    Group(Box<Predicate>),
}

impl Predicate {
    /// Returns every leaf condition in source order.
    #[must_use]
    pub fn conditions(&self) -> Vec<&Condition> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Leaf(condition) => out.push(condition),
                Self::And(children) | Self::Or(children) => stack.extend(children.iter().rev()),
                Self::Group(inner) => stack.push(inner),
            }
        }
        out
    }

    /// Returns the flat leaf list as owned values.
    #[must_use]
    pub fn into_conditions(self) -> Vec<Condition> {
        self.conditions().into_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(operand: &str, value: &str) -> Predicate {
        Predicate::Leaf(Condition::new(operand, ComparisonOp::Eq, value))
    }

    #[test]
    fn test_conditions_in_source_order() {
        // (a = 1 OR b = 2) AND c = 3
        let predicate = Predicate::And(vec![
            Predicate::Group(Box::new(Predicate::Or(vec![leaf("a", "1"), leaf("b", "2")]))),
            leaf("c", "3"),
        ]);
        let operands: Vec<&str> = predicate
            .conditions()
            .iter()
            .map(|c| c.operand.as_str())
            .collect();
        assert_eq!(operands, ["a", "b", "c"]);
    }

    #[test]
    fn test_condition_display() {
        assert_eq!(
            Condition::new("id", ComparisonOp::Eq, "@id").to_string(),
            "id = @id"
        );
        assert_eq!(
            Condition::new("a", ComparisonOp::IsNotNull, "").to_string(),
            "a IS NOT NULL"
        );
        assert_eq!(
            Condition::new("", ComparisonOp::Exists, "(SELECT 1)").to_string(),
            "EXISTS (SELECT 1)"
        );
    }
}
