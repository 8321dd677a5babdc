//! IAM condition operators and single-entry condition clauses.
//!
//! A condition serializes as `{"<Operator>": {"<key>": "<value>"}}`. The
//! serialized form is also the identity of a condition: two statements only
//! share a condition when the operator, key and value all match.
//!
//! See <https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_policies_elements_condition_operators.html>.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

use crate::error::PolicyError;

/// The closed set of condition operators a marker may name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsRefStr,
    StrumDisplay,
    EnumIter,
    EnumString,
)]
pub enum Operator {
    // string
    StringEquals,
    StringNotEquals,
    StringEqualsIgnoreCase,
    StringNotEqualsIgnoreCase,
    StringLike,
    StringNotLike,

    // numeric
    NumericEquals,
    NumericNotEquals,
    NumericLessThan,
    NumericLessThanEquals,
    NumericGreaterThan,
    NumericGreaterThanEquals,

    // date
    DateEquals,
    DateNotEquals,
    DateLessThan,
    DateLessThanEquals,
    DateGreaterThan,
    DateGreaterThanEquals,

    // boolean
    Bool,

    // binary
    BinaryEquals,

    // ip address
    IpAddress,
    NotIpAddress,

    // arn
    ArnEquals,
    ArnNotEquals,
    ArnLike,
    ArnNotLike,
}

impl Operator {
    /// Whether `name` is one of the recognized operator names (case-sensitive).
    pub fn is_valid(name: &str) -> bool {
        Operator::from_str(name).is_ok()
    }
}

/// A condition clause holding exactly one operator with one key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ConditionRepr", into = "ConditionRepr")]
pub struct Condition {
    operator: Operator,
    key: String,
    value: String,
}

impl Condition {
    /// Build a condition, or `None` when `operator` is not a recognized name.
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        operator: &str,
    ) -> Option<Condition> {
        let operator = Operator::from_str(operator).ok()?;
        Some(Condition {
            operator,
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Renders the compact canonical JSON form, e.g. `{"Bool":{"aws:SecureTransport":"true"}}`.
impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let json = serde_json::to_string(&ConditionRepr::from(self.clone()))
            .map_err(|_| std::fmt::Error)?;
        f.write_str(&json)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
struct ConditionRepr(BTreeMap<String, BTreeMap<String, String>>);

impl From<Condition> for ConditionRepr {
    fn from(condition: Condition) -> Self {
        let mut entry = BTreeMap::new();
        entry.insert(condition.key, condition.value);

        let mut repr = BTreeMap::new();
        repr.insert(condition.operator.as_ref().to_string(), entry);
        ConditionRepr(repr)
    }
}

impl TryFrom<ConditionRepr> for Condition {
    type Error = PolicyError;

    fn try_from(repr: ConditionRepr) -> Result<Self, Self::Error> {
        let mut operators = repr.0.into_iter();
        let (Some((operator, entries)), None) = (operators.next(), operators.next()) else {
            return Err(PolicyError::InvalidCondition(
                "a condition must hold exactly one operator".to_string(),
            ));
        };

        let mut entries = entries.into_iter();
        let (Some((key, value)), None) = (entries.next(), entries.next()) else {
            return Err(PolicyError::InvalidCondition(format!(
                "operator [{operator}] must hold exactly one key"
            )));
        };

        Condition::new(key, value, &operator).ok_or_else(|| {
            PolicyError::InvalidCondition(format!("found operator [{operator}] - invalid condition operator"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use yare::parameterized;

    #[parameterized(
        string_equals = { "StringEquals" },
        string_not_like = { "StringNotLike" },
        numeric_greater_than_equals = { "NumericGreaterThanEquals" },
        date_less_than = { "DateLessThan" },
        bool_op = { "Bool" },
        binary_equals = { "BinaryEquals" },
        ip_address = { "IpAddress" },
        not_ip_address = { "NotIpAddress" },
        arn_not_like = { "ArnNotLike" },
    )]
    fn test_new_condition_recognized(operator: &str) {
        let condition = Condition::new("aws:ResourceTag/env", "dev", operator).unwrap();
        assert_eq!(condition.operator().as_ref(), operator);
        assert_eq!(condition.key(), "aws:ResourceTag/env");
        assert_eq!(condition.value(), "dev");
    }

    #[parameterized(
        unknown = { "StringMatches" },
        lowercase = { "stringequals" },
        empty = { "" },
        if_exists_suffix = { "StringEqualsIfExists" },
    )]
    fn test_new_condition_unrecognized(operator: &str) {
        assert!(Condition::new("key", "value", operator).is_none());
        assert!(!Operator::is_valid(operator));
    }

    #[test]
    fn test_operator_set_is_closed() {
        assert_eq!(Operator::iter().count(), 26);
        for operator in Operator::iter() {
            assert!(Operator::is_valid(operator.as_ref()));
        }
    }

    #[test]
    fn test_condition_display_is_canonical() {
        let condition = Condition::new("aws:SecureTransport", "true", "Bool").unwrap();
        assert_eq!(
            condition.to_string(),
            r#"{"Bool":{"aws:SecureTransport":"true"}}"#
        );
    }

    #[test]
    fn test_condition_equality_is_by_triple() {
        let a = Condition::new("test", "test", "StringEquals").unwrap();
        let b = Condition::new("test", "test", "StringEquals").unwrap();
        let other_value = Condition::new("test", "other", "StringEquals").unwrap();
        let other_operator = Condition::new("test", "test", "StringLike").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
        assert_ne!(a, other_value);
        assert_ne!(a, other_operator);
    }

    #[test]
    fn test_condition_deserialize() {
        let json = serde_json::json!({"IpAddress": {"aws:SourceIp": "203.0.113.0/24"}});
        let condition: Condition = serde_json::from_value(json).unwrap();
        assert_eq!(
            condition,
            Condition::new("aws:SourceIp", "203.0.113.0/24", "IpAddress").unwrap()
        );
    }

    #[parameterized(
        unknown_operator = { serde_json::json!({"StringMatches": {"a": "b"}}) },
        two_operators = { serde_json::json!({"StringEquals": {"a": "b"}, "StringLike": {"a": "b"}}) },
        two_keys = { serde_json::json!({"StringEquals": {"a": "b", "c": "d"}}) },
        empty = { serde_json::json!({}) },
    )]
    fn test_condition_deserialize_rejects(json: serde_json::Value) {
        assert!(serde_json::from_value::<Condition>(json).is_err());
    }
}
