//! Policy statements.

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::effect::Effect;
use super::marker::{DEFAULT_STATEMENT_RESOURCE, Marker};

/// One permission rule within a policy document.
///
/// Actions and resources are ordered sets: insertion order is kept and
/// duplicates are dropped on append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(rename = "SID")]
    sid: String,
    #[serde(rename = "Effect")]
    effect: Effect,
    #[serde(rename = "Action")]
    actions: Vec<String>,
    #[serde(rename = "Resources")]
    resources: Vec<String>,
    #[serde(rename = "Condition", default, skip_serializing_if = "Option::is_none")]
    condition: Option<Condition>,
}

impl Statement {
    /// An empty statement with no actions or resources.
    pub fn new(sid: impl Into<String>, effect: Effect) -> Self {
        Statement {
            sid: sid.into(),
            effect,
            actions: Vec::new(),
            resources: Vec::new(),
            condition: None,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.append_action(action);
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.append_resource(resource);
        self
    }

    pub fn with_condition(mut self, condition: Option<Condition>) -> Self {
        self.condition = condition;
        self
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    pub fn has_action(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }

    pub fn has_resource(&self, resource: &str) -> bool {
        self.resources.iter().any(|r| r == resource)
    }

    pub fn has_effect(&self, effect: Effect) -> bool {
        self.effect == effect
    }

    /// Conditions match when both are absent or both have the same operator, key and value.
    pub fn has_condition(&self, condition: Option<&Condition>) -> bool {
        self.condition.as_ref() == condition
    }

    pub fn append_action(&mut self, action: impl Into<String>) {
        let action = action.into();
        if !self.has_action(&action) {
            self.actions.push(action);
        }
    }

    /// Append a resource. A statement holding only the default `*` resource
    /// has it replaced by the first distinct resource appended.
    pub fn append_resource(&mut self, resource: impl Into<String>) {
        let resource = resource.into();
        if self.resources.len() == 1 && self.has_resource(DEFAULT_STATEMENT_RESOURCE) {
            self.resources.clear();
        }
        if !self.has_resource(&resource) {
            self.resources.push(resource);
        }
    }

    /// Whether the marker can be merged into this statement: same effect,
    /// resource already covered and identical condition.
    pub fn accepts(&self, marker: &Marker) -> bool {
        self.has_effect(marker.effect())
            && self.has_resource(marker.resource())
            && self.has_condition(marker.condition().as_ref())
    }

    /// Merge the marker's action and resource into this statement.
    pub fn append_for(&mut self, marker: &Marker) {
        self.append_action(marker.action());
        self.append_resource(marker.resource());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    fn statement() -> Statement {
        Statement::new("Default", Effect::Allow)
            .with_action("ec2:DescribeVpcs")
            .with_resource("*")
    }

    #[test]
    fn test_append_action_dedups_and_keeps_order() {
        let mut statement = statement();
        statement.append_action("s3:GetObject");
        statement.append_action("ec2:DescribeVpcs");
        statement.append_action("iam:*");
        assert_eq!(
            statement.actions(),
            &["ec2:DescribeVpcs", "s3:GetObject", "iam:*"].map(String::from)
        );
    }

    #[test]
    fn test_append_resource_replaces_lone_default() {
        let mut statement = statement();
        statement.append_resource("arn:aws:s3:::bucket");
        assert_eq!(statement.resources(), &["arn:aws:s3:::bucket".to_string()]);
    }

    #[test]
    fn test_append_resource_keeps_default_when_repeated() {
        let mut statement = statement();
        statement.append_resource("*");
        assert_eq!(statement.resources(), &["*".to_string()]);
    }

    #[test]
    fn test_append_resource_unions_specific_resources() {
        let mut statement = Statement::new("Default", Effect::Allow).with_resource("thisisfake");
        statement.append_resource("thisisfake2");
        statement.append_resource("thisisfake");
        assert_eq!(
            statement.resources(),
            &["thisisfake".to_string(), "thisisfake2".to_string()]
        );
    }

    #[test]
    fn test_append_resource_does_not_replace_default_among_others() {
        let mut statement = Statement::new("Default", Effect::Allow)
            .with_resource("a")
            .with_resource("*");
        statement.append_resource("b");
        assert_eq!(statement.resources(), &["a", "*", "b"].map(String::from));
    }

    #[parameterized(
        same = { Marker::new("test", "s3:*"), true },
        explicit_defaults = { Marker::new("test", "s3:*").with_effect("Allow").with_resource("*"), true },
        other_effect = { Marker::new("test", "s3:*").with_effect("Deny"), false },
        other_resource = { Marker::new("test", "s3:*").with_resource("thisisfake"), false },
        with_condition = { Marker::new("test", "s3:*").with_condition("Bool", "aws:SecureTransport", "true"), false },
    )]
    fn test_accepts(marker: Marker, expected: bool) {
        assert_eq!(statement().accepts(&marker.with_default()), expected);
    }

    #[test]
    fn test_accepts_matching_condition() {
        let condition = Condition::new("test", "test", "StringEquals");
        let statement = statement().with_condition(condition);
        let marker = Marker::new("test", "rds:*")
            .with_condition("StringEquals", "test", "test")
            .with_default();
        assert!(statement.accepts(&marker));
        assert!(!statement.accepts(&Marker::new("test", "rds:*").with_default()));
    }

    #[test]
    fn test_serialization_omits_missing_condition() {
        let json = serde_json::to_value(statement()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "SID": "Default",
                "Effect": "Allow",
                "Action": ["ec2:DescribeVpcs"],
                "Resources": ["*"],
            })
        );
    }

    #[test]
    fn test_serialization_with_condition() {
        let statement = statement().with_condition(Condition::new("aws:SourceIp", "10.0.0.0/8", "IpAddress"));
        let json = serde_json::to_value(&statement).unwrap();
        assert_eq!(
            json["Condition"],
            serde_json::json!({"IpAddress": {"aws:SourceIp": "10.0.0.0/8"}})
        );
        let parsed: Statement = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, statement);
    }
}
