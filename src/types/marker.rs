//! The AWS IAM policy marker record.
//!
//! A marker is written in a source comment as
//! `+policy-gen:aws:iam:policy:name=deploy,action=s3:GetObject,resource=arn:aws:s3:::bucket/*`
//! and decodes into a [`Marker`] with every field optional. Validation always
//! runs on the raw record; defaults are applied afterwards.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::traits::Row;

use super::condition::{Condition, Operator};
use super::effect::Effect;
use super::statement::Statement;

pub const MARKER_PREFIX: &str = "+";
pub const MARKER_PROGRAM: &str = "policy-gen";
pub const AWS_MARKER_DEFINITION: &str = "aws:iam:policy";

pub const DEFAULT_STATEMENT_ID: &str = "Default";
pub const DEFAULT_STATEMENT_RESOURCE: &str = "*";

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_-]{1,64}$").expect("name pattern compiles"));

static STATEMENT_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]{1,64}$").expect("statement id pattern compiles"));

/// The full marker definition, `+policy-gen:aws:iam:policy`.
pub fn marker_definition() -> String {
    format!("{MARKER_PREFIX}{MARKER_PROGRAM}:{AWS_MARKER_DEFINITION}")
}

/// One decoded `+policy-gen:aws:iam:policy` occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Marker {
    pub name: Option<String>,
    pub id: Option<String>,
    pub action: Option<String>,
    pub effect: Option<String>,
    pub resource: Option<String>,
    pub reason: Option<String>,
    pub condition_operator: Option<String>,
    pub condition_key: Option<String>,
    pub condition_value: Option<String>,
}

impl Marker {
    /// Create a marker with only the required fields set.
    pub fn new(name: impl Into<String>, action: impl Into<String>) -> Self {
        Marker {
            name: Some(name.into()),
            action: Some(action.into()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effect = Some(effect.into());
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_condition(
        mut self,
        operator: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.condition_operator = Some(operator.into());
        self.condition_key = Some(key.into());
        self.condition_value = Some(value.into());
        self
    }

    /// Validate the raw marker. Must be called before [`Marker::with_default`].
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !has_value(&self.name) {
            return Err(PolicyError::MissingName);
        }
        if !has_value(&self.action) {
            return Err(PolicyError::MissingAction);
        }

        // the name becomes the output file name
        let name = self.name();
        if !NAME_PATTERN.is_match(name) {
            return Err(PolicyError::InvalidName(name.to_string()));
        }

        if let Some(id) = &self.id {
            if !STATEMENT_ID_PATTERN.is_match(id) {
                return Err(PolicyError::InvalidStatementId(id.clone()));
            }
        }

        if let Some(effect) = &self.effect {
            if effect.parse::<Effect>().is_err() {
                return Err(PolicyError::InvalidEffect(effect.clone()));
            }
        }

        self.validate_condition()
    }

    /// Condition key, value and operator are mutually inclusive.
    pub fn validate_condition(&self) -> Result<(), PolicyError> {
        let has_key = has_value(&self.condition_key);
        let has_val = has_value(&self.condition_value);
        let has_operator = has_value(&self.condition_operator);
        let invalid_operator = self
            .condition_operator
            .as_deref()
            .filter(|operator| !operator.is_empty() && !Operator::is_valid(operator));

        if has_key == has_val && has_val == has_operator {
            return match invalid_operator {
                Some(operator) => Err(PolicyError::InvalidCondition(format!(
                    "found operator [{operator}] - invalid condition operator"
                ))),
                None => Ok(()),
            };
        }

        let mut messages = vec![
            "conditionKey, conditionValue, and conditionOperator are mutually inclusive options"
                .to_string(),
        ];
        if !has_key {
            messages.push("condition key is missing".to_string());
        }
        if !has_val {
            messages.push("condition value is missing".to_string());
        }
        match invalid_operator {
            Some(operator) => messages.push(format!(
                "found operator [{operator}] - invalid condition operator"
            )),
            None if !has_operator => {
                messages.push("condition operator is missing".to_string())
            }
            None => {}
        }

        Err(PolicyError::InvalidCondition(messages.join(" : ")))
    }

    /// Fill in the effect, resource and statement id when they were omitted.
    /// Applying defaults twice is the same as applying them once.
    pub fn with_default(mut self) -> Self {
        self.effect
            .get_or_insert_with(|| Effect::default().to_string());
        self.resource
            .get_or_insert_with(|| DEFAULT_STATEMENT_RESOURCE.to_string());
        self.id
            .get_or_insert_with(|| DEFAULT_STATEMENT_ID.to_string());
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn action(&self) -> &str {
        self.action.as_deref().unwrap_or_default()
    }

    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or(DEFAULT_STATEMENT_ID)
    }

    /// The effect, falling back to the default for an unset or unparseable value.
    pub fn effect(&self) -> Effect {
        self.effect
            .as_deref()
            .and_then(|effect| effect.parse().ok())
            .unwrap_or_default()
    }

    pub fn resource(&self) -> &str {
        self.resource.as_deref().unwrap_or(DEFAULT_STATEMENT_RESOURCE)
    }

    pub fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or_default()
    }

    /// The condition, present only when all three condition fields are set.
    pub fn condition(&self) -> Option<Condition> {
        match (
            self.condition_key.as_deref(),
            self.condition_value.as_deref(),
            self.condition_operator.as_deref(),
        ) {
            (Some(key), Some(value), Some(operator))
                if !key.is_empty() && !value.is_empty() && !operator.is_empty() =>
            {
                Condition::new(key, value, operator)
            }
            _ => None,
        }
    }

    /// Project the marker into a single-action, single-resource statement.
    pub fn to_statement(&self) -> Statement {
        Statement::new(self.id(), self.effect())
            .with_action(self.action())
            .with_resource(self.resource())
            .with_condition(self.condition())
    }

    /// The definition this marker is registered under.
    pub fn definition(&self) -> String {
        marker_definition()
    }
}

impl Row for Marker {
    fn effect_column(&self) -> String {
        self.effect
            .clone()
            .unwrap_or_else(|| Effect::default().to_string())
    }

    fn permission_column(&self) -> String {
        self.action().to_string()
    }

    fn resource_column(&self) -> String {
        self.resource().to_string()
    }

    fn reason_column(&self) -> String {
        self.reason().to_string()
    }

    fn condition_column(&self) -> String {
        self.condition()
            .map(|condition| condition.to_string())
            .unwrap_or_default()
    }
}

/// Compute the next statement id after a collision: the trailing run of
/// digits is read as a counter (zero when absent) and incremented.
///
/// `Default` becomes `Default1`, `Default9` becomes `Default10`.
pub fn adjust_id(id: &str) -> String {
    let prefix = id.trim_end_matches(|c: char| c.is_ascii_digit());
    let suffix = id[prefix.len()..].trim_start_matches('0');

    // decimal increment on the digit string, so long suffixes cannot overflow
    let mut digits: Vec<u8> = suffix.bytes().collect();
    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }
    if carry {
        digits.insert(0, b'1');
    }

    let mut adjusted = String::with_capacity(prefix.len() + digits.len());
    adjusted.push_str(prefix);
    adjusted.extend(digits.into_iter().map(char::from));
    adjusted
}

fn has_value(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}
