//! Marker providers.
//!
//! Every provider owns one marker definition and one marker record type.
//! Only AWS IAM is implemented; new providers become new variants.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde_json::{Map, Value};
use strum_macros::{AsRefStr, EnumString};

use crate::error::PolicyError;
use crate::traits::Row;

use super::marker::{Marker, marker_definition};

/// A cloud provider whose policy markers can be scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Provider {
    Aws,
}

impl Provider {
    /// The marker definition registered with the scanner, e.g. `+policy-gen:aws:iam:policy`.
    pub fn definition(&self) -> String {
        match self {
            Provider::Aws => marker_definition(),
        }
    }

    /// Decode the raw `key=value` arguments of one marker occurrence.
    pub fn decode(&self, arguments: Map<String, Value>) -> Result<PolicyMarker, PolicyError> {
        match self {
            Provider::Aws => serde_json::from_value::<Marker>(Value::Object(arguments))
                .map(PolicyMarker::Aws)
                .map_err(|e| PolicyError::ParseError(e.to_string())),
        }
    }
}

impl Display for Provider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_ref())
    }
}

/// A decoded marker of any provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyMarker {
    Aws(Marker),
}

impl PolicyMarker {
    pub fn provider(&self) -> Provider {
        match self {
            PolicyMarker::Aws(_) => Provider::Aws,
        }
    }

    pub fn definition(&self) -> String {
        self.provider().definition()
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        match self {
            PolicyMarker::Aws(marker) => marker.validate(),
        }
    }

    pub fn with_default(self) -> Self {
        match self {
            PolicyMarker::Aws(marker) => PolicyMarker::Aws(marker.with_default()),
        }
    }

    /// The output file key.
    pub fn name(&self) -> &str {
        match self {
            PolicyMarker::Aws(marker) => marker.name(),
        }
    }
}

impl From<Marker> for PolicyMarker {
    fn from(marker: Marker) -> Self {
        PolicyMarker::Aws(marker)
    }
}

/// Dispatch the Row trait to the provider's marker.
impl Row for PolicyMarker {
    fn effect_column(&self) -> String {
        match self {
            PolicyMarker::Aws(marker) => marker.effect_column(),
        }
    }

    fn permission_column(&self) -> String {
        match self {
            PolicyMarker::Aws(marker) => marker.permission_column(),
        }
    }

    fn resource_column(&self) -> String {
        match self {
            PolicyMarker::Aws(marker) => marker.resource_column(),
        }
    }

    fn reason_column(&self) -> String {
        match self {
            PolicyMarker::Aws(marker) => marker.reason_column(),
        }
    }

    fn condition_column(&self) -> String {
        match self {
            PolicyMarker::Aws(marker) => marker.condition_column(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn arguments(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!(Provider::from_str("aws").unwrap(), Provider::Aws);
        assert!(Provider::from_str("gcp").is_err());
        assert_eq!(Provider::Aws.to_string(), "aws");
    }

    #[test]
    fn test_decode_aws_marker() {
        let marker = Provider::Aws
            .decode(arguments(&[
                ("name", "test"),
                ("action", "ec2:DescribeVpcs"),
                ("conditionOperator", "StringEquals"),
                ("conditionKey", "aws:ResourceTag/env"),
                ("conditionValue", "dev"),
            ]))
            .unwrap();
        assert_eq!(
            marker,
            PolicyMarker::Aws(Marker::new("test", "ec2:DescribeVpcs").with_condition(
                "StringEquals",
                "aws:ResourceTag/env",
                "dev"
            ))
        );
        assert_eq!(marker.definition(), "+policy-gen:aws:iam:policy");
    }

    #[test]
    fn test_decode_rejects_unknown_field() {
        let result = Provider::Aws.decode(arguments(&[("name", "test"), ("principal", "x")]));
        let Err(PolicyError::ParseError(message)) = result else {
            panic!("expected a parse error");
        };
        assert!(message.contains("principal"));
    }

    #[test]
    fn test_dispatch() {
        let marker = PolicyMarker::from(Marker::new("test", "s3:*").with_effect("Deny"));
        assert_eq!(marker.validate(), Ok(()));
        assert_eq!(marker.name(), "test");
        assert_eq!(marker.effect_column(), "Deny");

        let PolicyMarker::Aws(defaulted) = marker.with_default();
        assert_eq!(defaulted.id(), "Default");
    }
}
