//! Statement effects.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Whether a statement grants or refuses its actions.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use yare::parameterized;

    #[parameterized(
        allow = { "Allow", Effect::Allow },
        deny = { "Deny", Effect::Deny },
    )]
    fn test_effect_from_str(input: &str, expected: Effect) {
        assert_eq!(Effect::from_str(input).unwrap(), expected);
        assert_eq!(expected.as_ref(), input);
    }

    #[parameterized(
        lowercase = { "allow" },
        uppercase = { "DENY" },
        empty = { "" },
        other = { "Permit" },
    )]
    fn test_effect_rejects_unknown(input: &str) {
        assert!(Effect::from_str(input).is_err());
    }

    #[test]
    fn test_effect_default_is_allow() {
        assert_eq!(Effect::default(), Effect::Allow);
    }

    #[test]
    fn test_effect_serializes_as_name() {
        assert_eq!(serde_json::to_value(Effect::Deny).unwrap(), "Deny");
    }
}
