//! Data model for markers, conditions, statements and policy documents.
//!
//! Serialized policy document shape:
//! `{"Version": "2012-10-17", "Statement": [{"SID", "Effect", "Action", "Resources", "Condition"?}]}`

mod condition;
mod document;
mod effect;
mod marker;
mod provider;
mod statement;

pub use condition::{Condition, Operator};
pub use document::{POLICY_VERSION, PolicyDocument};
pub use effect::Effect;
pub use marker::{
    AWS_MARKER_DEFINITION, DEFAULT_STATEMENT_ID, DEFAULT_STATEMENT_RESOURCE, MARKER_PREFIX,
    MARKER_PROGRAM, Marker, adjust_id, marker_definition,
};
pub use provider::{PolicyMarker, Provider};
pub use statement::Statement;
