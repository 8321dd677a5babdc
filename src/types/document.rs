//! Policy documents and the statement consolidation fold.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::marker::{Marker, adjust_id};
use super::statement::Statement;

/// The IAM policy language version written into every document.
pub const POLICY_VERSION: &str = "2012-10-17";

/// An IAM policy document. Statement ids are unique and statements keep the
/// order in which their ids were first seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Statement")]
    statements: Vec<Statement>,
}

impl Default for PolicyDocument {
    fn default() -> Self {
        PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statements: Vec::new(),
        }
    }
}

impl PolicyDocument {
    /// Fold the markers, in order, into a new document. Markers are expected
    /// to be validated and defaulted.
    pub fn from_markers<'a>(markers: impl IntoIterator<Item = &'a Marker>) -> Self {
        let mut document = PolicyDocument::default();
        for marker in markers {
            document.add_statement_for(marker);
        }
        document
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn find(&self, sid: &str) -> Option<&Statement> {
        self.statements.iter().find(|s| s.sid() == sid)
    }

    fn find_mut(&mut self, sid: &str) -> Option<&mut Statement> {
        self.statements.iter_mut().find(|s| s.sid() == sid)
    }

    /// Merge one marker into the document and return the id of the statement
    /// that received it.
    ///
    /// A marker lands in the statement carrying its id. When that statement
    /// has a different effect, does not already hold the marker's resource,
    /// or has a different condition, the id is bumped with [`adjust_id`] and
    /// the search repeats until a compatible statement or a free id is found.
    /// The marker itself is left untouched.
    pub fn add_statement_for(&mut self, marker: &Marker) -> String {
        let mut sid = marker.id().to_string();

        loop {
            match self.find_mut(&sid) {
                None => {
                    debug!(
                        event = "Consolidate",
                        phase = "NewStatement",
                        sid = sid.as_str(),
                        action = marker.action()
                    );
                    let statement = marker.clone().with_id(sid.clone()).to_statement();
                    self.statements.push(statement);
                    return sid;
                }
                Some(statement) if statement.accepts(marker) => {
                    debug!(
                        event = "Consolidate",
                        phase = "Merge",
                        sid = sid.as_str(),
                        action = marker.action()
                    );
                    statement.append_for(marker);
                    return sid;
                }
                Some(_) => {
                    let adjusted = adjust_id(&sid);
                    debug!(
                        event = "Consolidate",
                        phase = "Conflict",
                        sid = sid.as_str(),
                        adjusted = adjusted.as_str()
                    );
                    sid = adjusted;
                }
            }
        }
    }
}
