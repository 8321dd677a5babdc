//! Groups markers by output file and builds one policy document per file.

use itertools::Itertools;
use tracing::{debug, info};

use crate::error::PolicyError;
use crate::types::{Marker, PolicyDocument, PolicyMarker};

/// Markers grouped by their file key (the marker name). Both the file order
/// and the marker order within a file follow first appearance in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerGroups {
    groups: Vec<(String, Vec<Marker>)>,
}

impl MarkerGroups {
    /// Group validated markers, applying defaults on the way in.
    pub fn from_markers(markers: &[PolicyMarker]) -> Self {
        let aws_markers: Vec<Marker> = markers
            .iter()
            .cloned()
            .map(|marker| match marker.with_default() {
                PolicyMarker::Aws(marker) => marker,
            })
            .collect();

        let groups = aws_markers
            .iter()
            .map(|marker| marker.name())
            .unique()
            .map(|name| {
                let grouped = aws_markers
                    .iter()
                    .filter(|marker| marker.name() == name)
                    .cloned()
                    .collect::<Vec<_>>();
                debug!(event = "Group", name = name, markers = grouped.len());
                (name.to_string(), grouped)
            })
            .collect();

        MarkerGroups { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&[Marker]> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, markers)| markers.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Marker])> {
        self.groups
            .iter()
            .map(|(name, markers)| (name.as_str(), markers.as_slice()))
    }
}

/// A finished document together with the file key it is written under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyFile {
    pub name: String,
    pub document: PolicyDocument,
}

/// Build the document for one file. Every marker must carry the same name.
pub fn document_for(markers: &[Marker]) -> Result<PolicyDocument, PolicyError> {
    if let Some(first) = markers.first() {
        let expected = first.name();
        if let Some(other) = markers.iter().find(|m| m.name() != expected) {
            return Err(PolicyError::MarkerNameMismatch {
                expected: expected.to_string(),
                found: other.name().to_string(),
            });
        }
    }

    Ok(PolicyDocument::from_markers(markers))
}

/// Build every document before anything is written, so a consolidation
/// error leaves the output directory untouched.
pub fn build_documents(groups: &MarkerGroups) -> Result<Vec<PolicyFile>, PolicyError> {
    groups
        .iter()
        .map(|(name, markers)| {
            let document = document_for(markers)?;
            info!(
                event = "Build",
                name = name,
                markers = markers.len(),
                statements = document.statements().len()
            );
            Ok(PolicyFile {
                name: name.to_string(),
                document,
            })
        })
        .collect()
}
