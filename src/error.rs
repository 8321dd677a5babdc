use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum PolicyError {
    #[error("marker missing name field")]
    MissingName,

    #[error("marker missing action field")]
    MissingAction,

    #[error(
        "invalid name - must contain only lowercase alphanumeric characters with underscores or dashes and is limited to 64 characters - [{0}]"
    )]
    InvalidName(String),

    #[error(
        "invalid statement id - must contain a-z, A-Z, 0-9 and limited to 64 characters - [{0}]"
    )]
    InvalidStatementId(String),

    #[error("invalid marker effect [{0}]")]
    InvalidEffect(String),

    #[error("invalid condition specified - {0}")]
    InvalidCondition(String),

    #[error("found mismatching marker names in same file [{expected}/{found}]")]
    MarkerNameMismatch { expected: String, found: String },

    #[error("found invalid marker with text [{text}] at position [{position}] - {source}")]
    InvalidMarker {
        text: String,
        position: String,
        #[source]
        source: Box<PolicyError>,
    },

    #[error("unable to parse marker: {0}")]
    ParseError(String),

    #[error("missing value for required flag [{0}]")]
    MissingFlag(String),

    #[error("missing directory path [{0}]")]
    MissingDirectory(String),

    #[error("invalid file path: [{0}]")]
    InvalidPath(String),

    #[error("cannot write file [{0}] - file already exists; use --force if you wish to overwrite")]
    FileExists(String),

    #[error("i/o error on [{path}]: {message}")]
    Io { path: String, message: String },

    #[error("unable to serialize [{0}]")]
    SerializeError(String),
}

impl PolicyError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        PolicyError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PolicyError {
    fn from(err: serde_json::Error) -> Self {
        PolicyError::SerializeError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_marker_wraps_source() {
        let err = PolicyError::InvalidMarker {
            text: "+policy-gen:aws:iam:policy:action=s3:*".to_string(),
            position: "main.rs:3".to_string(),
            source: Box::new(PolicyError::MissingName),
        };
        let display = err.to_string();
        assert!(display.contains("main.rs:3"));
        assert!(display.ends_with("marker missing name field"));
        assert_eq!(
            std::error::Error::source(&err).map(|e| e.to_string()),
            Some("marker missing name field".to_string())
        );
    }

    #[test]
    fn test_io_error_keeps_path() {
        let err = PolicyError::io(
            "/tmp/out/test.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(
            err,
            PolicyError::Io {
                path: "/tmp/out/test.json".to_string(),
                message: "denied".to_string(),
            }
        );
    }

    #[test]
    fn test_error_serialization() {
        let err = PolicyError::FileExists("out/test.json".to_string());
        let serialized = serde_json::to_value(&err).unwrap();
        let deserialized: PolicyError = serde_json::from_value(serialized).unwrap();
        assert_eq!(err, deserialized);
    }
}
