//! Validated run configuration.

use std::path::{Path, PathBuf};

use crate::error::PolicyError;
use crate::files::{Directory, documentation_file_path};

pub const FLAG_INPUT_PATH: &str = "input-path";
pub const FLAG_OUTPUT_PATH: &str = "output-path";
pub const FLAG_DOCUMENTATION: &str = "documentation";

/// Everything a processing run needs. Paths have already been checked:
/// both directories exist and the documentation file's parent exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_directory: Directory,
    pub output_directory: Directory,
    pub documentation_file: Option<PathBuf>,
    pub recursive: bool,
    pub force: bool,
}

impl Config {
    pub fn new(
        input_path: impl AsRef<Path>,
        output_path: impl AsRef<Path>,
        documentation: Option<&Path>,
    ) -> Result<Self, PolicyError> {
        let input_directory = Directory::existing(required(input_path.as_ref(), FLAG_INPUT_PATH)?)?;
        let output_directory =
            Directory::existing(required(output_path.as_ref(), FLAG_OUTPUT_PATH)?)?;
        let documentation_file = documentation
            .map(|path| documentation_file_path(required(path, FLAG_DOCUMENTATION)?))
            .transpose()?;

        Ok(Config {
            input_directory,
            output_directory,
            documentation_file,
            recursive: false,
            force: false,
        })
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

fn required<'a>(path: &'a Path, flag: &str) -> Result<&'a Path, PolicyError> {
    if path.as_os_str().is_empty() {
        return Err(PolicyError::MissingFlag(flag.to_string()));
    }
    Ok(path)
}
