//! Pipeline tests running the processor against temporary directories.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::Config;
use crate::error::PolicyError;
use crate::processor::{ProcessSummary, Processor};
use crate::types::Provider;


/// Input and output directories for one run. The input directory is
/// populated from `(relative path, content)` pairs.
pub(crate) struct Workspace {
    pub input: TempDir,
    pub output: TempDir,
}

impl Workspace {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let input = TempDir::new().unwrap();
        for (name, content) in files {
            let path = input.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        Workspace {
            input,
            output: TempDir::new().unwrap(),
        }
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output.path().join(name)
    }

    pub fn config(&self, documentation: Option<&Path>) -> Config {
        Config::new(self.input.path(), self.output.path(), documentation).unwrap()
    }

    pub fn run(&self, config: Config) -> Result<ProcessSummary, PolicyError> {
        Processor::new(config, Provider::Aws).process()
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.output_file(name)).unwrap()
    }
}
