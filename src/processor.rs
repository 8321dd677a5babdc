//! The batch pipeline: scan the input directory, validate markers, build one
//! policy document per file key and write the results.
//!
//! Every document is built and every output target is checked before the
//! first file is written.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::builder::{MarkerGroups, PolicyFile, build_documents};
use crate::config::Config;
use crate::docs;
use crate::error::PolicyError;
use crate::files::{
    MODE_DOCUMENTATION_FILE, MODE_POLICY_FILE, ensure_writable, policy_file_path, read_text,
    write_file, write_json,
};
use crate::scanner::{ScanResult, Scanner};
use crate::timers::{PhaseTimer, PhaseTimings};
use crate::types::{PolicyMarker, Provider};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSummary {
    pub markers: usize,
    pub policy_files: Vec<PathBuf>,
    pub documentation_file: Option<PathBuf>,
    pub timings: PhaseTimings,
}

#[derive(Debug, Clone)]
pub struct Processor {
    config: Config,
    scanner: Scanner,
}

impl Processor {
    pub fn new(config: Config, provider: Provider) -> Self {
        Processor {
            config,
            scanner: Scanner::new(provider),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scan every input file for markers. Files that are not UTF-8 text
    /// are skipped.
    pub fn parse(&self) -> Result<Vec<ScanResult>, PolicyError> {
        let definition = self.scanner.provider().definition();
        info!(
            event = "Parse",
            phase = "Collect",
            definition = definition.as_str(),
            input = %self.config.input_directory.path().display(),
            recursive = self.config.recursive
        );

        let paths = self
            .config
            .input_directory
            .list_file_paths(self.config.recursive)?;

        let mut results = Vec::new();
        for path in &paths {
            let Some(content) = read_text(path)? else {
                debug!(event = "Parse", phase = "Skip", path = %path.display());
                continue;
            };
            results.extend(self.scanner.scan(path, &content)?);
        }

        if results.is_empty() {
            warn!(
                event = "Parse",
                phase = "Result",
                definition = definition.as_str(),
                files = paths.len(),
                "no markers found"
            );
        } else {
            info!(
                event = "Parse",
                phase = "Result",
                files = paths.len(),
                markers = results.len()
            );
        }

        Ok(results)
    }

    /// Validate every scanned marker, in input order. The first invalid
    /// marker fails the run with its text and position attached.
    pub fn find_markers(results: &[ScanResult]) -> Result<Vec<PolicyMarker>, PolicyError> {
        results
            .iter()
            .map(|result| {
                result
                    .marker
                    .validate()
                    .map(|()| result.marker.clone())
                    .map_err(|source| PolicyError::InvalidMarker {
                        text: result.marker_text.clone(),
                        position: result.position.to_string(),
                        source: Box::new(source),
                    })
            })
            .collect()
    }

    pub fn process(&self) -> Result<ProcessSummary, PolicyError> {
        let mut timings = PhaseTimings::default();

        let results = {
            let _timer = PhaseTimer::new(&mut timings.scan);
            self.parse()?
        };

        let (markers, policy_files) = {
            let _timer = PhaseTimer::new(&mut timings.build);
            let markers = Self::find_markers(&results)?;
            let groups = MarkerGroups::from_markers(&markers);
            let policy_files = build_documents(&groups)?;
            (markers, policy_files)
        };

        let written = {
            let _timer = PhaseTimer::new(&mut timings.write);
            self.write(&markers, &policy_files)?
        };

        debug!(
            event = "Process",
            phase = "Timings",
            scan_us = timings.scan.as_micros() as u64,
            build_us = timings.build.as_micros() as u64,
            write_us = timings.write.as_micros() as u64,
            total_us = timings.total().as_micros() as u64
        );

        Ok(ProcessSummary {
            markers: markers.len(),
            policy_files: written,
            documentation_file: self.config.documentation_file.clone(),
            timings,
        })
    }

    fn write(
        &self,
        markers: &[PolicyMarker],
        policy_files: &[PolicyFile],
    ) -> Result<Vec<PathBuf>, PolicyError> {
        let force = self.config.force;
        let targets: Vec<PathBuf> = policy_files
            .iter()
            .map(|file| policy_file_path(&self.config.output_directory, &file.name))
            .collect();

        for path in targets.iter().chain(self.config.documentation_file.iter()) {
            ensure_writable(path, force)?;
        }

        for (path, file) in targets.iter().zip(policy_files) {
            info!(event = "Write", phase = "Policy", path = %path.display());
            write_json(path, &file.document, MODE_POLICY_FILE, force)?;
        }

        if let Some(path) = &self.config.documentation_file {
            info!(event = "Write", phase = "Documentation", path = %path.display());
            let rendered = docs::render(markers);
            write_file(path, rendered.as_bytes(), MODE_DOCUMENTATION_FILE, force)?;
        }

        Ok(targets)
    }
}
