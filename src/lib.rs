// src/lib.rs
pub use builder::{MarkerGroups, PolicyFile, build_documents};
pub use config::Config;
pub use error::PolicyError;
pub use processor::{ProcessSummary, Processor};
pub use scanner::{Position, ScanResult, Scanner};
pub use types::{Condition, Effect, Marker, PolicyDocument, PolicyMarker, Provider, Statement};

pub mod builder;
pub mod cli;
pub mod config;
pub mod docs;
mod error;
pub mod files;
pub mod processor;
pub mod scanner;
pub mod timers;
pub mod traits;
pub mod types;

#[cfg(test)]
mod tests;
