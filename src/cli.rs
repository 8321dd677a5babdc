//! Command line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::error::PolicyError;

#[derive(Debug, Parser)]
#[command(name = "policy-gen")]
#[command(about = "Generate cloud access policies from markers in source comments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate AWS IAM policy documents
    Aws(AwsArgs),
    /// Print the version and exit
    Version,
}

#[derive(Debug, Clone, Args)]
pub struct AwsArgs {
    /// Directory scanned for markers
    #[arg(short = 'i', long, default_value = "./")]
    pub input_path: PathBuf,

    /// Directory policy files are written to
    #[arg(short = 'o', long, default_value = "./")]
    pub output_path: PathBuf,

    /// Markdown file documenting every marker
    #[arg(short = 'd', long)]
    pub documentation: Option<PathBuf>,

    /// Scan subdirectories of the input directory
    #[arg(short = 'r', long)]
    pub recursive: bool,

    /// Overwrite existing output files
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl AwsArgs {
    pub fn into_config(self) -> Result<Config, PolicyError> {
        Ok(
            Config::new(&self.input_path, &self.output_path, self.documentation.as_deref())?
                .with_recursive(self.recursive)
                .with_force(self.force),
        )
    }
}
