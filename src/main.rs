use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use policy_gen::cli::{Cli, Command};
use policy_gen::{Processor, Provider};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Command::Aws(args) => {
            let log_level = if args.debug { "debug" } else { "info" };
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
            tracing_subscriber::fmt().with_env_filter(filter).init();

            let config = args.into_config()?;
            let summary = Processor::new(config, Provider::Aws).process()?;
            info!(
                event = "Process",
                phase = "Done",
                markers = summary.markers,
                policy_files = summary.policy_files.len(),
                elapsed_ms = summary.timings.total().as_millis() as u64
            );
        }
    }

    Ok(())
}
