use clap::Parser;
use structgen::cli::{run_cli, Cli};
use structgen::logging::{init_logging_with_config, LogConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if let Some(level) = cli.log_level() {
        log_config.log_level = level.to_string();
    }
    init_logging_with_config(&log_config)?;

    run_cli(cli)
}
