mod archive;
mod cli;
mod commands;
mod error;
mod mcp;
mod naming;
mod pdf;
mod segment;
mod split;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Mcp => {
            mcp::run_server().await?;
        }
        Commands::Split {
            path,
            output_dir,
            mode,
            password,
            dry_run,
            zip,
        } => {
            let options = commands::split::SplitOptions {
                output_dir,
                mode,
                password,
                dry_run,
                zip,
            };
            commands::split::run(&path, &options)?;
        }
        Commands::Outline { path } => {
            commands::outline::run(&path)?;
        }
        Commands::Titles { path } => {
            commands::titles::run(&path)?;
        }
    }

    Ok(())
}

// Logs go to stderr so the MCP transport keeps stdout to itself.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
