//! tavily-tools CLI entry point.

use clap::Parser;
use tavily_tools::cli::{Cli, execute};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // stdout carries command output and the MCP stdio protocol
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "info" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match execute(&cli) {
        Ok(output) => {
            if !output.is_empty() {
                #[allow(clippy::print_stdout)]
                {
                    println!("{output}");
                }
            }
        }
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Error: {e}");
            }
            std::process::exit(1);
        }
    }
}
