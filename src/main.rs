use clap::Parser;
use colored::*;
use duplex::cli::{load_settings, log_level, Cli, Commands};
use duplex::DuplexError;
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<DuplexError>() {
            Some(DuplexError::Configuration(_)) => 2,
            Some(DuplexError::Io(_)) => 3,
            Some(err) if err.is_input_error() => 4,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_settings(cli.config.as_deref())?;
    duplex_core::init_logging(&log_level(cli.verbose, &config.logging.level));

    // Configure thread pool
    let num_threads = if cli.threads == 0 {
        num_cpus::get()
    } else {
        cli.threads
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;
    tracing::debug!("Using {} threads", num_threads);

    match cli.command {
        Commands::Align(args) => duplex::cli::commands::align::run(args, &config),
        Commands::Nucmer(args) => duplex::cli::commands::nucmer::run(args, &config),
    }
}
