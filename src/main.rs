//! Docsmith CLI entry point.

use clap::Parser;
use docsmith::cli::{self, Cli, Commands, EXIT_ERROR};
use log::LevelFilter;

fn main() {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let config = cli.config.as_deref();
    let result = match &cli.command {
        Commands::Functions(args) => cli::run_functions(args),
        Commands::Rewrite(args) => cli::run_rewrite(args),
        Commands::Apis(args) => cli::run_apis(args, config),
        Commands::Document(args) => cli::run_document(args, config),
        Commands::Annotate(args) => cli::run_annotate(args, config),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}
