use clap::Parser;
use oddsedge::cli::{check, run, scan, settle, stats, CheckCommand, Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Scan(args) => scan::execute(args).await,
        Commands::Stats(args) => stats::execute(args).await,
        Commands::Settle(args) => settle::execute(args).await,
        Commands::Check(CheckCommand::Config(args)) => check::execute_config(&args.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
