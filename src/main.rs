//! Lipsync Layer CLI
//!
//! Command-line interface for the lipsync override layer generator.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{error, info};

use lipsync_layer::cli::{commands, Cli, Commands};
use lipsync_layer::LipsyncError;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Lipsync Layer v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Lipsync Layer v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    let result = match &cmd {
        Commands::Generate {
            controller,
            assets,
            avatar,
            bindings,
            config,
        } => commands::generate(controller, assets, avatar, bindings, config.as_deref()),
        Commands::Delete { controller } => commands::delete(controller),
        Commands::Inspect { controller } => commands::inspect(controller),
        Commands::InitConfig { path, force } => commands::init_config(path, *force),
        Commands::Verify { assets } => commands::verify(assets),
    };

    if let Err(err) = &result {
        report_failure(err);
    }

    result.with_context(|| format!("{:?} failed", cmd))
}

fn report_failure(err: &LipsyncError) {
    error!("[{}] {}", err.error_code(), err);
    for suggestion in err.recovery_suggestions() {
        error!("  - {}", suggestion);
    }
}
