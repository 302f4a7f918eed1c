use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use pylonmap_cli::{load_config, Cli, Commands, ConfigCommands, LoadedConfig};

mod commands;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // `config init` must work even when the existing file is broken.
    let resetting = matches!(
        cli.command,
        Commands::Config {
            command: ConfigCommands::Init { .. }
        }
    );
    let loaded = match load_config(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(_) if resetting => LoadedConfig::default(),
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::from(2);
        }
    };

    let level = cli
        .log_level
        .or_else(|| loaded.config.logging.tracing_level())
        .unwrap_or(tracing::Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Some(path) = &loaded.source {
        info!("Using configuration from {}", path.display());
    }

    let result = match &cli.command {
        Commands::Convert(args) => commands::convert::handle(args, &loaded.config),
        Commands::Inspect(args) => commands::inspect::handle(args, &loaded.config),
        Commands::Config { command } => commands::config::handle(command, &loaded),
        Commands::Completions { shell, out } => {
            commands::completions::handle(*shell, out.as_deref())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
