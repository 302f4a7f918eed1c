use std::path::Path;

use anyhow::{bail, Result};

use pylonmap_cli::config::{default_config_path, render_config, save_config};
use pylonmap_cli::{ConfigCommands, LoadedConfig, PylonmapConfig};

pub fn handle(command: &ConfigCommands, loaded: &LoadedConfig) -> Result<()> {
    match command {
        ConfigCommands::Init { out, force } => init(out.as_deref(), *force),
        ConfigCommands::Show => show(loaded),
    }
}

fn init(out: Option<&Path>, force: bool) -> Result<()> {
    let path = match out {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };
    if path.exists() && !force {
        bail!(
            "Config file '{}' already exists; use --force to overwrite",
            path.display()
        );
    }
    save_config(&PylonmapConfig::default(), &path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn show(loaded: &LoadedConfig) -> Result<()> {
    match &loaded.source {
        Some(path) => println!("# loaded from {}", path.display()),
        None => println!("# built-in defaults"),
    }
    print!("{}", render_config(&loaded.config)?);
    Ok(())
}
