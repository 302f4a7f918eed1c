pub mod cli;
pub mod config;

pub use cli::{
    build_cli_command, Cli, Commands, ConfigCommands, ConvertArgs, InspectArgs, OutputFormat,
    SchemaChoice,
};
pub use config::{load_config, LoadedConfig, PylonmapConfig};
