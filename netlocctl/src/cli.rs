use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(short, long, help = "Path to the configuration file")]
    pub config: Option<PathBuf>,
    #[arg(long, help = "Path to the default database (overrides the config file)")]
    pub default_database: Option<PathBuf>,
    #[arg(
        long,
        help = "Path to the network location database (overrides the config file)"
    )]
    pub network_location_database: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Move network locations into the dedicated network location database")]
    Migrate,
    #[command(about = "Show whether network locations still need to be migrated")]
    Status,
    #[command(about = "List network locations")]
    List {
        #[arg(short, long, value_enum, default_value_t = Source::NetworkLocation)]
        source: Source,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum Source {
    /// the general-purpose default database
    Default,
    /// the dedicated network location database
    NetworkLocation,
}
