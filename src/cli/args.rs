use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "meetups")]
#[command(about = "Inspect and exercise the meetups API error boundary", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// List every failure kind with its code and HTTP status
    Catalog(CatalogCliArgs),
    /// Translate a failure described as JSON into the API error response
    Translate(TranslateCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct CatalogCliArgs {
    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug)]
pub struct TranslateCliArgs {
    /// File holding the failure JSON (reads stdin when omitted)
    pub file: Option<PathBuf>,
    /// Trim trailing separators from messages regardless of config
    #[arg(long)]
    pub clean: bool,
}
