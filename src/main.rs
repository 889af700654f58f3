use anyhow::Result;
use clap::Parser;
use meetups::{
    api::{translator, ErrorTranslator},
    cli::{handle_catalog_command, handle_translate_command, Cli, CliCommand},
    config::Config,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if !translator::install(ErrorTranslator::from_config(&config.translator)) {
        debug!("Error translator was already installed");
    }

    match cli.command {
        CliCommand::Catalog(args) => handle_catalog_command(args),
        CliCommand::Translate(args) => handle_translate_command(args, &config),
        CliCommand::Version => {
            println!("meetups {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
