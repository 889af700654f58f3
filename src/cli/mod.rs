pub mod args;
pub mod catalog;
pub mod translate;

pub use args::{CatalogCliArgs, Cli, CliCommand, TranslateCliArgs};
pub use catalog::handle_catalog_command;
pub use translate::handle_translate_command;
