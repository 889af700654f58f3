//! CLI handler for translating a failure read as JSON.

use crate::api::{ApiError, ErrorTranslator, Failure, MessageFormat};
use crate::config::Config;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Read;

use super::args::TranslateCliArgs;

#[derive(Debug, Serialize)]
pub struct TranslatedResponse {
    pub status: u16,
    pub body: ApiError,
}

pub fn translate_json(input: &str, translator: &ErrorTranslator) -> Result<TranslatedResponse> {
    let failure: Failure = serde_json::from_str(input).context("Failed to parse failure JSON")?;
    let (status, body) = translator.translate(&failure);
    Ok(TranslatedResponse {
        status: status.as_u16(),
        body,
    })
}

pub fn handle_translate_command(args: TranslateCliArgs, config: &Config) -> Result<()> {
    let input = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read failure JSON from stdin")?;
            buffer
        }
    };

    let translator = if args.clean {
        ErrorTranslator::new(MessageFormat::Clean)
    } else {
        ErrorTranslator::from_config(&config.translator)
    };

    let response = translate_json(&input, &translator)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
