//! CLI handler for listing the failure catalog.

use crate::api::ErrorCode;
use anyhow::Result;
use serde::Serialize;

use super::args::CatalogCliArgs;

/// One row of the translation table.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub kind: &'static str,
    pub code: i32,
    pub status: u16,
    pub message: &'static str,
}

pub fn catalog() -> Vec<CatalogEntry> {
    ErrorCode::ALL
        .into_iter()
        .map(|code| CatalogEntry {
            kind: code.kind(),
            code: code.as_i32(),
            status: code.status().as_u16(),
            message: code.template(),
        })
        .collect()
}

pub fn handle_catalog_command(args: CatalogCliArgs) -> Result<()> {
    let entries = catalog();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{:<24} {:<6} {:<7} MESSAGE", "KIND", "CODE", "STATUS");
    for entry in &entries {
        println!(
            "{:<24} {:<6} {:<7} {}",
            entry.kind, entry.code, entry.status, entry.message
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_code() {
        let entries = catalog();
        assert_eq!(entries.len(), ErrorCode::ALL.len());
        assert!(entries
            .iter()
            .any(|e| e.kind == "duplicate_entity" && e.status == 409));
    }
}
