//! `modalias list` command implementation.

use crate::aliases::{self, AliasArgs};
use miette::{IntoDiagnostic, Result};
use modalias_core::version::SCHEMA_VERSION;
use modalias_core::{AliasResolver, Config};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ListOutput {
    schema_version: u32,
    config: Option<String>,
    aliases: Vec<AliasEntry>,
}

#[derive(Debug, Serialize)]
struct AliasEntry {
    /// 1-based match priority.
    priority: usize,
    key: String,
    target: String,
}

/// Print the alias table in the order aliases are tried.
pub fn run(config: &Config, args: &AliasArgs, json: bool) -> Result<()> {
    let loaded = aliases::load(config, args)?;
    // Validate exactly as registration would, so bad keys fail here too.
    let resolver = AliasResolver::with_aliases(loaded.aliases).into_diagnostic()?;

    let output = ListOutput {
        schema_version: SCHEMA_VERSION,
        config: loaded
            .source
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        aliases: resolver
            .table()
            .iter()
            .enumerate()
            .map(|(i, (key, target))| AliasEntry {
                priority: i + 1,
                key: key.to_string(),
                target: target.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        return Ok(());
    }

    match &output.config {
        Some(path) => println!("Config: {path}"),
        None => println!("Config: (none)"),
    }
    if output.aliases.is_empty() {
        println!("No aliases registered.");
        return Ok(());
    }
    for entry in &output.aliases {
        println!("{:>3}. {} -> {}", entry.priority, entry.key, entry.target);
    }
    Ok(())
}
