//! Alias sources shared by the `resolve` and `list` commands.

use miette::{IntoDiagnostic, Result};
use modalias_core::{load_alias_file, AliasMap, Config};
use std::path::PathBuf;

/// Where aliases come from: a config file (explicit or discovered) plus
/// `--alias` overrides, which win on key collisions.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct AliasArgs {
    /// Add an alias (repeatable), e.g. `--alias @app/*=./src`
    #[arg(long = "alias", value_name = "KEY=TARGET", value_parser = parse_alias)]
    pub aliases: Vec<(String, String)>,

    /// Alias config file (tsconfig.json, jsconfig.json or modalias.json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Do not search for an alias config file
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,
}

/// Aliases collected for a command, with the config file they came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedAliases {
    pub source: Option<PathBuf>,
    pub aliases: AliasMap,
}

/// Load the config file chosen by `config` and apply `--alias` overrides.
pub fn load(config: &Config, args: &AliasArgs) -> Result<LoadedAliases> {
    let source = config.alias_config_path();
    let mut aliases = match &source {
        Some(path) => load_alias_file(path).into_diagnostic()?,
        None => AliasMap::new(),
    };

    if let Some(ref path) = source {
        tracing::debug!(path = %path.display(), count = aliases.len(), "alias config loaded");
    }

    aliases.extend(args.aliases.iter().cloned());
    Ok(LoadedAliases { source, aliases })
}

/// Parse a `KEY=TARGET` pair. The first `=` splits; the target may be empty.
fn parse_alias(raw: &str) -> Result<(String, String), String> {
    let (key, target) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=TARGET, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("alias key is empty in `{raw}`"));
    }
    Ok((key.to_string(), target.to_string()))
}
