//! `modalias resolve` command implementation.
//!
//! Installs the alias table in front of a lexical [`MemoryLoader`] rooted at
//! the working directory and resolves each request through it, the same way a
//! host runtime would see them.

use crate::aliases::{self, AliasArgs};
use miette::{IntoDiagnostic, Result};
use modalias_core::version::SCHEMA_VERSION;
use modalias_core::{AliasMatch, AliasRegister, Config, LoadContext, MemoryLoader};
use serde::Serialize;
use std::path::Path;

/// Exit code when at least one request failed to resolve.
const EXIT_RESOLVE_FAILED: i32 = 1;

#[derive(Debug, Serialize)]
struct ResolveOutput {
    schema_version: u32,
    config: Option<String>,
    results: Vec<ResolvedRequest>,
}

#[derive(Debug, Serialize)]
struct ResolvedRequest {
    request: String,
    /// Alias that covered the request, if any.
    alias: Option<AliasMatch>,
    /// Request as handed to the loader after alias substitution.
    rewritten: String,
    resolved: Option<String>,
    error: Option<String>,
}

/// Run the resolve command.
pub fn run(
    config: &Config,
    args: &AliasArgs,
    requests: &[String],
    from: Option<&Path>,
    json: bool,
) -> Result<()> {
    let loaded = aliases::load(config, args)?;

    let mut host = MemoryLoader::new(config.cwd.clone());
    let mut register = AliasRegister::new();
    register
        .start(&mut host, Some(loaded.aliases))
        .into_diagnostic()?;

    let ctx = match from {
        Some(dir) if dir.is_absolute() => LoadContext::from_parent(dir),
        Some(dir) => LoadContext::from_parent(config.cwd.join(dir)),
        None => LoadContext::default(),
    };

    let results: Vec<ResolvedRequest> = requests
        .iter()
        .map(|request| {
            let alias = register.lookup(request);
            let rewritten = alias
                .as_ref()
                .map_or_else(|| request.clone(), |m| m.rewritten.clone());
            let (resolved, error) = match host.resolve(request, &ctx, false) {
                Ok(path) => (Some(path.to_string_lossy().into_owned()), None),
                Err(e) => (None, Some(e.to_string())),
            };
            ResolvedRequest {
                request: request.clone(),
                alias,
                rewritten,
                resolved,
                error,
            }
        })
        .collect();

    register.stop(&mut host);

    let output = ResolveOutput {
        schema_version: SCHEMA_VERSION,
        config: loaded
            .source
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned()),
        results,
    };

    let failed = output.results.iter().any(|r| r.error.is_some());

    if json {
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        print_human(&output);
    }

    if failed {
        std::process::exit(EXIT_RESOLVE_FAILED);
    }
    Ok(())
}

fn print_human(output: &ResolveOutput) {
    for r in &output.results {
        let via = r
            .alias
            .as_ref()
            .map(|m| format!(" (via {} -> {})", m.key, m.target))
            .unwrap_or_default();

        match (&r.resolved, &r.error) {
            (Some(path), _) if r.rewritten == r.request => {
                println!("{} -> {}", r.request, path);
            }
            (Some(path), _) => {
                println!("{} -> {}{} -> {}", r.request, r.rewritten, via, path);
            }
            (None, Some(err)) => {
                eprintln!("error: {}: {}", display_request(&r.request), err);
            }
            (None, None) => {}
        }
    }
}

fn display_request(request: &str) -> &str {
    if request.is_empty() {
        "(empty request)"
    } else {
        request
    }
}
