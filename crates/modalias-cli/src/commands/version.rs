use miette::{IntoDiagnostic, Result};
use modalias_core::version::{version_string, SCHEMA_VERSION};
use modalias_core::VERSION;

pub fn run(json: bool) -> Result<()> {
    if json {
        let out = serde_json::json!({
            "version": VERSION,
            "schema_version": SCHEMA_VERSION,
        });
        println!("{}", serde_json::to_string_pretty(&out).into_diagnostic()?);
    } else {
        println!("{}", version_string());
    }
    Ok(())
}
