pub mod rename;
pub mod version;

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

/// Write a pretty-printed JSON document to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{json}");
    Ok(())
}
