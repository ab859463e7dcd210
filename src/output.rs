use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use url::Url;

/// Output directory must already exist; it is never created implicitly.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        bail!("{} does not exist or is not a directory", path.display());
    }
    Ok(())
}

/// `<host>.json`, or `<host>:<port>.json` when the URL carries an explicit
/// non-default port. Scheme and path never make it into the name, so two
/// targets on the same host overwrite each other.
pub fn schema_file_name(url: &Url) -> String {
    let host = url.host_str().unwrap_or("unknown");
    match url.port() {
        Some(port) => format!("{}:{}.json", host, port),
        None => format!("{}.json", host),
    }
}

pub fn schema_path(output_dir: &Path, url: &Url) -> PathBuf {
    output_dir.join(schema_file_name(url))
}

// Compact JSON except for a space after each key separator.
struct SchemaFormatter;

impl serde_json::ser::Formatter for SchemaFormatter {
    fn begin_object_value<W>(&mut self, writer: &mut W) -> std::io::Result<()>
    where
        W: ?Sized + std::io::Write,
    {
        writer.write_all(b": ")
    }
}

fn schema_json(schema: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SchemaFormatter);
    schema
        .serialize(&mut ser)
        .context("Failed to serialize schema")?;
    Ok(buf)
}

pub fn write_schema(path: &Path, schema: &Value) -> Result<()> {
    let bytes = schema_json(schema)?;
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
