//! JSON rendering for document outlines.

use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::DocumentOutline;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON.
pub fn to_json(outline: &DocumentOutline, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(outline),
        JsonFormat::Compact => serde_json::to_string(outline),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Write an outline as JSON, followed by a newline.
pub fn write_json<W: Write>(outline: &DocumentOutline, format: JsonFormat, mut writer: W) -> Result<()> {
    let json = to_json(outline, format)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write an outline to a JSON file, replacing any existing file.
pub fn write_json_file<P: AsRef<Path>>(outline: &DocumentOutline, format: JsonFormat, path: P) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_json(outline, format, std::io::BufWriter::new(file))
}
