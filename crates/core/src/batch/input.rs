//! Input table reading.

use std::io::Read;
use std::path::Path;

use crate::pipeline::StreamEntry;

use super::error::InputError;

/// Reads every entry of the CSV file at `path`.
///
/// See [`parse_entries`] for the expected layout.
pub fn read_entries(path: &Path) -> Result<Vec<StreamEntry>, InputError> {
    let file = std::fs::File::open(path).map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_entries(file)
}

/// Parses CSV rows into entries.
///
/// The first record is a header and is always skipped, whatever it
/// contains. Fields are positional: identifier, title, source URL. Extra
/// fields are ignored and surrounding whitespace is trimmed.
pub fn parse_entries<R: Read>(reader: R) -> Result<Vec<StreamEntry>, InputError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let field = |idx: usize, name: &'static str| {
            record
                .get(idx)
                .map(str::to_string)
                .ok_or(InputError::MissingField { line, field: name })
        };

        entries.push(StreamEntry {
            id: field(0, "id")?,
            title: field(1, "title")?,
            url: field(2, "url")?,
        });
    }

    Ok(entries)
}
