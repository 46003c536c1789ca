use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

/// Delimiter layout of a text table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma separated
    Csv,
    /// Tab separated, empty fields are nulls
    Tab,
    /// Columns separated by runs of spaces or tabs
    Whitespace,
}

impl TableFormat {
    /// Pick the layout from the file extension, falling back to the header
    /// line: a header containing a tab means tab separated.
    pub fn detect(path: &Path, text: &str) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        match extension.as_deref() {
            Some("csv") => TableFormat::Csv,
            Some("tsv") => TableFormat::Tab,
            _ => {
                let header = text.lines().find(|line| !is_skipped(line)).unwrap_or("");
                if header.contains('\t') {
                    TableFormat::Tab
                } else {
                    TableFormat::Whitespace
                }
            }
        }
    }
}

fn is_skipped(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Rewrite a whitespace-aligned table as a tab-separated one.
///
/// Blank lines and `#` comment lines are removed, and every run of spaces or
/// tabs becomes a single tab.
pub fn normalize_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for line in text.lines().filter(|line| !is_skipped(line)) {
        let mut fields = line.split_whitespace();
        if let Some(first) = fields.next() {
            normalized.push_str(first);
            for field in fields {
                normalized.push('\t');
                normalized.push_str(field);
            }
            normalized.push('\n');
        }
    }
    normalized
}

/// Parse delimited text into a DataFrame, inferring column types from every row.
pub fn read_delimited_str(text: &str, separator: u8, has_header: bool) -> PolarsResult<DataFrame> {
    let cursor = Cursor::new(text.as_bytes().to_vec());
    CsvReadOptions::default()
        .with_has_header(has_header)
        .with_infer_schema_length(None)
        .map_parse_options(|opts| opts.with_separator(separator))
        .into_reader_with_file_handle(cursor)
        .finish()
}

/// Parse a text table in the given layout into a DataFrame.
pub fn read_table_str(text: &str, format: TableFormat, has_header: bool) -> PolarsResult<DataFrame> {
    match format {
        TableFormat::Csv => read_delimited_str(text, b',', has_header),
        TableFormat::Tab => read_delimited_str(text, b'\t', has_header),
        TableFormat::Whitespace => read_delimited_str(&normalize_whitespace(text), b'\t', has_header),
    }
}
