//! Tab-separated file plumbing shared by the loaders and the exporter.
//!
//! Every input and output uses a bare tab delimiter with no quoting, and
//! rows may carry any number of fields.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{QuoteStyle, Reader, ReaderBuilder, StringRecord, Writer, WriterBuilder};

use crate::error::PipelineError;

pub fn reader<R: Read>(input: R, has_header: bool) -> Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_header)
        .quoting(false)
        .flexible(true)
        .from_reader(input)
}

pub fn writer<W: Write>(output: W) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .flexible(true)
        .from_writer(output)
}

pub fn writer_from_path(path: &Path) -> Result<Writer<File>, PipelineError> {
    let file = File::create(path)?;
    Ok(writer(file))
}

/// Returns the trimmed field at `index`, or a format error naming `what`.
pub fn field<'r>(
    record: &'r StringRecord,
    index: usize,
    what: &str,
    source_name: &str,
) -> Result<&'r str, PipelineError> {
    record.get(index).map(str::trim).ok_or_else(|| {
        PipelineError::format(
            source_name,
            format!("missing {} (column {}) in row {:?}", what, index, record.as_slice()),
        )
    })
}

/// Parses the field at `index`.
pub fn parse_field<T: std::str::FromStr>(
    record: &StringRecord,
    index: usize,
    what: &str,
    source_name: &str,
) -> Result<T, PipelineError> {
    let raw = field(record, index, what, source_name)?;
    raw.parse::<T>()
        .map_err(|_| PipelineError::format(source_name, format!("invalid {} '{}'", what, raw)))
}

/// Replaces tabs and line breaks so free text stays on one row.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => ' ',
            c => c,
        })
        .collect()
}
