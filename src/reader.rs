//! Reader for the line oriented, comma separated data resources.
//!
//! Lines are trimmed, blank lines and lines starting with [`COMMENT_MARKER`]
//! are dropped, and everything else is split on [`FIELD_SEPARATOR`]. There
//! is no quoting: a comma always separates two fields. `\n`, `\r\n` and a
//! lone `\r` all end a line.

use crate::{IpaError, IpaResult};
use log::debug;
use std::fs::File;
use std::io;
use std::path::Path;

pub const FIELD_SEPARATOR: u8 = b',';
pub const COMMENT_MARKER: char = '#';

/// One data line, split into fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based line number in the resource.
    pub line: usize,
    /// The trimmed line as it appears in the resource.
    pub content: String,
    pub fields: Vec<String>,
}

impl Row {
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Reads every data line of `input`.
///
/// `source` names the resource in error messages. When `expected_fields` is
/// given, the first line with a different number of fields fails the read.
pub fn read_rows<R: io::Read>(
    source: &str,
    mut input: R,
    expected_fields: Option<usize>,
) -> IpaResult<Vec<Row>> {
    let mut text = String::new();
    input.read_to_string(&mut text).map_err(|e| IpaError::Io {
        path: source.to_string(),
        source: e,
    })?;

    let mut splitter = csv::ReaderBuilder::new();
    splitter
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(FIELD_SEPARATOR);

    let mut rows = vec![];
    for (index, line) in lines(&text).enumerate() {
        let content = line.trim();
        if content.is_empty() || content.starts_with(COMMENT_MARKER) {
            continue;
        }
        // A line holds no line break, so it is at most one record.
        let fields = match splitter.from_reader(content.as_bytes()).into_records().next() {
            Some(record) => record
                .map_err(|e| IpaError::Csv {
                    path: source.to_string(),
                    source: e,
                })?
                .iter()
                .map(str::to_string)
                .collect::<Vec<_>>(),
            None => vec![],
        };
        if let Some(expected) = expected_fields {
            if fields.len() != expected {
                return Err(IpaError::MalformedRow {
                    path: source.to_string(),
                    line: index + 1,
                    expected,
                    found: fields.len(),
                    content: content.to_string(),
                });
            }
        }
        rows.push(Row {
            line: index + 1,
            content: content.to_string(),
            fields,
        });
    }
    debug!("read {} rows from '{}'", rows.len(), source);
    Ok(rows)
}

/// Splits on `\n`, `\r\n` and a lone `\r` alike.
fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

pub fn read_rows_from_path<P: AsRef<Path>>(
    path: P,
    expected_fields: Option<usize>,
) -> IpaResult<Vec<Row>> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let file = File::open(path).map_err(|e| IpaError::Io {
        path: source.clone(),
        source: e,
    })?;
    read_rows(&source, file, expected_fields)
}
