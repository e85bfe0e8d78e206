#![warn(clippy::all, rust_2018_idioms)]

mod raw_data;
pub mod reader;
pub mod segment;
pub mod signs;
pub mod table;

pub use segment::Segment;
pub use signs::{Descriptor, IpaSign, SignKind};
pub use table::{ipa_table, IpaTable};

use thiserror::Error;

/// Everything that can go wrong while loading an IPA data resource.
///
/// All of these abort the load; a table is never returned half built.
#[derive(Debug, Error)]
pub enum IpaError {
    #[error("Data file '{path}' could not be read: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Data file '{path}' could not be split into fields: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Data file '{path}' contains a bad line {line} (expected {expected} fields, found {found}): '{content}'")]
    MalformedRow {
        path: String,
        line: usize,
        expected: usize,
        found: usize,
        content: String,
    },

    #[error("Data file '{path}' contains a bad line {line}, defining an unknown type '{kind}': '{content}'")]
    UnknownType {
        path: String,
        line: usize,
        kind: String,
        content: String,
    },

    #[error("Data file '{path}' contains a bad line {line}, redefining codepoint '{codepoint}': '{content}'")]
    DuplicateCodepoint {
        path: String,
        line: usize,
        codepoint: String,
        content: String,
    },

    #[error("Data file '{path}' contains a bad line {line}, with invalid codepoint '{codepoint}': '{content}'")]
    InvalidCodepoint {
        path: String,
        line: usize,
        codepoint: String,
        content: String,
    },

    /// A sign constructor could not make sense of its properties string.
    #[error("Cannot build a {kind} from '{properties}': {reason}")]
    InvalidProperties {
        kind: SignKind,
        properties: String,
        reason: String,
    },

    #[error("Data file '{path}' contains a bad line {line} ({source}): '{content}'")]
    InvalidSign {
        path: String,
        line: usize,
        content: String,
        #[source]
        source: Box<IpaError>,
    },
}

pub type IpaResult<T> = Result<T, IpaError>;
