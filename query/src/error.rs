//! Error type shared by every facet query operation.

use std::path::PathBuf;

/// Failures raised by tree edits, traversals, and the XML codec.
///
/// Unhandled constructs met during filter generation are not errors; see
/// [`UnhandledConstruct`](crate::filter::UnhandledConstruct).
#[derive(Debug, thiserror::Error)]
pub enum FacetError {
    /// An index, position, or subject bound was violated.
    #[error("{what} ({value}) out of range ({min}..={max})")]
    OutOfRange {
        /// What was being indexed (e.g. `"subject index"`).
        what: &'static str,
        /// The offending value.
        value: usize,
        /// Smallest valid value.
        min: usize,
        /// Largest valid value.
        max: usize,
    },

    /// A node the operation depends on (the view or the query root) is absent.
    #[error("the facet query does not include a <{0}> element")]
    MissingRequiredNode(&'static str),

    /// A mutator was given malformed input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A serialized tree could not be interpreted.
    #[error("malformed facet query XML: {0}")]
    Parse(String),

    /// The XML tokenizer rejected the input.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A configuration document could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },
}

impl From<quick_xml::events::attributes::AttrError> for FacetError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        FacetError::Xml(quick_xml::Error::InvalidAttr(err))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FacetError>;

impl FacetError {
    pub(crate) fn subject_out_of_range(value: usize, max: usize) -> Self {
        FacetError::OutOfRange {
            what: "subject index",
            value,
            min: 1,
            max,
        }
    }
}
