//! Facet query XML codec.
//!
//! - **Writer** ([`xml`]): the compact, deterministic form sent to the
//!   facet service and stored by clients.
//! - **Reader** ([`reader`]): ingests that form and the looser variants
//!   written by older clients.
//!
//! For every tree built through the mutators, `to_xml(from_xml(to_xml(t)))`
//! is byte-identical to `to_xml(t)`.

pub mod reader;
pub mod xml;

use crate::error::Result;
use crate::tree::QueryTree;

impl QueryTree {
    /// Parses facet query XML. See [`reader::from_xml`].
    ///
    /// # Errors
    ///
    /// As [`reader::from_xml`].
    pub fn from_xml(source: &str) -> Result<Self> {
        reader::from_xml(source)
    }

    /// Serializes the tree. See [`xml::to_xml`].
    #[must_use]
    pub fn to_xml(&self) -> String {
        xml::to_xml(self)
    }
}

impl std::str::FromStr for QueryTree {
    type Err = crate::error::FacetError;

    fn from_str(source: &str) -> Result<Self> {
        reader::from_xml(source)
    }
}
