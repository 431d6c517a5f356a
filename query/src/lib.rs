//! Facet query trees for the OpenLink facet service.
//!
//! The `fct-query` crate models a facet query as a typed tree rooted at a
//! `<query>` element. Every `<property>` and `<property-of>` edge opens an
//! implicit subject variable (`?s1` for the root, then `?s2`, `?s3`, … in
//! document order), and a single `<view>` node marks which subject is
//! returned. On top of the tree the crate provides:
//!
//! - subject numbering and focus movement ([`QueryTree::subject_count`],
//!   [`QueryTree::set_focus`]);
//! - structural edits that keep those invariants ([`QueryTree::add_property`],
//!   [`QueryTree::remove_filter`], …);
//! - an ordered list of SPARQL-like filter descriptors
//!   ([`QueryTree::filter_descriptors`]);
//! - a lossless XML codec ([`serializer`]) and the request/response types of
//!   the facet service ([`service`]).
//!
//! # Entry Point
//!
//! ```
//! use fct_query::{PropertyOptions, QueryTree};
//!
//! let mut tree = QueryTree::new();
//! tree.add_class("http://schema.org/Business", None)?;
//! let offer = tree.add_property("http://schema.org/makesOffer", 1, PropertyOptions::default())?;
//! assert_eq!(offer, 2);
//!
//! let filters = tree.filter_descriptors();
//! assert_eq!(filters.descriptors[0].to_string(), "?s1 is a <http://schema.org/Business>");
//! assert_eq!(filters.descriptors[1].to_string(), "?s1 <http://schema.org/makesOffer> ?s2");
//! # Ok::<(), fct_query::FacetError>(())
//! ```
//!
//! # Serialization
//!
//! ```
//! let tree = fct_query::QueryTree::new();
//! let xml = tree.to_xml();
//! assert_eq!(fct_query::QueryTree::from_xml(&xml)?.to_xml(), xml);
//! # Ok::<(), fct_query::FacetError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

mod accessors;
pub mod config;
pub mod error;
pub mod filter;
mod focus;
pub mod literal;
pub mod model;
mod mutate;
pub mod serializer;
pub mod service;
mod subject;
pub mod tree;

pub use config::FacetConfig;
pub use error::{FacetError, Result};
pub use filter::{FilterAction, FilterDescriptor, FilterSet, Term, TermKind, UnhandledConstruct};
pub use model::{
    ClassNode, CondNode, CondType, Node, NodeId, NodeKind, OpaqueNode, PropertyNode, QueryNode,
    TextNode, ValueNode, ViewKind, ViewNode,
};
pub use mutate::PropertyOptions;
pub use service::{FacetRequest, FacetResponse, QueryService, ServiceError};
pub use tree::QueryTree;
