//! Shared plumbing of the facet query binaries: logging, configuration,
//! document loading and the edit commands of `fct-edit`.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use fct_query::{CondType, FacetConfig, PropertyOptions, QueryTree};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Loads `path` if given, otherwise the built-in defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid configuration.
pub fn load_config(path: Option<&Path>) -> Result<FacetConfig> {
    match path {
        Some(path) => FacetConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => Ok(FacetConfig::default()),
    }
}

/// Reads and ingests a stored facet query.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a facet query.
pub fn read_tree(path: &Path) -> Result<QueryTree> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    QueryTree::from_xml(&source).with_context(|| format!("Failed to parse {}", path.display()))
}

fn cond_type(raw: &str) -> std::result::Result<CondType, String> {
    CondType::from_name(raw).ok_or_else(|| {
        let names: Vec<&str> = CondType::ALL.iter().map(|cond| cond.as_str()).collect();
        format!("expected one of: {}", names.join(", "))
    })
}

/// One structural edit applied by `fct-edit`.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum EditCommand {
    /// Add a property edge under a subject; prints the new subject index.
    AddProperty {
        /// Property IRI.
        iri: String,
        /// Subject the edge starts from.
        #[arg(long, default_value_t = 1)]
        subject: usize,
        /// Match subjects lacking the property.
        #[arg(long)]
        exclude: bool,
        /// Follow owl:sameAs links.
        #[arg(long)]
        same_as: bool,
        /// Inference context.
        #[arg(long)]
        inference: Option<String>,
    },
    /// Add an inverse property edge under a subject; prints the new subject index.
    AddPropertyOf {
        /// Property IRI.
        iri: String,
        /// Subject the edge points to.
        #[arg(long, default_value_t = 1)]
        subject: usize,
        /// Match subjects lacking the property.
        #[arg(long)]
        exclude: bool,
        /// Follow owl:sameAs links.
        #[arg(long)]
        same_as: bool,
        /// Inference context.
        #[arg(long)]
        inference: Option<String>,
    },
    /// Replace the class of the focus subject.
    AddClass {
        /// Class IRI.
        iri: String,
        /// Inference context.
        #[arg(long)]
        inference: Option<String>,
    },
    /// Constrain the focus subject to a value.
    AddValue {
        /// The value, or an IRI.
        value: String,
        /// Comparison (eq, neq, lt, lte, gt, gte).
        #[arg(long = "cond", default_value = "eq", value_parser = cond_type)]
        cond_type: CondType,
        /// Datatype IRI.
        #[arg(long)]
        datatype: Option<String>,
        /// Language tag.
        #[arg(long)]
        lang: Option<String>,
    },
    /// Constrain the focus subject with a condition.
    AddCondition {
        /// Condition type.
        #[arg(value_parser = cond_type)]
        cond_type: CondType,
        /// Condition operand.
        value: String,
        /// Datatype IRI.
        #[arg(long)]
        datatype: Option<String>,
        /// Language tag.
        #[arg(long)]
        lang: Option<String>,
        /// Negate the condition.
        #[arg(long)]
        negate: bool,
    },
    /// Remove the filter at a descriptor position (0-based).
    RemoveFilter {
        /// Position in the `fct-describe` listing.
        position: usize,
    },
    /// Remove every condition of a subject.
    RemoveConditions {
        /// Subject index.
        subject: usize,
    },
    /// Move the view to a subject.
    Focus {
        /// Subject index.
        subject: usize,
    },
    /// Replace the free-text search.
    Text {
        /// Search text; empty input leaves the query unchanged.
        text: String,
        /// Restrict the search to a property.
        #[arg(long)]
        property: Option<String>,
    },
    /// Set the view row limit (0 = unlimited).
    Limit {
        /// Row limit.
        limit: u64,
    },
}

impl EditCommand {
    /// Applies the edit. Returns a line worth printing, if the edit produced one.
    ///
    /// # Errors
    ///
    /// Returns the mutator's error; the tree is left unchanged.
    pub fn apply(&self, tree: &mut QueryTree) -> Result<Option<String>> {
        let options = |exclude: bool, same_as: bool, inference: &Option<String>| PropertyOptions {
            exclude,
            same_as,
            inference: inference.clone(),
        };
        debug!(command = ?self, "apply edit");
        let note = match self {
            EditCommand::AddProperty {
                iri,
                subject,
                exclude,
                same_as,
                inference,
            } => {
                let index = tree.add_property(iri, *subject, options(*exclude, *same_as, inference))?;
                Some(format!("?s{}", index))
            }
            EditCommand::AddPropertyOf {
                iri,
                subject,
                exclude,
                same_as,
                inference,
            } => {
                let index =
                    tree.add_property_of(iri, *subject, options(*exclude, *same_as, inference))?;
                Some(format!("?s{}", index))
            }
            EditCommand::AddClass { iri, inference } => {
                tree.add_class(iri, inference.as_deref())?;
                None
            }
            EditCommand::AddValue {
                value,
                cond_type,
                datatype,
                lang,
            } => {
                tree.add_value(value, *cond_type, datatype.as_deref(), lang.as_deref())?;
                None
            }
            EditCommand::AddCondition {
                cond_type,
                value,
                datatype,
                lang,
                negate,
            } => {
                tree.add_condition(*cond_type, value, datatype.as_deref(), lang.as_deref(), *negate)?;
                None
            }
            EditCommand::RemoveFilter { position } => {
                let removed = tree.remove_filter(*position)?;
                Some(format!("removed <{}>", removed.element_name()))
            }
            EditCommand::RemoveConditions { subject } => {
                let count = tree.remove_subject_conditions(*subject)?;
                Some(format!("removed {} condition(s)", count))
            }
            EditCommand::Focus { subject } => {
                tree.set_focus(*subject)?;
                None
            }
            EditCommand::Text { text, property } => {
                tree.set_query_text(text);
                if let Some(property) = property {
                    tree.set_query_text_property(property)?;
                }
                None
            }
            EditCommand::Limit { limit } => {
                tree.set_view_limit(*limit)?;
                None
            }
        };
        Ok(note)
    }
}
