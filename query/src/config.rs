//! Client defaults, optionally overridden from a TOML file.
//!
//! ```
//! let config = fct_query::FacetConfig::from_toml_str("default_view_limit = 20").unwrap();
//! assert_eq!(config.default_view_limit, 20);
//! assert_eq!(config.request_timeout_ms, 60_000);
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{FacetError, Result};

/// Default facet service endpoint.
pub const DEFAULT_SERVICE_ENDPOINT: &str = "http://linkeddata.uriburner.com/fct/service";

/// Default entity description endpoint.
pub const DEFAULT_DESCRIBE_ENDPOINT: &str = "http://linkeddata.uriburner.com/describe/";

/// Default client-side request timeout in milliseconds.
///
/// Should exceed any `timeout` set on the `<query>` element.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 60_000;

/// Default row limit of a new view.
pub const DEFAULT_VIEW_LIMIT: u64 = 50;

/// Configurable defaults of a facet client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FacetConfig {
    /// Facet service the serialized query is posted to.
    pub service_endpoint: String,
    /// Endpoint used to describe a single entity.
    pub describe_endpoint: String,
    /// Client-side request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Row limit given to new and re-created views.
    pub default_view_limit: u64,
}

impl Default for FacetConfig {
    fn default() -> Self {
        Self {
            service_endpoint: DEFAULT_SERVICE_ENDPOINT.to_owned(),
            describe_endpoint: DEFAULT_DESCRIBE_ENDPOINT.to_owned(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            default_view_limit: DEFAULT_VIEW_LIMIT,
        }
    }
}

impl FacetConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// [`FacetError::Config`] if the document is not valid TOML or holds
    /// unknown keys or mistyped values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// [`FacetError::Io`] if the file cannot be read, otherwise as
    /// [`FacetConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| FacetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_keeps_defaults() {
        assert_eq!(FacetConfig::from_toml_str("").unwrap(), FacetConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = FacetConfig::from_toml_str(
            "service_endpoint = \"http://localhost:8896/fct/service\"\nrequest_timeout_ms = 5000\n",
        )
        .unwrap();
        assert_eq!(config.service_endpoint, "http://localhost:8896/fct/service");
        assert_eq!(config.request_timeout_ms, 5000);
        assert_eq!(config.default_view_limit, DEFAULT_VIEW_LIMIT);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = FacetConfig::from_toml_str("view_type = \"list\"").unwrap_err();
        assert!(matches!(err, FacetError::Config(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = FacetConfig::load(Path::new("/nonexistent/fct.toml")).unwrap_err();
        assert!(matches!(err, FacetError::Io { .. }));
    }
}
