//! Boundary to the facet service.
//!
//! The crate builds requests and reads back the one field it needs from a
//! response; sending them is left to an implementation of
//! [`QueryService`] supplied by the caller.

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::config::FacetConfig;
use crate::error::{FacetError, Result};
use crate::tree::QueryTree;

/// A serialized query ready to be posted as `text/xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetRequest {
    /// Facet service endpoint.
    pub endpoint: String,
    /// Request body.
    pub xml: String,
    /// Client-side timeout in milliseconds.
    pub timeout_ms: u64,
}

impl FacetRequest {
    /// Serializes `tree` for the endpoint and timeout in `config`.
    #[must_use]
    pub fn new(tree: &QueryTree, config: &FacetConfig) -> Self {
        Self {
            endpoint: config.service_endpoint.clone(),
            xml: tree.to_xml(),
            timeout_ms: config.request_timeout_ms,
        }
    }
}

/// A successful facet service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetResponse {
    xml: String,
}

impl FacetResponse {
    /// Wraps a raw result document.
    #[must_use]
    pub fn new(xml: impl Into<String>) -> Self {
        Self { xml: xml.into() }
    }

    /// The raw result document.
    #[must_use]
    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// Text of the first `sparql` element, whatever its namespace prefix:
    /// the SPARQL the service generated for the query.
    ///
    /// ```
    /// let response = fct_query::FacetResponse::new(
    ///     r#"<fct:facets xmlns:fct="http://openlinksw.com/services/facets/1.0/">
    ///          <fct:sparql>select ?s1 where { ?s1 ?p ?o }</fct:sparql>
    ///        </fct:facets>"#,
    /// );
    /// assert_eq!(response.sparql().unwrap().as_deref(), Some("select ?s1 where { ?s1 ?p ?o }"));
    /// ```
    ///
    /// # Errors
    ///
    /// [`FacetError::Xml`] if the document is not well-formed up to the end
    /// of that element.
    pub fn sparql(&self) -> Result<Option<String>> {
        let mut reader = Reader::from_str(&self.xml);
        let mut inside = false;
        let mut text = String::new();
        loop {
            match reader.read_event()? {
                Event::Start(start) if start.local_name().as_ref() == b"sparql" => inside = true,
                Event::Empty(start) if start.local_name().as_ref() == b"sparql" => {
                    return Ok(Some(String::new()));
                }
                Event::Text(chunk) if inside => text.push_str(&chunk.unescape()?),
                Event::CData(chunk) if inside => {
                    let chunk = std::str::from_utf8(&chunk)
                        .map_err(|err| FacetError::Parse(format!("invalid UTF-8: {}", err)))?;
                    text.push_str(chunk);
                }
                Event::End(end) if inside && end.local_name().as_ref() == b"sparql" => {
                    return Ok(Some(text.trim().to_owned()));
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}

/// Failure reported for a facet request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The service answered with an error status. The body is kept raw.
    #[error("facet service returned HTTP {status_code} {status_text}")]
    Http {
        /// HTTP status code.
        status_code: u16,
        /// HTTP reason phrase.
        status_text: String,
        /// Response body, trimmed.
        body: String,
    },
    /// No response was received (connection failure, timeout).
    #[error("facet service request failed: {0}")]
    Transport(String),
}

impl ServiceError {
    /// Builds an [`ServiceError::Http`], trimming the body.
    #[must_use]
    pub fn http(status_code: u16, status_text: impl Into<String>, body: &str) -> Self {
        ServiceError::Http {
            status_code,
            status_text: status_text.into(),
            body: body.trim().to_owned(),
        }
    }
}

/// Sends facet requests. Implemented outside this crate.
pub trait QueryService {
    /// Posts `request` and returns the service's answer.
    ///
    /// # Errors
    ///
    /// [`ServiceError`] when the service cannot be reached or rejects the
    /// request.
    fn submit(&self, request: &FacetRequest) -> std::result::Result<FacetResponse, ServiceError>;
}

impl QueryTree {
    /// Serializes the tree and submits it through `service`.
    ///
    /// # Errors
    ///
    /// Whatever `service` reports.
    pub fn execute<S: QueryService + ?Sized>(
        &self,
        service: &S,
        config: &FacetConfig,
    ) -> std::result::Result<FacetResponse, ServiceError> {
        let request = FacetRequest::new(self, config);
        debug!(endpoint = %request.endpoint, body = %request.xml, "submit facet query");
        service.submit(&request)
    }
}
