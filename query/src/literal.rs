//! Turtle rendering of `<value>` payloads.
//!
//! A value is a literal or an IRI depending on its language tag, its
//! datatype, and a trailing `^^<uri>` marker on the payload itself.

use serde::Serialize;

use crate::model::{ValueNode, PLAIN_STRING_DATATYPE};

const URI_MARKER: &str = "^^<uri>";

/// How a resolved value is placed in a filter descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ResolvedValue {
    /// An IRI, without angle brackets.
    Iri(String),
    /// A Turtle literal, quoted and suffixed as rendered.
    Literal(String),
}

/// Renders a value payload as a Turtle literal or `<IRI>`.
///
/// 1. a language tag gives `"""text"""@lang`;
/// 2. the plain-string datatype gives `"""text"""`;
/// 3. a payload ending in `^^<uri>` gives `<payload>` without the marker;
/// 4. datatype `uri`, `url` or `iri` gives `<payload>`;
/// 5. no datatype gives `"text"`;
/// 6. a datatype ending in `int`, `integer`, `float` or `double` gives the
///    bare payload;
/// 7. anything else gives `"text"^^<datatype>`.
///
/// Double quotes inside quoted forms are backslash-escaped.
///
/// ```
/// use fct_query::literal::to_turtle;
///
/// let xsd_int = Some("http://www.w3.org/2001/XMLSchema#integer");
/// assert_eq!(to_turtle("27", None, xsd_int), "27");
/// assert_eq!(to_turtle("http://example.org/X", None, Some("uri")), "<http://example.org/X>");
/// assert_eq!(to_turtle("hello \"world\"", None, None), r#""hello \"world\"""#);
/// ```
#[must_use]
pub fn to_turtle(value: &str, lang: Option<&str>, datatype: Option<&str>) -> String {
    let lang = lang.filter(|tag| !tag.is_empty());
    let datatype = datatype.unwrap_or("");

    if let Some(lang) = lang {
        return format!("\"\"\"{}\"\"\"@{}", escape_quotes(value), lang);
    }
    if datatype == PLAIN_STRING_DATATYPE {
        return format!("\"\"\"{}\"\"\"", escape_quotes(value));
    }
    if let Some(iri) = value.strip_suffix(URI_MARKER).filter(|iri| !iri.is_empty()) {
        return format!("<{}>", iri);
    }
    if matches!(datatype, "uri" | "url" | "iri") {
        return format!("<{}>", value);
    }
    if datatype.is_empty() {
        return format!("\"{}\"", escape_quotes(value));
    }
    if ["int", "integer", "float", "double"]
        .iter()
        .any(|suffix| datatype.ends_with(suffix))
    {
        return value.to_owned();
    }
    format!("\"{}\"^^<{}>", escape_quotes(value), datatype)
}

/// Resolves a `<value>` node for use as a descriptor object.
///
/// Rendered forms of the shape `<http…>` or `<urn…>` are IRIs and lose their
/// brackets; everything else stays a literal in its rendered form.
#[must_use]
pub fn resolve(value: &ValueNode) -> ResolvedValue {
    let rendered = to_turtle(
        &value.value,
        value.lang.as_deref(),
        value.datatype.as_deref(),
    );
    match iri_body(&rendered) {
        Some(iri) => ResolvedValue::Iri(iri.to_owned()),
        None => ResolvedValue::Literal(rendered),
    }
}

/// Returns the bracketed IRI body if `rendered` is `<http…>` or `<urn…>`.
fn iri_body(rendered: &str) -> Option<&str> {
    let body = rendered.strip_prefix('<')?.strip_suffix('>')?;
    let scheme_len = if body.starts_with("http") {
        4
    } else if body.starts_with("urn") {
        3
    } else {
        return None;
    };
    (body.len() > scheme_len).then_some(body)
}

fn escape_quotes(value: &str) -> String {
    value.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(payload: &str, datatype: Option<&str>, lang: Option<&str>) -> ValueNode {
        ValueNode {
            value: payload.to_owned(),
            op: None,
            datatype: datatype.map(str::to_owned),
            lang: lang.map(str::to_owned),
            in_attribute: false,
        }
    }

    #[test]
    fn language_tag_wins() {
        assert_eq!(
            to_turtle("chat", Some("fr"), Some("uri")),
            "\"\"\"chat\"\"\"@fr"
        );
    }

    #[test]
    fn plain_string_is_triple_quoted() {
        assert_eq!(
            to_turtle("say \"hi\"", None, Some(PLAIN_STRING_DATATYPE)),
            "\"\"\"say \\\"hi\\\"\"\"\""
        );
    }

    #[test]
    fn uri_marker_is_stripped() {
        assert_eq!(
            to_turtle("http://example.org/a^^<uri>", None, None),
            "<http://example.org/a>"
        );
    }

    #[test]
    fn numeric_datatypes_are_bare() {
        assert_eq!(to_turtle("1.5", None, Some("xsd:double")), "1.5");
        assert_eq!(
            to_turtle("27", None, Some("http://www.w3.org/2001/XMLSchema#integer")),
            "27"
        );
    }

    #[test]
    fn other_datatypes_are_typed_literals() {
        assert_eq!(
            to_turtle("2020-01-01", None, Some("http://www.w3.org/2001/XMLSchema#date")),
            "\"2020-01-01\"^^<http://www.w3.org/2001/XMLSchema#date>"
        );
    }

    #[test]
    fn resolve_classifies_iris() {
        assert_eq!(
            resolve(&value("http://example.org/X", Some("uri"), None)),
            ResolvedValue::Iri("http://example.org/X".to_owned())
        );
        assert_eq!(
            resolve(&value("urn:isbn:0451450523", Some("iri"), None)),
            ResolvedValue::Iri("urn:isbn:0451450523".to_owned())
        );
        // Bracketed, but not an http/urn IRI.
        assert_eq!(
            resolve(&value("mailto:someone@example.org", Some("uri"), None)),
            ResolvedValue::Literal("<mailto:someone@example.org>".to_owned())
        );
        assert_eq!(
            resolve(&value("asbestos", None, None)),
            ResolvedValue::Literal("\"asbestos\"".to_owned())
        );
    }
}
