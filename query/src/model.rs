//! Node types of a facet query tree.
//!
//! Each element of the facet query vocabulary is a variant of [`Node`] with
//! one concrete field set, validated when the node is built (by a mutator or
//! by the XML reader) rather than when it is read.

use serde::Serialize;

/// Namespace of the `<query>` root element.
pub const FACET_NAMESPACE: &str = "http://openlinksw.com/services/facets/1.0";

/// Datatype marking a value as a plain (untyped, unlanguaged) string.
pub const PLAIN_STRING_DATATYPE: &str = "http://www.openlinksw.com/schemas/facets/dtp/plainstring";

/// Handle to a node owned by a [`QueryTree`](crate::QueryTree).
///
/// Handles are never reused: once a node is removed its handle stays dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the arena slot of this handle.
    #[inline]
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

/// Result view requested from the facet service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViewKind {
    /// Outgoing properties of the focus subject.
    #[serde(rename = "properties")]
    Properties,
    /// Incoming properties of the focus subject.
    #[serde(rename = "properties-in")]
    PropertiesIn,
    /// Classes of the focus subject.
    #[serde(rename = "classes")]
    Classes,
    /// Free-text matches.
    #[serde(rename = "text")]
    Text,
    /// Free-text matches with the default description columns.
    #[serde(rename = "text-d")]
    TextD,
    /// Distinct values of the focus subject.
    #[serde(rename = "list")]
    List,
    /// Distinct values with counts.
    #[serde(rename = "list-count")]
    ListCount,
    /// Values grouped by initial letter.
    #[serde(rename = "alphabet")]
    Alphabet,
    /// Geographic coordinates.
    #[serde(rename = "geo")]
    Geo,
    /// Description of a single entity.
    #[serde(rename = "describe")]
    Describe,
    /// Date values grouped by year.
    #[serde(rename = "years")]
    Years,
    /// Date values grouped by month.
    #[serde(rename = "months")]
    Months,
    /// Date values grouped by week.
    #[serde(rename = "weeks")]
    Weeks,
}

impl ViewKind {
    /// The view kind used by a freshly built tree and by re-created views.
    pub const DEFAULT: ViewKind = ViewKind::TextD;

    /// All view kinds, in declaration order.
    pub const ALL: [ViewKind; 13] = [
        ViewKind::Properties,
        ViewKind::PropertiesIn,
        ViewKind::Classes,
        ViewKind::Text,
        ViewKind::TextD,
        ViewKind::List,
        ViewKind::ListCount,
        ViewKind::Alphabet,
        ViewKind::Geo,
        ViewKind::Describe,
        ViewKind::Years,
        ViewKind::Months,
        ViewKind::Weeks,
    ];

    /// Returns the value of the `type` attribute for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ViewKind::Properties => "properties",
            ViewKind::PropertiesIn => "properties-in",
            ViewKind::Classes => "classes",
            ViewKind::Text => "text",
            ViewKind::TextD => "text-d",
            ViewKind::List => "list",
            ViewKind::ListCount => "list-count",
            ViewKind::Alphabet => "alphabet",
            ViewKind::Geo => "geo",
            ViewKind::Describe => "describe",
            ViewKind::Years => "years",
            ViewKind::Months => "months",
            ViewKind::Weeks => "weeks",
        }
    }

    /// Parses a `type` attribute value. Returns `None` for unknown kinds.
    #[must_use]
    pub fn from_name(name: &str) -> Option<ViewKind> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// Condition type of a `<cond>` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CondType {
    /// Equal.
    Eq,
    /// Not equal.
    Neq,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Text containment.
    Contains,
    /// Membership in a value list.
    In,
    /// Geographic proximity.
    Near,
}

impl CondType {
    /// All condition types, in declaration order.
    pub const ALL: [CondType; 9] = [
        CondType::Eq,
        CondType::Neq,
        CondType::Lt,
        CondType::Lte,
        CondType::Gt,
        CondType::Gte,
        CondType::Contains,
        CondType::In,
        CondType::Near,
    ];

    /// Returns the value of the `type` attribute for this condition.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CondType::Eq => "eq",
            CondType::Neq => "neq",
            CondType::Lt => "lt",
            CondType::Lte => "lte",
            CondType::Gt => "gt",
            CondType::Gte => "gte",
            CondType::Contains => "contains",
            CondType::In => "in",
            CondType::Near => "near",
        }
    }

    /// Parses a `type` attribute value. Returns `None` for unknown types.
    #[must_use]
    pub fn from_name(name: &str) -> Option<CondType> {
        Self::ALL.into_iter().find(|cond| cond.as_str() == name)
    }

    /// Comparison operator shown for this condition, if it is a comparison.
    ///
    /// `contains`, `in` and `near` have no operator form.
    #[must_use]
    pub fn operator(self) -> Option<&'static str> {
        match self {
            CondType::Eq => Some("="),
            CondType::Neq => Some("!="),
            CondType::Lt => Some("<"),
            CondType::Lte => Some("<="),
            CondType::Gt => Some(">"),
            CondType::Gte => Some(">="),
            CondType::Contains | CondType::In | CondType::Near => None,
        }
    }
}

/// Attributes of the `<query>` root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryNode {
    /// Graph the query is restricted to.
    pub graph: Option<String>,
    /// Service-side timeout in milliseconds; passed through untouched.
    pub timeout: Option<u64>,
    /// Name of the inference rule set.
    pub inference: Option<String>,
    /// `owl:sameAs` expansion: `None` when unset.
    pub same_as: Option<bool>,
}

/// A `<class>` filter: the enclosing subject is (not) an instance of `iri`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    /// Class IRI.
    pub iri: String,
    /// `exclude="yes"`.
    pub exclude: bool,
    /// Name of the inference rule set.
    pub inference: Option<String>,
}

/// A `<property>` or `<property-of>` edge. Each one opens a new subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNode {
    /// Property IRI.
    pub iri: String,
    /// `exclude="yes"`.
    pub exclude: bool,
    /// `same_as="yes"`.
    pub same_as: bool,
    /// Name of the inference rule set.
    pub inference: Option<String>,
}

/// A free-text constraint, optionally bound to one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    /// The text to match.
    pub text: String,
    /// Property the text must occur in.
    pub property: Option<String>,
    /// Written as `<text-d>` rather than `<text>`.
    pub default_view: bool,
}

/// A `<value>` constraint holding a literal or IRI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueNode {
    /// Raw payload, before literal resolution.
    pub value: String,
    /// Comparison operator; `None` means `=`.
    pub op: Option<String>,
    /// Datatype IRI or one of `uri`/`url`/`iri`.
    pub datatype: Option<String>,
    /// Language tag.
    pub lang: Option<String>,
    /// The payload was read from a `val` attribute instead of element text.
    pub in_attribute: bool,
}

impl ValueNode {
    /// The comparison operator, defaulting to `=`.
    #[must_use]
    pub fn operator(&self) -> &str {
        self.op.as_deref().unwrap_or("=")
    }
}

/// A `<cond>` constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondNode {
    /// Condition type.
    pub cond_type: CondType,
    /// Literal payload.
    pub value: String,
    /// Datatype IRI of the payload.
    pub datatype: Option<String>,
    /// Language tag of the payload.
    pub lang: Option<String>,
    /// `neg="1"`.
    pub negate: bool,
}

/// `<cond-parm>` and `<cond-range>`: kept verbatim, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpaqueNode {
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Element text.
    pub text: String,
}

/// The focus marker: which subject is returned, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewNode {
    /// Result view kind.
    pub kind: ViewKind,
    /// Row limit; 0 means unlimited and is written by omitting `limit`.
    pub limit: u64,
    /// Row offset.
    pub offset: u64,
}

impl ViewNode {
    /// A default-kind view with the given limit and offset 0.
    #[must_use]
    pub fn with_limit(limit: u64) -> Self {
        Self {
            kind: ViewKind::DEFAULT,
            limit,
            offset: 0,
        }
    }
}

/// A node of a facet query tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// The root. Its attributes live on the tree, see
    /// [`QueryTree::query`](crate::QueryTree::query).
    Query,
    /// Class filter.
    Class(ClassNode),
    /// Outgoing edge to a new subject.
    Property(PropertyNode),
    /// Incoming edge from a new subject.
    PropertyOf(PropertyNode),
    /// Free-text constraint.
    Text(TextNode),
    /// Value constraint.
    Value(ValueNode),
    /// Condition constraint.
    Cond(CondNode),
    /// Condition parameter (uninterpreted).
    CondParm(OpaqueNode),
    /// Condition range (uninterpreted).
    CondRange(OpaqueNode),
    /// Focus marker.
    View(ViewNode),
}

/// Discriminant of [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// `<query>`.
    Query,
    /// `<class>`.
    Class,
    /// `<property>`.
    Property,
    /// `<property-of>`.
    PropertyOf,
    /// `<text>` / `<text-d>`.
    Text,
    /// `<value>`.
    Value,
    /// `<cond>`.
    Cond,
    /// `<cond-parm>`.
    CondParm,
    /// `<cond-range>`.
    CondRange,
    /// `<view>`.
    View,
}

impl NodeKind {
    /// Element name used in the serialized form.
    #[must_use]
    pub fn element_name(self) -> &'static str {
        match self {
            NodeKind::Query => "query",
            NodeKind::Class => "class",
            NodeKind::Property => "property",
            NodeKind::PropertyOf => "property-of",
            NodeKind::Text => "text",
            NodeKind::Value => "value",
            NodeKind::Cond => "cond",
            NodeKind::CondParm => "cond-parm",
            NodeKind::CondRange => "cond-range",
            NodeKind::View => "view",
        }
    }
}

impl Node {
    /// Returns the discriminant of this node.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Query => NodeKind::Query,
            Node::Class(_) => NodeKind::Class,
            Node::Property(_) => NodeKind::Property,
            Node::PropertyOf(_) => NodeKind::PropertyOf,
            Node::Text(_) => NodeKind::Text,
            Node::Value(_) => NodeKind::Value,
            Node::Cond(_) => NodeKind::Cond,
            Node::CondParm(_) => NodeKind::CondParm,
            Node::CondRange(_) => NodeKind::CondRange,
            Node::View(_) => NodeKind::View,
        }
    }

    /// True for the root and for every property / property-of edge.
    #[must_use]
    pub fn opens_subject(&self) -> bool {
        matches!(self, Node::Query | Node::Property(_) | Node::PropertyOf(_))
    }

    /// Element name used in the serialized form.
    #[must_use]
    pub fn element_name(&self) -> &'static str {
        match self {
            Node::Text(text) if text.default_view => "text-d",
            other => other.kind().element_name(),
        }
    }

    /// Returns the view attributes if this is the view node.
    #[must_use]
    pub fn as_view(&self) -> Option<&ViewNode> {
        match self {
            Node::View(view) => Some(view),
            _ => None,
        }
    }

    pub(crate) fn as_view_mut(&mut self) -> Option<&mut ViewNode> {
        match self {
            Node::View(view) => Some(view),
            _ => None,
        }
    }
}
