//! Report request model types.
//!
//! A request names the logical fields to project and carries a map of
//! filter descriptors keyed by free-form names. Filter keys are not
//! semantically meaningful; predicate order follows the map's insertion
//! order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A report request: which fields to project, which filters to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Logical field names, projected in this order.
    pub fields: Vec<String>,

    /// Filter descriptors, applied in insertion order.
    #[serde(default)]
    pub filters: IndexMap<String, Filter>,
}

impl ReportRequest {
    /// Create a request for the given logical fields.
    pub fn new(fields: Vec<impl Into<String>>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            filters: IndexMap::new(),
        }
    }

    /// Add a filter under a key.
    pub fn with_filter(mut self, key: impl Into<String>, filter: Filter) -> Self {
        self.filters.insert(key.into(), filter);
        self
    }
}

/// One filter descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Scalar or sequence; meaning depends on `kind`.
    pub value: FilterValue,

    /// Predicate flavor.
    #[serde(rename = "type")]
    pub kind: FilterKind,

    /// Where the predicate's left-hand side comes from. A filter without
    /// meta produces no predicate.
    #[serde(default)]
    pub meta: Option<FilterMeta>,

    /// Range lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Scalar>,

    /// Range upper bound, inclusive of its whole calendar day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Scalar>,
}

impl Filter {
    /// Create a filter of the given kind.
    pub fn new(kind: FilterKind, value: FilterValue) -> Self {
        Self {
            value,
            kind,
            meta: None,
            start: None,
            end: None,
        }
    }

    /// Set the logical field the predicate targets.
    pub fn with_meta(mut self, model_name: impl Into<String>, model_field: impl Into<String>) -> Self {
        self.meta = Some(FilterMeta {
            model_name: model_name.into(),
            model_field: model_field.into(),
            function: None,
        });
        self
    }

    /// Wrap the left-hand side in a SQL function (e.g. `date`).
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        if let Some(meta) = &mut self.meta {
            meta.function = Some(function.into());
        }
        self
    }

    /// Set range bounds.
    pub fn with_bounds(mut self, start: Option<Scalar>, end: Option<Scalar>) -> Self {
        self.start = start;
        self.end = end;
        self
    }
}

/// Predicate flavor. Unknown kinds deserialize into [`FilterKind::Other`]
/// and are skipped with a diagnostic rather than failing the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Substring match. `contain` is accepted as a legacy spelling.
    #[serde(alias = "contain")]
    Contains,
    Exact,
    /// Like `exact`, except value -1 means "all" and emits nothing.
    Boolean,
    /// Membership in a list of values; empty lists emit nothing.
    Set,
    /// Calendar range over `start`/`end`.
    Range,
    /// Anything this compiler does not understand.
    #[serde(untagged)]
    Other(String),
}

/// The logical field reference behind a predicate's left-hand side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterMeta {
    pub model_name: String,
    pub model_field: String,

    /// SQL function wrapping the column, emitted verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

/// A filter value: one scalar or a sequence of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    One(Scalar),
    Many(Vec<Scalar>),
}

impl FilterValue {
    /// The single scalar, if this is not a sequence.
    pub fn scalar(&self) -> Option<&Scalar> {
        match self {
            FilterValue::One(scalar) => Some(scalar),
            FilterValue::Many(_) => None,
        }
    }

    /// All scalars, treating a single value as a one-element sequence.
    pub fn items(&self) -> &[Scalar] {
        match self {
            FilterValue::One(scalar) => std::slice::from_ref(scalar),
            FilterValue::Many(scalars) => scalars.as_slice(),
        }
    }

    /// True for an empty sequence or an empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::One(Scalar::Text(text)) => text.is_empty(),
            FilterValue::One(_) => false,
            FilterValue::Many(scalars) => scalars.is_empty(),
        }
    }
}

impl From<Scalar> for FilterValue {
    fn from(scalar: Scalar) -> Self {
        FilterValue::One(scalar)
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        FilterValue::One(Scalar::Text(text.to_string()))
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(texts: Vec<&str>) -> Self {
        FilterValue::Many(texts.into_iter().map(|t| Scalar::Text(t.to_string())).collect())
    }
}

/// A single filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Render the scalar as the text that goes inside a SQL literal.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Bool(true) => "1".to_string(),
            Scalar::Bool(false) => "0".to_string(),
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => {
                let mut buffer = ryu::Buffer::new();
                buffer.format(*n).to_string()
            }
            Scalar::Text(text) => text.clone(),
        }
    }

    /// The boolean filter's "all" sentinel, compared the way the wire
    /// formats deliver it: integer, float or text.
    pub fn is_minus_one(&self) -> bool {
        match self {
            Scalar::Int(n) => *n == -1,
            Scalar::Float(n) => *n == -1.0,
            Scalar::Text(text) => text == "-1",
            Scalar::Bool(_) => false,
        }
    }
}
