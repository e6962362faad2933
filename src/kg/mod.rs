//! Knowledge-graph context: property pairs, their flat string form, and the
//! online lookup seam used for QIDs missing from the local sidecars.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "network")]
mod wikidata;

#[cfg(feature = "network")]
pub use wikidata::WikidataLookup;

// ---------------------------------------------------------------------------
// Property – one (property, value) pair
// ---------------------------------------------------------------------------

/// A single knowledge-graph statement about an entity.
///
/// Stored on disk as a two-element JSON array, `["occupation", "writer"]`;
/// either member may be `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    from = "(Option<String>, Option<String>)",
    into = "(Option<String>, Option<String>)"
)]
pub struct Property {
    pub name: Option<String>,
    pub value: Option<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
        }
    }
}

impl From<(Option<String>, Option<String>)> for Property {
    fn from((name, value): (Option<String>, Option<String>)) -> Self {
        Self { name, value }
    }
}

impl From<Property> for (Option<String>, Option<String>) {
    fn from(p: Property) -> Self {
        (p.name, p.value)
    }
}

/// Flatten properties into one space-separated string, in list order.
///
/// Absent members contribute nothing, so `[("p1","v1"), (null,"v2")]`
/// becomes `"p1 v1 v2"` with single spaces throughout.
pub fn flatten_properties(properties: &[Property]) -> String {
    properties
        .iter()
        .flat_map(|p| [p.name.as_deref(), p.value.as_deref()])
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// KgProperties – the two return shapes of a context lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum KgProperties {
    /// The raw pair list (`output_as_dictionary = true`).
    Pairs(Vec<Property>),
    /// The flattened string form.
    Flat(String),
}

impl KgProperties {
    pub fn as_pairs(&self) -> Option<&[Property]> {
        match self {
            KgProperties::Pairs(p) => Some(p),
            KgProperties::Flat(_) => None,
        }
    }

    pub fn as_flat(&self) -> Option<&str> {
        match self {
            KgProperties::Flat(s) => Some(s),
            KgProperties::Pairs(_) => None,
        }
    }
}

impl fmt::Display for KgProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KgProperties::Flat(s) => write!(f, "{s}"),
            KgProperties::Pairs(p) => write!(f, "{}", flatten_properties(p)),
        }
    }
}

// ---------------------------------------------------------------------------
// Online lookup collaborator
// ---------------------------------------------------------------------------

pub type LookupError = Box<dyn std::error::Error + Send + Sync>;

/// Fetches `(properties, description)` for a QID from outside the dataset.
pub trait KnowledgeGraphLookup {
    fn lookup(&self, qid: &str) -> Result<(Vec<Property>, String), LookupError>;
}

impl<F> KnowledgeGraphLookup for F
where
    F: Fn(&str) -> Result<(Vec<Property>, String), LookupError>,
{
    fn lookup(&self, qid: &str) -> Result<(Vec<Property>, String), LookupError> {
        self(qid)
    }
}
