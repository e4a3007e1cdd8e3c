//! Core types for the density decision step.
//!
//! `DensityDecision` is the only value the step ever writes. `WorkItem` and
//! `Asset` mirror what the host hands over; neither is interpreted beyond the
//! content-type property.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// ─── Density Decision ────────────────────────────────────────────────────────

/// Raster export density chosen for an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DensityDecision {
    /// Marketing-grade output.
    #[serde(rename = "300")]
    Dpi300,
    /// Line art that needs the high density render.
    #[serde(rename = "1000")]
    Dpi1000,
}

impl DensityDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dpi300 => "300",
            Self::Dpi1000 => "1000",
        }
    }
}

impl std::fmt::Display for DensityDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DensityDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "300" => Ok(Self::Dpi300),
            "1000" => Ok(Self::Dpi1000),
            _ => Err(format!("Unknown density decision: {}", s)),
        }
    }
}

// ─── Asset Metadata ──────────────────────────────────────────────────────────

/// A metadata property value as stored by the host repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Single(String),
    Multiple(Vec<String>),
}

impl PropertyValue {
    /// All values joined with no separator.
    ///
    /// Adjacent values are glued together, so a substring match can straddle
    /// two tags. The classifier's default mode depends on this exact text.
    pub fn concatenated(&self) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::Multiple(values) => values.concat(),
        }
    }

    /// Individual values, for exact per-tag matching.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

/// An asset resolved from a work item payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Asset {
    /// Repository path of the asset node
    pub path: String,
    /// Metadata properties keyed by relative property path
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Asset {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder: set a property.
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }
}

// ─── Work Item ───────────────────────────────────────────────────────────────

/// Opaque handle for one asset moving through the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: Uuid,
    /// Payload path handed to the step; may point below the asset node
    pub payload_path: String,
}

impl WorkItem {
    pub fn new(payload_path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            payload_path: payload_path.into(),
        }
    }
}
