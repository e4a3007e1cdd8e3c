//! YAML fixture describing assets and the work items to run against them.
//!
//! ```yaml
//! assets:
//!   - path: /content/dam/eaton/drawing.eps
//!     content_types:
//!       - eaton:resources/technical-resources/drawings
//!   - path: /content/dam/eaton/logo.eps
//!     content_types: eaton:resources/marketing-resources/illustrations
//! work_items:
//!   - payload_path: /content/dam/eaton/drawing.eps/jcr:content/renditions/original
//!   - id: 6f1c1d8e-4d7b-4b43-9d6f-0c4a2f0f4e11
//!     payload_path: /content/dam/eaton/logo.eps
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use uuid::Uuid;

use eps_density_core::{Asset, MemoryHost, PropertyValue, WorkItem};

#[derive(Debug, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub assets: Vec<AssetFixture>,
    #[serde(default)]
    pub work_items: Vec<WorkItemFixture>,
}

#[derive(Debug, Deserialize)]
pub struct AssetFixture {
    pub path: String,
    /// Omitted when the asset carries no content-type property at all.
    #[serde(default)]
    pub content_types: Option<PropertyValue>,
}

#[derive(Debug, Deserialize)]
pub struct WorkItemFixture {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub payload_path: String,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("Parsing {}", path.display()))
    }

    /// Populate a host, storing tags under `content_type_property`.
    pub async fn into_host(self, content_type_property: &str) -> (MemoryHost, Vec<WorkItem>) {
        let host = MemoryHost::new();
        for asset in self.assets {
            let mut record = Asset::new(asset.path);
            if let Some(value) = asset.content_types {
                record = record.with_property(content_type_property, value);
            }
            host.insert_asset(record).await;
        }

        let items = self
            .work_items
            .into_iter()
            .map(|w| WorkItem {
                id: w.id.unwrap_or_else(Uuid::new_v4),
                payload_path: w.payload_path,
            })
            .collect();

        (host, items)
    }
}
