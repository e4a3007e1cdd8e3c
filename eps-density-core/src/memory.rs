//! In-memory host (for tests and local runs)
//!
//! Holds assets keyed by repository path and a workflow metadata map per
//! work item. A payload resolves to the asset at its own path or, failing
//! that, to the nearest ancestor asset, so rendition paths such as
//! `/content/dam/a.pdf/jcr:content/renditions/original` land on `a.pdf`.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::host::{AssetResolver, DecisionSink, HostError};
use crate::types::{Asset, WorkItem};

#[derive(Clone, Default)]
pub struct MemoryHost {
    assets: Arc<RwLock<HashMap<String, Asset>>>,
    metadata: Arc<RwLock<HashMap<Uuid, BTreeMap<String, String>>>>,
    resolution_failure: Arc<RwLock<Option<String>>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_asset(&self, asset: Asset) {
        let mut assets = self.assets.write().await;
        assets.insert(normalize_path(&asset.path), asset);
    }

    /// Seed a metadata value, e.g. a decision left by an earlier step.
    pub async fn seed_metadata(&self, item_id: Uuid, key: &str, value: &str) {
        let mut metadata = self.metadata.write().await;
        metadata
            .entry(item_id)
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    /// Snapshot of the workflow metadata written for a work item.
    pub async fn metadata(&self, item_id: &Uuid) -> BTreeMap<String, String> {
        let metadata = self.metadata.read().await;
        metadata.get(item_id).cloned().unwrap_or_default()
    }

    /// Make every subsequent resolution fail with a repository error.
    pub async fn fail_resolution_with(&self, message: impl Into<String>) {
        *self.resolution_failure.write().await = Some(message.into());
    }

    pub async fn asset_count(&self) -> usize {
        self.assets.read().await.len()
    }
}

/// Collapse empty segments: `/a//b/` becomes `/a/b`.
fn normalize_path(path: &str) -> String {
    let joined = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if path.starts_with('/') {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Candidate asset paths for a payload, most specific first.
fn ancestor_paths(payload_path: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut current = normalize_path(payload_path);
    while !current.is_empty() && current != "/" {
        let parent = match current.rfind('/') {
            Some(idx) if idx > 0 => current[..idx].to_string(),
            _ => String::new(),
        };
        paths.push(std::mem::replace(&mut current, parent));
    }
    paths
}

#[async_trait]
impl AssetResolver for MemoryHost {
    async fn resolve_asset(&self, item: &WorkItem) -> Result<Option<Asset>, HostError> {
        if let Some(message) = self.resolution_failure.read().await.as_ref() {
            return Err(HostError::Repository(message.clone()));
        }

        let assets = self.assets.read().await;
        Ok(ancestor_paths(&item.payload_path)
            .iter()
            .find_map(|path| assets.get(path).cloned()))
    }
}

#[async_trait]
impl DecisionSink for MemoryHost {
    async fn put_metadata(
        &self,
        item: &WorkItem,
        key: &str,
        value: &str,
    ) -> Result<(), HostError> {
        let mut metadata = self.metadata.write().await;
        metadata
            .entry(item.id)
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
