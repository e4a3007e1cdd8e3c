//! Host Workflow Boundary
//!
//! Abstract interface for the two things the density step needs from the
//! host platform: resolving a work item to its asset, and storing the
//! decision against the work item. Session handling and repository access
//! stay on the host side of these traits.

use async_trait::async_trait;

use crate::types::{Asset, WorkItem};

/// Error type for host operations
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Payload not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Resolves a work item payload to the asset it belongs to.
#[async_trait]
pub trait AssetResolver: Send + Sync {
    /// `Ok(None)` when the payload exists but no asset node owns it.
    async fn resolve_asset(&self, item: &WorkItem) -> Result<Option<Asset>, HostError>;
}

/// Accepts values written into the work item's workflow metadata.
#[async_trait]
pub trait DecisionSink: Send + Sync {
    async fn put_metadata(&self, item: &WorkItem, key: &str, value: &str)
        -> Result<(), HostError>;
}
