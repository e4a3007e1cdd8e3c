//! EPS density decision for the asset export workflow
//!
//! This crate provides:
//! - `DensityClassifier` - pure mapping from content-type tag text to a density
//! - `AssetResolver` / `DecisionSink` - the host capabilities the step relies on
//! - `EpsDensityDecider` - the workflow step that wires the two together
//! - `MemoryHost` - in-memory host used by tests and the CLI
//!
//! The classifier is the only logic with design content. Everything else is
//! the boundary to the host workflow engine, which owns sessions, repository
//! traversal and metadata persistence.

pub mod config;
pub mod decider;
pub mod host;
pub mod memory;
pub mod rules;
pub mod types;

pub use config::DeciderConfig;
pub use decider::{EpsDensityDecider, StepError, StepOutcome};
pub use host::{AssetResolver, DecisionSink, HostError};
pub use memory::MemoryHost;
pub use rules::{DensityClassifier, MatchMode, RuleMatch};
pub use types::{Asset, DensityDecision, PropertyValue, WorkItem};
