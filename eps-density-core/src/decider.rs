//! EPS Density Decider step
//!
//! Workflow step that decides which EPS density the export pipeline uses.
//! Resolves the work item to its asset, reads the content-type tags, runs
//! the classifier and stores the decision under the configured key.
//!
//! The step fails open: host failures are logged and reported as
//! `StepOutcome::Aborted`, nothing is written, and whatever decision the
//! work item already carried stays in effect.

use std::sync::Arc;

use crate::config::DeciderConfig;
use crate::host::{AssetResolver, DecisionSink, HostError};
use crate::rules::{DensityClassifier, MatchMode, RuleMatch};
use crate::types::{Asset, DensityDecision, WorkItem};

/// Failures at the host boundary. Never produced by classification.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("Unable to find asset node for {payload_path}")]
    AssetNotFound { payload_path: String },

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Result of one step execution.
#[derive(Debug)]
pub enum StepOutcome {
    /// A rule matched and the decision was stored.
    Decided(DensityDecision),
    /// No rule matched; nothing was stored.
    Unchanged,
    /// The step gave up before classifying or storing.
    Aborted(StepError),
}

impl StepOutcome {
    pub fn decision(&self) -> Option<DensityDecision> {
        match self {
            Self::Decided(decision) => Some(*decision),
            _ => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }
}

/// The density decision workflow step.
pub struct EpsDensityDecider {
    config: DeciderConfig,
    resolver: Arc<dyn AssetResolver>,
    sink: Arc<dyn DecisionSink>,
}

impl EpsDensityDecider {
    pub fn new(
        config: DeciderConfig,
        resolver: Arc<dyn AssetResolver>,
        sink: Arc<dyn DecisionSink>,
    ) -> Self {
        Self {
            config,
            resolver,
            sink,
        }
    }

    /// Label the step is registered under in the host engine.
    pub fn label(&self) -> &str {
        &self.config.process_label
    }

    pub fn config(&self) -> &DeciderConfig {
        &self.config
    }

    /// Run the step. Never fails; errors are logged and surfaced as `Aborted`.
    pub async fn execute(&self, item: &WorkItem) -> StepOutcome {
        tracing::debug!(
            work_item = %item.id,
            step = %self.label(),
            "EpsDensityDecider::execute"
        );

        match self.try_execute(item).await {
            Ok(Some(decision)) => StepOutcome::Decided(decision),
            Ok(None) => StepOutcome::Unchanged,
            Err(e) => {
                match &e {
                    StepError::AssetNotFound { payload_path } => {
                        tracing::error!(
                            work_item = %item.id,
                            "Unable to find asset node for {}.",
                            payload_path
                        );
                    }
                    StepError::Host(host_err) => {
                        tracing::error!(
                            work_item = %item.id,
                            "An exception occurred in the EPS Density Decider: {}",
                            host_err
                        );
                    }
                }
                StepOutcome::Aborted(e)
            }
        }
    }

    /// Run the step, returning host failures instead of logging them.
    pub async fn try_execute(
        &self,
        item: &WorkItem,
    ) -> Result<Option<DensityDecision>, StepError> {
        let asset = self
            .resolver
            .resolve_asset(item)
            .await?
            .ok_or_else(|| StepError::AssetNotFound {
                payload_path: item.payload_path.clone(),
            })?;

        let Some(rule) = self.classify_asset(&asset) else {
            tracing::debug!(
                work_item = %item.id,
                asset = %asset.path,
                "No density rule matched, leaving {} unchanged",
                self.config.decision_key
            );
            return Ok(None);
        };

        self.sink
            .put_metadata(item, &self.config.decision_key, rule.decision.as_str())
            .await?;
        tracing::debug!(
            work_item = %item.id,
            pattern = rule.pattern,
            "Setting {} to {}",
            self.config.decision_key,
            rule.decision
        );

        Ok(Some(rule.decision))
    }

    /// Classify an asset's content-type property under the configured mode.
    ///
    /// A missing property classifies as empty text.
    pub fn classify_asset(&self, asset: &Asset) -> Option<RuleMatch> {
        let Some(value) = asset.property(&self.config.content_type_property) else {
            return DensityClassifier::explain("");
        };

        match self.config.match_mode {
            MatchMode::Substring => DensityClassifier::explain(&value.concatenated()),
            MatchMode::ExactTag => DensityClassifier::explain_exact(value.values().as_slice()),
        }
    }
}
