//! Decider configuration — load from YAML, with defaults for every field.
//!
//! The defaults reproduce the production step: read the content-type
//! property from the asset metadata node and store the decision under
//! `DENSITY_DECISION` using substring matching.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::rules::MatchMode;

pub const DEFAULT_CONTENT_TYPE_PROPERTY: &str = "jcr:content/metadata/xmp:eaton-content-type";
pub const DEFAULT_DECISION_KEY: &str = "DENSITY_DECISION";
pub const DEFAULT_PROCESS_LABEL: &str = "Eaton - EPS Density Decider";

/// Configuration for the density decider step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeciderConfig {
    /// Asset property holding the content-type tags.
    #[serde(default = "default_content_type_property")]
    pub content_type_property: String,
    /// Workflow metadata key the decision is written under.
    #[serde(default = "default_decision_key")]
    pub decision_key: String,
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Label the step is registered under in the host workflow engine.
    #[serde(default = "default_process_label")]
    pub process_label: String,
}

fn default_content_type_property() -> String {
    DEFAULT_CONTENT_TYPE_PROPERTY.to_string()
}

fn default_decision_key() -> String {
    DEFAULT_DECISION_KEY.to_string()
}

fn default_process_label() -> String {
    DEFAULT_PROCESS_LABEL.to_string()
}

impl Default for DeciderConfig {
    fn default() -> Self {
        Self {
            content_type_property: default_content_type_property(),
            decision_key: default_decision_key(),
            match_mode: MatchMode::default(),
            process_label: default_process_label(),
        }
    }
}

impl DeciderConfig {
    /// Parse and validate from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: DeciderConfig =
            serde_yaml::from_str(yaml).context("Parsing decider config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
        let config: DeciderConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Parsing {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Validating {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            match_mode = config.match_mode.as_str(),
            "Loaded decider config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.content_type_property.trim().is_empty() {
            bail!("content_type_property must not be empty");
        }
        if self.decision_key.trim().is_empty() {
            bail!("decision_key must not be empty");
        }
        Ok(())
    }

    /// Builder: switch the match mode.
    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }
}
