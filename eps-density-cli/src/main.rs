//! EPS Density CLI
//!
//! Runs the density classifier on ad-hoc tags, or runs the full decider step
//! over a YAML fixture of assets and work items.
//!
//! Usage:
//!   eps-density classify eaton:resources/technical-resources/drawings
//!   eps-density classify --exact tag-a tag-b
//!   eps-density run --assets assets.yaml --config decider.yaml --json
//!
//! Set `RUST_LOG=eps_density_core=debug` (or pass `--verbose`) to see the
//! per-item decisions as the step logs them.

mod fixture;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use uuid::Uuid;

use eps_density_core::{
    DeciderConfig, DensityClassifier, EpsDensityDecider, MatchMode, StepOutcome,
};

use crate::fixture::Fixture;

/// EPS density decider
#[derive(Parser, Debug)]
#[command(name = "eps-density")]
#[command(about = "Decide the EPS export density from content-type tags")]
struct Args {
    /// Log at DEBUG level
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify content-type tags and print the density
    Classify {
        /// Compare each tag exactly instead of substring matching the concatenation
        #[arg(long)]
        exact: bool,

        /// Content-type tag values
        tags: Vec<String>,
    },
    /// Run the decider step over a fixture of assets and work items
    Run {
        /// YAML fixture with `assets` and `work_items`
        #[arg(long, short = 'a')]
        assets: PathBuf,

        /// Decider config YAML (defaults apply when omitted)
        #[arg(long, short = 'c', env = "EPS_DENSITY_CONFIG")]
        config: Option<PathBuf>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Result of running the step for one work item
#[derive(Debug, Clone, Serialize)]
struct ItemResult {
    work_item_id: Uuid,
    payload_path: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    decision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ItemResult {
    fn from_outcome(item: &eps_density_core::WorkItem, outcome: &StepOutcome) -> Self {
        let (status, decision, error) = match outcome {
            StepOutcome::Decided(d) => ("decided", Some(d.to_string()), None),
            StepOutcome::Unchanged => ("unchanged", None, None),
            StepOutcome::Aborted(e) => ("aborted", None, Some(e.to_string())),
        };
        Self {
            work_item_id: item.id,
            payload_path: item.payload_path.clone(),
            status,
            decision,
            error,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Classify { exact, tags } => println!("{}", classify_label(&tags, exact)),
        Command::Run {
            assets,
            config,
            json,
        } => run(assets, config, json).await?,
    }

    Ok(())
}

/// Label printed by `classify`: `300`, `1000` or `none`.
fn classify_label(tags: &[String], exact: bool) -> String {
    let mode = if exact {
        MatchMode::ExactTag
    } else {
        MatchMode::Substring
    };
    match DensityClassifier::classify_tags(tags, mode) {
        Some(m) => {
            tracing::debug!(pattern = m.pattern, "matched");
            m.decision.to_string()
        }
        None => "none".to_string(),
    }
}

async fn run(assets: PathBuf, config: Option<PathBuf>, json: bool) -> Result<()> {
    let (label, match_mode, results) = run_fixture(&assets, config.as_deref()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("{} {}", "Step:".cyan().bold(), label);
    println!("{} {}", "Match mode:".cyan(), match_mode.as_str());
    for r in &results {
        let status = match r.status {
            "decided" => r.decision.as_deref().unwrap_or_default().green().bold(),
            "unchanged" => "unchanged".yellow(),
            _ => "aborted".red().bold(),
        };
        print!("  {} {}", status, r.payload_path);
        match &r.error {
            Some(e) => println!(" ({})", e.as_str().dimmed()),
            None => println!(),
        }
    }

    let decided = results.iter().filter(|r| r.status == "decided").count();
    let aborted = results.iter().filter(|r| r.status == "aborted").count();
    println!(
        "{} {} decided, {} unchanged, {} aborted",
        "Summary:".cyan().bold(),
        decided,
        results.len() - decided - aborted,
        aborted
    );

    Ok(())
}

/// Run the step over every work item in the fixture.
///
/// Returns the step label, the match mode in effect and one result per item.
async fn run_fixture(
    assets: &Path,
    config: Option<&Path>,
) -> Result<(String, MatchMode, Vec<ItemResult>)> {
    let config = match config {
        Some(path) => DeciderConfig::load_from_file(path)?,
        None => DeciderConfig::default(),
    };

    let fixture = Fixture::load(assets)?;
    let (host, items) = fixture.into_host(&config.content_type_property).await;
    let host = Arc::new(host);
    let step = EpsDensityDecider::new(config, host.clone(), host.clone());

    tracing::info!(
        step = step.label(),
        work_items = items.len(),
        "Running density decider"
    );

    let mut results = Vec::with_capacity(items.len());
    for item in &items {
        let outcome = step.execute(item).await;
        results.push(ItemResult::from_outcome(item, &outcome));
    }

    Ok((
        step.label().to_string(),
        step.config().match_mode,
        results,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_classify_args() {
        let args = Args::parse_from(["eps-density", "classify", "--exact", "a", "b"]);
        match args.command {
            Command::Classify { exact, tags } => {
                assert!(exact);
                assert_eq!(tags, vec!["a", "b"]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_item_result_json_shape() {
        let item = eps_density_core::WorkItem::new("/content/dam/a.eps");
        let result = ItemResult::from_outcome(
            &item,
            &StepOutcome::Decided(eps_density_core::DensityDecision::Dpi1000),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "decided");
        assert_eq!(json["decision"], "1000");
        assert!(json.get("error").is_none());
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn fixture_file(yaml: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", yaml).unwrap();
        file
    }

    #[test]
    fn test_classify_label_empty_is_none() {
        assert_eq!(classify_label(&[], false), "none");
        assert_eq!(classify_label(&[], true), "none");
    }

    #[test]
    fn test_classify_label_single_tags() {
        let drawing = tags(&["eaton:resources/technical-resources/drawings"]);
        assert_eq!(classify_label(&drawing, false), "1000");
        assert_eq!(classify_label(&drawing, true), "1000");

        let guide = tags(&["eaton:resources/technical-resources/product-specification-guides"]);
        assert_eq!(classify_label(&guide, false), "300");

        let other = tags(&["eaton:resources/other-category/unrelated"]);
        assert_eq!(classify_label(&other, false), "none");
    }

    #[test]
    fn test_classify_label_boundary_pair() {
        let split = tags(&["eaton:resources/technical-", "resources/wiring-diagrams"]);
        assert_eq!(classify_label(&split, false), "1000");
        assert_eq!(classify_label(&split, true), "none");
    }

    #[test]
    fn test_classify_label_group_one_wins() {
        let mixed = tags(&[
            "eaton:resources/marketing-resources/illustrations",
            "eaton:resources/technical-resources/time-current-curves",
        ]);
        assert_eq!(classify_label(&mixed, false), "1000");
        assert_eq!(classify_label(&mixed, true), "1000");
    }

    #[tokio::test]
    async fn test_run_fixture_reports_each_item() {
        let file = fixture_file(
            r#"
assets:
  - path: /content/dam/a.eps
    content_types: eaton:resources/technical-resources/time-current-curves
  - path: /content/dam/b.eps
    content_types:
      - eaton:resources/marketing-resources/illustrations
  - path: /content/dam/c.eps
work_items:
  - payload_path: /content/dam/a.eps
  - payload_path: /content/dam/b.eps/jcr:content
  - payload_path: /content/dam/c.eps
  - payload_path: /content/dam/missing.eps
"#,
        );

        let (label, mode, results) = run_fixture(file.path(), None).await.unwrap();

        assert_eq!(label, "Eaton - EPS Density Decider");
        assert_eq!(mode, MatchMode::Substring);
        assert_eq!(results.len(), 4);

        assert_eq!(results[0].status, "decided");
        assert_eq!(results[0].decision.as_deref(), Some("1000"));
        assert_eq!(results[1].status, "decided");
        assert_eq!(results[1].decision.as_deref(), Some("300"));
        assert_eq!(results[2].status, "unchanged");
        assert!(results[2].decision.is_none());
        assert_eq!(results[3].status, "aborted");
        assert!(results[3]
            .error
            .as_deref()
            .is_some_and(|e| e.contains("/content/dam/missing.eps")));
    }

    #[tokio::test]
    async fn test_run_fixture_without_assets_aborts_every_item() {
        let file = fixture_file(
            r#"
assets: []
work_items:
  - payload_path: /content/dam/a.eps
  - payload_path: /content/dam/b.eps
"#,
        );

        let (_, _, results) = run_fixture(file.path(), None).await.unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.status == "aborted"));
        assert!(results.iter().all(|r| r.decision.is_none()));
    }

    #[tokio::test]
    async fn test_run_fixture_honours_config() {
        let assets = fixture_file(
            r#"
assets:
  - path: /content/dam/q.eps
    content_types:
      - eaton:resources/technical-
      - resources/drawings
work_items:
  - payload_path: /content/dam/q.eps
"#,
        );
        let config = fixture_file("match_mode: exact_tag\n");

        let (_, mode, results) = run_fixture(assets.path(), Some(config.path()))
            .await
            .unwrap();

        assert_eq!(mode, MatchMode::ExactTag);
        assert_eq!(results[0].status, "unchanged");
    }

    #[tokio::test]
    async fn test_run_fails_on_missing_fixture() {
        let err = run_fixture(Path::new("/nonexistent/assets.yaml"), None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/assets.yaml"));
    }
}
