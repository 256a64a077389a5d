//! `batch` command: score many combinations concurrently.
//!
//! Reading inputs and scoring are both blocking, so each combination runs on
//! the blocking pool and the stream is bounded by `max_concurrent_scores`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use flavorpulse_core::AppConfig;
use flavorpulse_demand::{
    compute_demand_signal_with, AliasTable, CalibrationFile, DemandSignal, ScoringContext,
    SearchTerms,
};

use crate::inputs;

#[derive(Debug, Deserialize)]
pub(crate) struct BatchFile {
    /// Shared evaluation time; defaults to the moment the batch starts.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    pub combinations: Vec<Combination>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Combination {
    pub name: String,
    pub terms: Vec<String>,
    /// Items JSON, relative to the batch file.
    pub items: PathBuf,
    #[serde(default)]
    pub trend: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BatchResult {
    pub name: String,
    pub terms: SearchTerms,
    pub signal: DemandSignal,
}

/// Parses and validates a batch file.
///
/// # Errors
///
/// Returns an error if the YAML is malformed, lists no combinations, or
/// repeats a name or has a combination without usable terms.
pub(crate) fn parse_batch(content: &str) -> anyhow::Result<BatchFile> {
    let batch: BatchFile = serde_yaml::from_str(content).context("invalid batch YAML")?;
    if batch.combinations.is_empty() {
        anyhow::bail!("batch file lists no combinations");
    }

    let mut seen = HashSet::new();
    for combination in &batch.combinations {
        let name = combination.name.trim();
        if name.is_empty() {
            anyhow::bail!("combination name must be non-empty");
        }
        if !seen.insert(name.to_lowercase()) {
            anyhow::bail!("duplicate combination name: '{name}'");
        }
        if SearchTerms::new(&combination.terms).is_empty() {
            anyhow::bail!("combination '{name}' has no search terms");
        }
    }
    Ok(batch)
}

/// Scores every combination in `path`, preserving file order in the output.
///
/// # Errors
///
/// Returns an error if the batch file or any referenced input cannot be
/// loaded, or a scoring task panics.
pub(crate) async fn run_batch(config: &AppConfig, path: &Path) -> anyhow::Result<Vec<BatchResult>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read batch file {}", path.display()))?;
    let batch = parse_batch(&raw)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let aliases = Arc::new(inputs::build_alias_table(config)?);
    let calibration = Arc::new(inputs::load_calibration(config));
    let now = batch.now.unwrap_or_else(Utc::now);

    score_all(
        batch.combinations,
        base_dir,
        now,
        &aliases,
        &calibration,
        config.max_concurrent_scores.max(1),
    )
    .await
}

pub(crate) async fn score_all(
    combinations: Vec<Combination>,
    base_dir: &Path,
    now: DateTime<Utc>,
    aliases: &Arc<AliasTable>,
    calibration: &Arc<Option<CalibrationFile>>,
    max_concurrent: usize,
) -> anyhow::Result<Vec<BatchResult>> {
    let total = combinations.len();
    let mut results: Vec<(usize, BatchResult)> = stream::iter(combinations.into_iter().enumerate())
        .map(|(idx, combination)| {
            let aliases = Arc::clone(aliases);
            let calibration = Arc::clone(calibration);
            let items_path = base_dir.join(&combination.items);
            let trend_path = combination.trend.as_ref().map(|t| base_dir.join(t));
            async move {
                let terms = SearchTerms::new(&combination.terms);
                let name = combination.name;

                // File reads and scoring both stay off the async workers.
                let signal = tokio::task::spawn_blocking({
                    let terms = terms.clone();
                    move || -> anyhow::Result<DemandSignal> {
                        let items = inputs::read_items(&items_path)?;
                        let trend = trend_path.as_deref().map(inputs::read_trend).transpose()?;
                        let mut ctx = ScoringContext::new(now, &aliases);
                        if let Some(source) = &*calibration {
                            ctx = ctx.with_calibration(source);
                        }
                        Ok(compute_demand_signal_with(&items, &terms, trend.as_ref(), &ctx))
                    }
                })
                .await
                .with_context(|| format!("scoring task for '{name}' failed"))??;

                tracing::info!(
                    combination = %name,
                    score = signal.demand_score,
                    band = %signal.demand_band,
                    "combination scored"
                );
                anyhow::Ok((idx, BatchResult { name, terms, signal }))
            }
        })
        .buffer_unordered(max_concurrent)
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<anyhow::Result<_>>()?;

    results.sort_by_key(|(idx, _)| *idx);
    tracing::info!(total, "batch complete");
    Ok(results.into_iter().map(|(_, r)| r).collect())
}
