//! Demand pipeline orchestration.

use chrono::{DateTime, Utc};
use flavorpulse_core::{ContentItem, TrendSignal};

use crate::calibration::CalibrationSource;
use crate::matcher::AliasTable;
use crate::relevance::{self, FilteredItems};
use crate::types::{
    ContentGap, ContentOpportunity, DemandBand, DemandSignal, MarketMetrics, MarketType,
    OpportunityKind, Priority, SearchTerms,
};
use crate::{
    barrier, classifier, composer, freshness, metrics, opportunities, opportunity_score, quality,
};

/// Below this many relevant items aggregate statistics are not trusted.
const MIN_ITEMS_FOR_ANALYSIS: usize = 3;

/// Multi-term searches with fewer relevant items than this, none of which
/// mention every term, are reported as unproven.
const UNPROVEN_MAX_ITEMS: usize = 15;
const UNPROVEN_MIN_TERMS: usize = 3;
const UNPROVEN_SCORE: u8 = 25;

const CONFIDENCE_NO_MATCHES: f64 = 0.1;
const CONFIDENCE_SPARSE: f64 = 0.15;
const CONFIDENCE_UNPROVEN: f64 = 0.3;

const REASON_NO_ITEMS: &str = "No videos were supplied for this search.";
const REASON_NO_MATCHES: &str =
    "No existing videos cover this combination. Demand is unproven but competition is absent.";
const REASON_SPARSE: &str = "Only one or two videos cover this combination. \
     There is almost no competition, and too little data to measure demand.";
const REASON_UNPROVEN: &str = "Few videos mention every ingredient together. \
     View counts come from partial matches and do not prove demand for the combination.";

/// Everything a scoring run needs besides its inputs.
#[derive(Clone, Copy)]
pub struct ScoringContext<'a> {
    pub now: DateTime<Utc>,
    pub aliases: &'a AliasTable,
    pub calibration: Option<&'a dyn CalibrationSource>,
}

impl<'a> ScoringContext<'a> {
    #[must_use]
    pub fn new(now: DateTime<Utc>, aliases: &'a AliasTable) -> Self {
        Self {
            now,
            aliases,
            calibration: None,
        }
    }

    #[must_use]
    pub fn with_calibration(mut self, calibration: &'a dyn CalibrationSource) -> Self {
        self.calibration = Some(calibration);
        self
    }
}

impl ScoringContext<'static> {
    /// Context at a fixed instant using the built-in alias table.
    #[must_use]
    pub fn at(now: DateTime<Utc>) -> Self {
        Self::new(now, AliasTable::builtin())
    }
}

impl std::fmt::Debug for ScoringContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringContext")
            .field("now", &self.now)
            .field("aliases", &self.aliases.len())
            .field("calibrated", &self.calibration.is_some())
            .finish()
    }
}

/// Scores demand for one ingredient combination as of now.
///
/// Uses the built-in alias table and no calibration. See
/// [`compute_demand_signal_with`] for a reproducible variant.
#[must_use]
pub fn compute_demand_signal(
    items: &[ContentItem],
    terms: &SearchTerms,
    trend: Option<&TrendSignal>,
) -> DemandSignal {
    compute_demand_signal_with(items, terms, trend, &ScoringContext::at(Utc::now()))
}

/// Scores demand for one ingredient combination.
///
/// 1. Keep items that mention enough of the search terms.
/// 2. Short-circuit empty, sparse, and unproven result sets.
/// 3. Compute metrics, quality spread, and freshness.
/// 4. Score the competition barrier and the opportunity.
/// 5. Classify the market.
/// 6. Compose the demand score, band, and confidence.
/// 7. Emit content opportunities.
///
/// The result depends only on the arguments, so identical inputs with the
/// same `ctx.now` always produce identical output.
#[must_use]
pub fn compute_demand_signal_with(
    items: &[ContentItem],
    terms: &SearchTerms,
    trend: Option<&TrendSignal>,
    ctx: &ScoringContext<'_>,
) -> DemandSignal {
    if items.is_empty() || terms.is_empty() {
        tracing::debug!(
            items = items.len(),
            terms = terms.len(),
            "nothing to score; returning empty signal"
        );
        return empty_signal();
    }

    let filtered = relevance::filter(items, terms, ctx.aliases);

    if let Some(signal) = early_exit(&filtered, terms) {
        return signal;
    }

    full_signal(&filtered, terms.len(), trend, ctx)
}

fn empty_signal() -> DemandSignal {
    DemandSignal {
        demand_score: 0,
        demand_band: DemandBand::Unknown,
        market_metrics: MarketMetrics::default(),
        content_gap: ContentGap {
            score: 0,
            market_type: MarketType::Balanced,
            reasoning: REASON_NO_ITEMS.to_string(),
        },
        opportunities: Vec::new(),
        confidence: 0.0,
        sample_size: 0,
        trends_boost: None,
    }
}

/// Results too thin or too partial for the full pipeline.
fn early_exit(filtered: &FilteredItems<'_>, terms: &SearchTerms) -> Option<DemandSignal> {
    let count = filtered.len();

    if count == 0 {
        tracing::debug!(terms = terms.len(), "no relevant items; untapped combination");
        return Some(short_circuit(
            0,
            0,
            DemandBand::Unknown,
            0,
            REASON_NO_MATCHES,
            CONFIDENCE_NO_MATCHES,
            ContentOpportunity::new(
                OpportunityKind::UntappedCombination,
                Priority::High,
                "Untapped combination",
                "No existing videos pair these ingredients. \
                 A first video would define the topic, though demand is unverified.",
            ),
        ));
    }

    if count < MIN_ITEMS_FOR_ANALYSIS {
        tracing::debug!(relevant = count, "too few relevant items for analysis");
        // 10 or 20: still enough to read as a niche.
        let score = u8::try_from(count * 10).unwrap_or(u8::MAX);
        return Some(short_circuit(
            count,
            score,
            DemandBand::derive(score, count, MarketType::Underserved),
            50,
            REASON_SPARSE,
            CONFIDENCE_SPARSE,
            ContentOpportunity::new(
                OpportunityKind::UntappedCombination,
                Priority::Medium,
                "Nearly untapped combination",
                format!(
                    "Only {count} existing video(s) pair these ingredients. \
                     Early coverage faces almost no competition."
                ),
            ),
        ));
    }

    if terms.len() >= UNPROVEN_MIN_TERMS
        && count < UNPROVEN_MAX_ITEMS
        && filtered.avg_relevance < 1.0
    {
        tracing::debug!(
            relevant = count,
            terms = terms.len(),
            avg_relevance = filtered.avg_relevance,
            "partial matches only; unproven combination"
        );
        return Some(short_circuit(
            count,
            UNPROVEN_SCORE,
            DemandBand::Niche,
            50,
            REASON_UNPROVEN,
            CONFIDENCE_UNPROVEN,
            ContentOpportunity::new(
                OpportunityKind::UnprovenCombination,
                Priority::Medium,
                "Unproven combination",
                format!(
                    "{count} videos mention some of these ingredients, but few use them all. \
                     Test demand with a short-form video before investing in a full recipe."
                ),
            ),
        ));
    }

    None
}

fn short_circuit(
    sample_size: usize,
    demand_score: u8,
    band: DemandBand,
    gap_score: u8,
    reasoning: &str,
    confidence: f64,
    opportunity: ContentOpportunity,
) -> DemandSignal {
    DemandSignal {
        demand_score,
        demand_band: band,
        market_metrics: MarketMetrics::counted(sample_size),
        content_gap: ContentGap {
            score: gap_score,
            market_type: MarketType::Underserved,
            reasoning: reasoning.to_string(),
        },
        opportunities: vec![opportunity],
        confidence,
        sample_size,
        trends_boost: None,
    }
}

fn full_signal(
    filtered: &FilteredItems<'_>,
    term_count: usize,
    trend: Option<&TrendSignal>,
    ctx: &ScoringContext<'_>,
) -> DemandSignal {
    let items = filtered.items.as_slice();
    let sample_size = items.len();

    let market_metrics = metrics::compute(items, ctx.now);
    let quality = quality::analyze(items);
    let freshness = freshness::analyze(items, ctx.now);

    let barrier = barrier::score(&market_metrics, &freshness);
    let opportunity =
        opportunity_score::score(barrier.total, &market_metrics, &freshness, term_count, trend);
    tracing::debug!(
        barrier = barrier.total,
        opportunity = opportunity.total,
        avg_views = market_metrics.avg_views,
        recent = freshness.recent_item_count,
        "barrier and opportunity scored"
    );

    let content_gap = classifier::classify(
        barrier.total,
        opportunity.total,
        &freshness,
        sample_size,
        term_count,
        trend,
    );

    let composition = composer::compose(&market_metrics, &content_gap, &freshness, trend);
    let success_rate = ctx
        .calibration
        .and_then(|c| c.success_rate(composition.band, opportunity.total));
    let confidence =
        composer::confidence(sample_size, composition.trends_boost.is_some(), success_rate);

    let opportunities =
        opportunities::generate(&market_metrics, &quality, &freshness, &content_gap, trend);

    tracing::debug!(
        score = composition.score,
        band = %composition.band,
        market = %content_gap.market_type,
        confidence,
        opportunities = opportunities.len(),
        "demand signal composed"
    );

    DemandSignal {
        demand_score: composition.score,
        demand_band: composition.band,
        market_metrics,
        content_gap,
        opportunities,
        confidence,
        sample_size,
        trends_boost: composition.trends_boost,
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
