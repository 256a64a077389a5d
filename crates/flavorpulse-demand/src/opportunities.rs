//! Typed, prioritized content opportunities derived from the analysis.

use flavorpulse_core::TrendSignal;

use crate::types::{
    ContentGap, ContentOpportunity, FreshnessAnalysis, MarketMetrics, MarketType,
    OpportunityKind, Priority, QualityDistribution,
};

/// Emits every opportunity flag whose conditions hold, highest priority first.
///
/// Flags that imply room for a new entrant (`quality_gap`, `freshness_gap`,
/// the growing-topic `trending` variant) are suppressed for saturated markets.
#[must_use]
pub fn generate(
    metrics: &MarketMetrics,
    quality: &QualityDistribution,
    freshness: &FreshnessAnalysis,
    gap: &ContentGap,
    trend: Option<&TrendSignal>,
) -> Vec<ContentOpportunity> {
    let saturated = gap.market_type == MarketType::Saturated;
    let mut out = Vec::new();

    #[allow(clippy::cast_precision_loss)]
    let weak_bottom =
        (quality.bottom_performer_views as f64) < quality.top_performer_views as f64 * 0.1;
    if !saturated && quality.outlier_ratio > 15.0 && weak_bottom {
        out.push(ContentOpportunity::new(
            OpportunityKind::QualityGap,
            Priority::Medium,
            "Quality gap",
            format!(
                "Top videos average {} views while the bottom half averages {}. \
                 Most existing content underdelivers; a polished video can stand out.",
                quality.top_performer_views, quality.bottom_performer_views
            ),
        ));
    }

    if !saturated
        && gap.market_type != MarketType::Balanced
        && freshness.recent_item_count < 3
        && metrics.avg_views > 30_000
        && metrics.avg_views < 300_000
        && metrics.item_count < 15
    {
        out.push(ContentOpportunity::new(
            OpportunityKind::FreshnessGap,
            Priority::High,
            "Fresh take needed",
            format!(
                "Only {} recent videos despite {} average views. \
                 Viewers are watching older content; a new upload fills the gap.",
                freshness.recent_item_count, metrics.avg_views
            ),
        ));
    }

    match gap.market_type {
        MarketType::Underserved => out.push(ContentOpportunity::new(
            OpportunityKind::Underserved,
            Priority::High,
            "Underserved topic",
            gap.reasoning.clone(),
        )),
        MarketType::Emerging => out.push(ContentOpportunity::new(
            OpportunityKind::Trending,
            Priority::High,
            "Emerging trend",
            gap.reasoning.clone(),
        )),
        MarketType::Saturated | MarketType::Balanced => {}
    }

    if !saturated
        && gap.market_type != MarketType::Emerging
        && freshness.is_emerging_topic
        && freshness.recent_avg_views > 10_000
    {
        out.push(ContentOpportunity::new(
            OpportunityKind::Trending,
            Priority::Medium,
            "Growing topic",
            format!(
                "{} recent videos average {} views. Interest in this topic is building.",
                freshness.recent_item_count, freshness.recent_avg_views
            ),
        ));
    }

    if let Some(t) = trend {
        let growth = t.growth_pct();
        if t.is_breakout && growth > 10.0 {
            out.push(ContentOpportunity::new(
                OpportunityKind::GoogleBreakout,
                Priority::High,
                "Search breakout",
                format!(
                    "Search interest is breaking out ({growth:.0}% week over week). \
                     Publish while the spike lasts."
                ),
            ));
        }

        if !t.is_breakout && growth > 30.0 && freshness.recent_item_count < 5 {
            out.push(ContentOpportunity::new(
                OpportunityKind::VelocityMismatch,
                Priority::Medium,
                "Search outpacing supply",
                format!(
                    "Searches grew {growth:.0}% week over week but only {} videos were \
                     published recently.",
                    freshness.recent_item_count
                ),
            ));
        }
    }

    // Stable sort keeps emission order within a priority.
    out.sort_by_key(|o| o.priority);
    out
}
