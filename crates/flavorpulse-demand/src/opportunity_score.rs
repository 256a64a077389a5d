//! Opportunity score: how worthwhile a new video on this topic would be.

use flavorpulse_core::TrendSignal;
use serde::Serialize;

use crate::types::{FreshnessAnalysis, MarketMetrics};

const MAX_TIMING_BONUS: u8 = 25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OpportunityScore {
    /// 0–35, inverse of the barrier.
    pub accessibility: u8,
    /// 5–25, proof that an audience exists.
    pub demand_validation: u8,
    /// 0–25, external momentum plus recent-upload outperformance.
    pub timing: u8,
    /// 0–15, specificity of the search.
    pub niche_advantage: u8,
    pub total: u8,
}

#[must_use]
pub fn score(
    barrier: u8,
    metrics: &MarketMetrics,
    freshness: &FreshnessAnalysis,
    term_count: usize,
    trend: Option<&TrendSignal>,
) -> OpportunityScore {
    let accessibility = match barrier {
        0..=20 => 35,
        21..=40 => 28,
        41..=60 => 18,
        61..=80 => 8,
        _ => 0,
    };

    // Never zero: any positive view count proves some audience.
    let demand_validation = match metrics.avg_views {
        50_000.. => 25,
        20_000..=49_999 => 20,
        10_000..=19_999 => 15,
        5_000..=9_999 => 10,
        _ => 5,
    };

    let timing = timing_bonus(metrics, freshness, trend);

    let mut niche_advantage = match term_count {
        0 | 1 => 0,
        2 => 5,
        _ => 10,
    };
    if metrics.item_count < 10 && metrics.avg_views >= 10_000 {
        niche_advantage += 5;
    }

    let total = (accessibility + demand_validation + timing + niche_advantage).min(100);

    OpportunityScore {
        accessibility,
        demand_validation,
        timing,
        niche_advantage,
        total,
    }
}

/// External momentum (breakout 15, growth >30% 10, growth >10% 5) plus 10
/// when recent uploads beat the overall average by more than 20%, capped at 25.
fn timing_bonus(
    metrics: &MarketMetrics,
    freshness: &FreshnessAnalysis,
    trend: Option<&TrendSignal>,
) -> u8 {
    let external = trend.map_or(0, |t| {
        let growth = t.growth_pct();
        if t.is_breakout {
            15
        } else if growth > 30.0 {
            10
        } else if growth > 10.0 {
            5
        } else {
            0
        }
    });

    #[allow(clippy::cast_precision_loss)]
    let recent_outperforms = metrics.avg_views > 0
        && freshness.recent_avg_views as f64 > metrics.avg_views as f64 * 1.2;
    let freshness_bonus = if recent_outperforms { 10 } else { 0 };

    (external + freshness_bonus).min(MAX_TIMING_BONUS)
}
