//! Final demand score, band, and confidence.
//!
//! A weighted sum with two modes. When an external trend signal with positive
//! interest is available, the view-based terms are scaled down to make room
//! for up to 20 trend points; otherwise the view-based terms carry the weight.

use flavorpulse_core::TrendSignal;

use crate::stats::{clamp_score, log10_floor0, round2};
use crate::types::{ContentGap, DemandBand, FreshnessAnalysis, MarketMetrics};

/// Weights for one scoring mode.
struct Weights {
    volume_multiplier: f64,
    volume_cap: f64,
    gap_weight: f64,
    velocity_multiplier: f64,
    velocity_cap: f64,
}

const WITH_TRENDS: Weights = Weights {
    volume_multiplier: 6.0,
    volume_cap: 30.0,
    gap_weight: 0.30,
    velocity_multiplier: 3.33,
    velocity_cap: 10.0,
};

const WITHOUT_TRENDS: Weights = Weights {
    volume_multiplier: 8.0,
    volume_cap: 40.0,
    gap_weight: 0.35,
    velocity_multiplier: 5.0,
    velocity_cap: 15.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Composition {
    pub score: u8,
    pub band: DemandBand,
    /// Trend points included in `score`, when a trend signal was used.
    pub trends_boost: Option<u8>,
}

/// Blends volume, gap score, velocity, freshness, and trend points.
#[must_use]
pub fn compose(
    metrics: &MarketMetrics,
    gap: &ContentGap,
    freshness: &FreshnessAnalysis,
    trend: Option<&TrendSignal>,
) -> Composition {
    let trend = trend.filter(|t| t.has_interest());
    let weights = if trend.is_some() {
        &WITH_TRENDS
    } else {
        &WITHOUT_TRENDS
    };

    let volume =
        (log10_floor0(metrics.avg_views) * weights.volume_multiplier).min(weights.volume_cap);
    let gap_points = f64::from(gap.score) * weights.gap_weight;
    let velocity = (log10_floor0(metrics.avg_views_per_day) * weights.velocity_multiplier)
        .min(weights.velocity_cap);
    let trend_bonus = trend.map(trend_points);
    let freshness_points = freshness_bonus(metrics, freshness);

    let raw = volume + gap_points + velocity + trend_bonus.unwrap_or(0.0) + freshness_points;
    let score = clamp_score(raw);
    let band = DemandBand::derive(score, metrics.item_count, gap.market_type);

    tracing::debug!(
        volume,
        gap_points,
        velocity,
        freshness_points,
        trend_points = trend_bonus.unwrap_or(0.0),
        score,
        band = %band,
        "demand score composed"
    );

    Composition {
        score,
        band,
        trends_boost: trend_bonus.map(clamp_score),
    }
}

/// Up to 10 from interest, up to 5 from growth, and 5 for a breakout.
fn trend_points(trend: &TrendSignal) -> f64 {
    let interest = (trend.interest_score.clamp(0.0, 100.0) / 10.0).min(10.0);
    let growth = trend.growth_pct();
    let growth_points = if growth > 50.0 {
        5.0
    } else if growth > 20.0 {
        3.0
    } else if growth > 0.0 {
        1.0
    } else {
        0.0
    };
    let breakout = if trend.is_breakout { 5.0 } else { 0.0 };
    interest + growth_points + breakout
}

fn freshness_bonus(metrics: &MarketMetrics, freshness: &FreshnessAnalysis) -> f64 {
    if freshness.is_emerging_topic {
        10.0
    } else if freshness.recent_avg_views > metrics.avg_views {
        5.0
    } else {
        0.0
    }
}

/// Confidence from sample size and trend availability, optionally blended
/// with a calibrated historical success rate.
///
/// Base: `0.2 + 0.6 × min(1, n / 30)`, plus `0.1` with trend data, capped at
/// `0.9`. With a success rate `r`, the result is `0.7 × base + 0.3 × r`.
#[must_use]
pub fn confidence(sample_size: usize, used_trends: bool, success_rate: Option<f64>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let coverage = (sample_size as f64 / 30.0).min(1.0);
    let mut base = 0.2 + 0.6 * coverage;
    if used_trends {
        base += 0.1;
    }
    let base = base.min(0.9);

    let blended = match success_rate.filter(|r| r.is_finite()) {
        Some(rate) => 0.7 * base + 0.3 * rate.clamp(0.0, 1.0),
        None => base,
    };
    round2(blended.clamp(0.0, 1.0))
}
