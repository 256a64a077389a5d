//! Rule-based market classification over barrier and opportunity.

use flavorpulse_core::TrendSignal;

use crate::types::{ContentGap, FreshnessAnalysis, MarketType};

const REASON_SMALL_SAMPLE: &str = "Very few videos cover this ingredient combination. \
     View counts from broader single-ingredient content do not indicate competition here.";
const REASON_HIGH_BARRIER: &str = "Established channels dominate this topic with high view counts \
     and few new uploads ranking. New videos will struggle for visibility.";
const REASON_BARRIER_LOW_OPPORTUNITY: &str = "Competition is significant and the upside does not \
     justify it. Existing videos already satisfy most of the demand.";
const REASON_EMERGING: &str = "Interest is accelerating and recent uploads are gaining traction. \
     Publishing soon can ride the momentum.";
const REASON_UNDERSERVED: &str = "Viewers are watching this topic but competition is light. \
     A well-made video has a clear path to rank.";
const REASON_NICHE: &str = "A small, accessible niche with proven interest. \
     Low competition makes it easy to stand out.";
const REASON_BALANCED: &str = "Demand and competition are roughly matched. \
     Success depends on differentiation and execution.";

/// Timing points used by the emerging-market rule.
///
/// Computed independently of the opportunity scorer's capped timing bonus:
/// growth tiers use inclusive breakpoints and the freshness half comes from
/// the emerging-topic flag, with no cap. The two can disagree at the margins.
#[must_use]
pub fn classifier_timing(trend: Option<&TrendSignal>, freshness: &FreshnessAnalysis) -> u8 {
    let external = trend.map_or(0, |t| {
        let growth = t.growth_pct();
        if t.is_breakout {
            15
        } else if growth >= 30.0 {
            10
        } else if growth >= 10.0 {
            5
        } else {
            0
        }
    });
    let fresh = if freshness.is_emerging_topic { 10 } else { 0 };
    external + fresh
}

/// Classifies the market; the first matching rule wins.
///
/// 1. three or more terms with fewer than 10 samples → underserved
/// 2. barrier > 60 → saturated
/// 3. barrier > 40 and opportunity < 40 → saturated
/// 4. opportunity > 60 and timing ≥ 15 → emerging
/// 5. barrier < 40 and opportunity > 50 → underserved
/// 6. barrier < 30 and opportunity ≥ 30 → underserved (niche)
/// 7. balanced
#[must_use]
pub fn classify(
    barrier: u8,
    opportunity: u8,
    freshness: &FreshnessAnalysis,
    sample_size: usize,
    term_count: usize,
    trend: Option<&TrendSignal>,
) -> ContentGap {
    let (market_type, reasoning) = if term_count >= 3 && sample_size < 10 {
        (MarketType::Underserved, REASON_SMALL_SAMPLE)
    } else if barrier > 60 {
        (MarketType::Saturated, REASON_HIGH_BARRIER)
    } else if barrier > 40 && opportunity < 40 {
        (MarketType::Saturated, REASON_BARRIER_LOW_OPPORTUNITY)
    } else if opportunity > 60 && classifier_timing(trend, freshness) >= 15 {
        (MarketType::Emerging, REASON_EMERGING)
    } else if barrier < 40 && opportunity > 50 {
        (MarketType::Underserved, REASON_UNDERSERVED)
    } else if barrier < 30 && opportunity >= 30 {
        (MarketType::Underserved, REASON_NICHE)
    } else {
        (MarketType::Balanced, REASON_BALANCED)
    };

    tracing::debug!(
        barrier,
        opportunity,
        sample_size,
        term_count,
        market_type = %market_type,
        "market classified"
    );

    ContentGap {
        score: opportunity.min(100),
        market_type,
        reasoning: reasoning.to_string(),
    }
}
