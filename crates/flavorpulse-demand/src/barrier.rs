//! Competition barrier: how hard it is for a new video to rank.
//!
//! A literal point table, not a continuous formula. Breakpoints are part of
//! the output contract.

use serde::Serialize;

use crate::stats::fraction;
use crate::types::{FreshnessAnalysis, MarketMetrics};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BarrierScore {
    /// 0–40, from average views.
    pub view_barrier: u8,
    /// 0–30, from how little recent supply there is.
    pub incumbent_advantage: u8,
    /// 0–20, from raw item count.
    pub supply_pressure: u8,
    /// 0–10, old catalog with almost no new uploads.
    pub algorithm_lock_in: u8,
    /// Sum of the above, clamped to 0–100.
    pub total: u8,
}

#[must_use]
pub fn score(metrics: &MarketMetrics, freshness: &FreshnessAnalysis) -> BarrierScore {
    let view_barrier = match metrics.avg_views {
        1_000_000.. => 40,
        500_000..=999_999 => 35,
        100_000..=499_999 => 30,
        50_000..=99_999 => 20,
        10_000..=49_999 => 10,
        _ => 0,
    };

    let recent_share = fraction(freshness.recent_item_count, metrics.item_count);
    let incumbent_advantage = if recent_share < 0.10 {
        30
    } else if recent_share < 0.20 {
        20
    } else if recent_share < 0.40 {
        10
    } else {
        0
    };

    let supply_pressure = match metrics.item_count {
        51.. => 20,
        31..=50 => 15,
        16..=30 => 10,
        6..=15 => 5,
        _ => 0,
    };

    let algorithm_lock_in = if freshness.avg_age_days > 365 && freshness.recent_item_count < 3 {
        10
    } else {
        0
    };

    let total = (view_barrier + incumbent_advantage + supply_pressure + algorithm_lock_in).min(100);

    BarrierScore {
        view_barrier,
        incumbent_advantage,
        supply_pressure,
        algorithm_lock_in,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(avg_views: u64, item_count: usize) -> MarketMetrics {
        MarketMetrics {
            avg_views,
            item_count,
            ..MarketMetrics::default()
        }
    }

    fn freshness(recent: usize, avg_age_days: u64) -> FreshnessAnalysis {
        FreshnessAnalysis {
            recent_item_count: recent,
            avg_age_days,
            ..FreshnessAnalysis::default()
        }
    }

    #[test]
    fn view_barrier_breakpoints() {
        let f = freshness(100, 10);
        let cases = [
            (1_000_000, 40),
            (999_999, 35),
            (500_000, 35),
            (100_000, 30),
            (99_999, 20),
            (50_000, 20),
            (10_000, 10),
            (9_999, 0),
        ];
        for (avg, expected) in cases {
            assert_eq!(score(&metrics(avg, 5), &f).view_barrier, expected, "avg {avg}");
        }
    }

    #[test]
    fn incumbent_advantage_breakpoints() {
        let cases = [(0, 30), (9, 30), (10, 20), (19, 20), (20, 10), (39, 10), (40, 0)];
        for (recent, expected) in cases {
            let b = score(&metrics(0, 100), &freshness(recent, 10));
            assert_eq!(b.incumbent_advantage, expected, "recent {recent}/100");
        }
    }

    #[test]
    fn supply_pressure_breakpoints() {
        let cases = [(51, 20), (50, 15), (31, 15), (30, 10), (16, 10), (15, 5), (6, 5), (5, 0)];
        for (count, expected) in cases {
            let b = score(&metrics(0, count), &freshness(count, 10));
            assert_eq!(b.supply_pressure, expected, "count {count}");
        }
    }

    #[test]
    fn lock_in_requires_old_catalog_and_few_recent() {
        assert_eq!(score(&metrics(0, 10), &freshness(2, 366)).algorithm_lock_in, 10);
        assert_eq!(score(&metrics(0, 10), &freshness(3, 366)).algorithm_lock_in, 0);
        assert_eq!(score(&metrics(0, 10), &freshness(0, 365)).algorithm_lock_in, 0);
    }

    #[test]
    fn saturated_single_term_scenario() {
        // 40 items averaging 200k views with only 2 recent uploads.
        let b = score(&metrics(200_000, 40), &freshness(2, 200));
        assert_eq!(b.view_barrier, 30);
        assert_eq!(b.incumbent_advantage, 30);
        assert_eq!(b.supply_pressure, 15);
        assert_eq!(b.total, 75);
    }

    #[test]
    fn maximum_barrier_is_one_hundred() {
        let b = score(&metrics(2_000_000, 80), &freshness(0, 900));
        assert_eq!(b.total, 100);
    }
}
