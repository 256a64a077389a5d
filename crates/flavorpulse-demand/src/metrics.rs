//! Volume, central-tendency, and velocity statistics over relevant items.

use chrono::{DateTime, Utc};
use flavorpulse_core::ContentItem;

use crate::stats::{mean, round_u64};
use crate::types::MarketMetrics;

#[cfg(test)]
thread_local! {
    static INVOCATIONS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Number of [`compute`] calls made on the current thread.
#[cfg(test)]
pub(crate) fn invocations() -> usize {
    INVOCATIONS.with(std::cell::Cell::get)
}

/// Aggregates view statistics for the filtered item set.
///
/// Items with zero views count toward `item_count` but are excluded from
/// every other figure. Velocity is the mean of per-item
/// `views / max(1, age_days)`, so one old blockbuster cannot dominate it;
/// undated items are left out of the velocity mean.
#[must_use]
pub fn compute(items: &[&ContentItem], now: DateTime<Utc>) -> MarketMetrics {
    #[cfg(test)]
    INVOCATIONS.with(|c| c.set(c.get() + 1));

    let item_count = items.len();
    let mut views: Vec<u64> = items
        .iter()
        .map(|i| i.view_count)
        .filter(|&v| v > 0)
        .collect();

    if views.is_empty() {
        return MarketMetrics::counted(item_count);
    }

    let total_views = views.iter().fold(0u64, |acc, &v| acc.saturating_add(v));
    let avg_views = round_u64(mean(&views));

    views.sort_unstable();
    let median_views = median_of_sorted(&views);

    #[allow(clippy::cast_precision_loss)]
    let velocities: Vec<f64> = items
        .iter()
        .filter(|i| i.view_count > 0)
        .filter_map(|i| {
            i.age_days(now)
                .map(|age| i.view_count as f64 / age.max(1) as f64)
        })
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let avg_views_per_day = if velocities.is_empty() {
        0
    } else {
        round_u64(velocities.iter().sum::<f64>() / velocities.len() as f64)
    };

    MarketMetrics {
        total_views,
        avg_views,
        median_views,
        avg_views_per_day,
        item_count,
    }
}

/// Median of an ascending slice; even lengths average the middle pair.
fn median_of_sorted(sorted: &[u64]) -> u64 {
    let n = sorted.len();
    match n {
        0 => 0,
        _ if n % 2 == 1 => sorted.get(n / 2).copied().unwrap_or(0),
        _ => {
            let lo = sorted.get(n / 2 - 1).copied().unwrap_or(0);
            let hi = sorted.get(n / 2).copied().unwrap_or(0);
            round_u64(mean(&[lo, hi]))
        }
    }
}
