//! Recency distribution and the "emerging topic" flag.

use chrono::{DateTime, Utc};
use flavorpulse_core::ContentItem;

use crate::stats::{mean, round_u64};
use crate::types::FreshnessAnalysis;

/// Items younger than this many days are "recent".
pub const RECENT_WINDOW_DAYS: i64 = 90;

/// Splits items into recent and older and compares their performance.
///
/// A topic is emerging only when recent uploads are a meaningful share of
/// supply (at least 30%) AND they hold their own against older uploads (at
/// least half the older average, and above zero). Undated items are treated
/// as older. Zero-view items count toward `recent_item_count` but not toward
/// either average.
#[must_use]
pub fn analyze(items: &[&ContentItem], now: DateTime<Utc>) -> FreshnessAnalysis {
    let ages: Vec<u64> = items
        .iter()
        .filter_map(|i| i.age_days(now))
        .map(|d| u64::try_from(d).unwrap_or(0))
        .collect();

    let (recent, older): (Vec<&ContentItem>, Vec<&ContentItem>) = items
        .iter()
        .copied()
        .partition(|i| i.age_days(now).is_some_and(|d| d < RECENT_WINDOW_DAYS));

    let recent_views = positive_views(&recent);
    let older_views = positive_views(&older);
    let recent_avg = mean(&recent_views);
    let older_avg = mean(&older_views);

    // recent / total >= 0.3, kept in integers.
    let enough_supply = !items.is_empty() && recent.len() * 10 >= items.len() * 3;
    let holds_up = recent_avg > 0.0 && recent_avg >= older_avg * 0.5;

    FreshnessAnalysis {
        avg_age_days: round_u64(mean(&ages)),
        recent_item_count: recent.len(),
        recent_avg_views: round_u64(recent_avg),
        older_avg_views: round_u64(older_avg),
        is_emerging_topic: enough_supply && holds_up,
    }
}

fn positive_views(items: &[&ContentItem]) -> Vec<u64> {
    items
        .iter()
        .map(|i| i.view_count)
        .filter(|&v| v > 0)
        .collect()
}
