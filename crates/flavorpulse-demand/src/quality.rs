//! Top-versus-bottom performance spread.

use flavorpulse_core::ContentItem;

use crate::stats::{mean, round2, round_u64};
use crate::types::QualityDistribution;

const MAX_OUTLIER_RATIO: f64 = 100.0;

/// Compares the top decile against the bottom half of positive view counts.
///
/// With fewer than three positive counts the ratio is `0` and top/bottom are
/// simply the highest and lowest available values.
#[must_use]
pub fn analyze(items: &[&ContentItem]) -> QualityDistribution {
    let mut views: Vec<u64> = items
        .iter()
        .map(|i| i.view_count)
        .filter(|&v| v > 0)
        .collect();
    views.sort_unstable_by(|a, b| b.cmp(a));

    if views.len() < 3 {
        return QualityDistribution {
            top_performer_views: views.first().copied().unwrap_or(0),
            bottom_performer_views: views.last().copied().unwrap_or(0),
            outlier_ratio: 0.0,
        };
    }

    let n = views.len();
    let top_n = (n / 10).max(1);
    let bottom_n = (n / 2).max(1);

    let top = mean(&views[..top_n]);
    let bottom = mean(&views[n - bottom_n..]);

    let outlier_ratio = if bottom > 0.0 {
        (top / bottom).min(MAX_OUTLIER_RATIO)
    } else if top > 0.0 {
        MAX_OUTLIER_RATIO
    } else {
        0.0
    };

    QualityDistribution {
        top_performer_views: round_u64(top),
        bottom_performer_views: round_u64(bottom),
        outlier_ratio: round2(outlier_ratio),
    }
}
