use serde::{Deserialize, Serialize};

/// Normalized, de-duplicated search terms in caller order.
///
/// Each term is lowercased, trimmed, and has inner whitespace collapsed to a
/// single space. Empty terms are dropped; the first occurrence of a repeated
/// term wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct SearchTerms(Vec<String>);

impl From<Vec<String>> for SearchTerms {
    fn from(raw: Vec<String>) -> Self {
        Self::new(raw)
    }
}

impl SearchTerms {
    pub fn new<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<String> = Vec::new();
        for term in raw {
            let normalized = normalize_term(term.as_ref());
            if !normalized.is_empty() && !terms.contains(&normalized) {
                terms.push(normalized);
            }
        }
        Self(terms)
    }

    /// Split a comma-separated list (`"soy sauce, garlic"`).
    #[must_use]
    pub fn parse(csv: &str) -> Self {
        Self::new(csv.split(','))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Lowercase, trim, and collapse inner whitespace.
#[must_use]
pub fn normalize_term(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketMetrics {
    pub total_views: u64,
    pub avg_views: u64,
    pub median_views: u64,
    pub avg_views_per_day: u64,
    pub item_count: usize,
}

impl MarketMetrics {
    /// All statistics zeroed, keeping only the item count.
    #[must_use]
    pub fn counted(item_count: usize) -> Self {
        Self {
            item_count,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityDistribution {
    pub top_performer_views: u64,
    pub bottom_performer_views: u64,
    /// Top-decile mean over bottom-half mean, capped at 100.
    pub outlier_ratio: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FreshnessAnalysis {
    pub avg_age_days: u64,
    pub recent_item_count: usize,
    pub recent_avg_views: u64,
    pub older_avg_views: u64,
    pub is_emerging_topic: bool,
}

/// Competitive landscape classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    Underserved,
    Saturated,
    Balanced,
    Emerging,
}

impl std::fmt::Display for MarketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketType::Underserved => write!(f, "underserved"),
            MarketType::Saturated => write!(f, "saturated"),
            MarketType::Balanced => write!(f, "balanced"),
            MarketType::Emerging => write!(f, "emerging"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentGap {
    pub score: u8,
    #[serde(rename = "type")]
    pub market_type: MarketType,
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemandBand {
    Hot,
    Growing,
    Stable,
    Niche,
    Unknown,
}

impl DemandBand {
    /// Derive the band from a final score, the sample size, and the market type.
    ///
    /// A saturated market is capped at [`DemandBand::Stable`]. Below the
    /// `stable` threshold, three or more items (or any items in an
    /// underserved market) make a niche; otherwise the band is unknown.
    #[must_use]
    pub fn derive(score: u8, item_count: usize, market_type: MarketType) -> Self {
        let band = match score {
            75.. => DemandBand::Hot,
            55..=74 => DemandBand::Growing,
            35..=54 => DemandBand::Stable,
            _ if item_count >= 3 => DemandBand::Niche,
            _ if item_count > 0 && market_type == MarketType::Underserved => DemandBand::Niche,
            _ => DemandBand::Unknown,
        };

        if market_type == MarketType::Saturated
            && matches!(band, DemandBand::Hot | DemandBand::Growing)
        {
            DemandBand::Stable
        } else {
            band
        }
    }
}

impl std::fmt::Display for DemandBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemandBand::Hot => write!(f, "hot"),
            DemandBand::Growing => write!(f, "growing"),
            DemandBand::Stable => write!(f, "stable"),
            DemandBand::Niche => write!(f, "niche"),
            DemandBand::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for DemandBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Ok(DemandBand::Hot),
            "growing" => Ok(DemandBand::Growing),
            "stable" => Ok(DemandBand::Stable),
            "niche" => Ok(DemandBand::Niche),
            "unknown" => Ok(DemandBand::Unknown),
            other => Err(format!("unknown demand band '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityKind {
    QualityGap,
    FreshnessGap,
    Underserved,
    Trending,
    GoogleBreakout,
    VelocityMismatch,
    UntappedCombination,
    UnprovenCombination,
}

/// Declaration order is sort order: `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentOpportunity {
    #[serde(rename = "type")]
    pub kind: OpportunityKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl ContentOpportunity {
    pub(crate) fn new(
        kind: OpportunityKind,
        priority: Priority,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            priority,
        }
    }
}

/// Final output of the demand pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandSignal {
    pub demand_score: u8,
    pub demand_band: DemandBand,
    pub market_metrics: MarketMetrics,
    pub content_gap: ContentGap,
    pub opportunities: Vec<ContentOpportunity>,
    /// Confidence in `[0.0, 1.0]`, rounded to two decimals.
    pub confidence: f64,
    pub sample_size: usize,
    /// Points contributed by the external trend signal, when one was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trends_boost: Option<u8>,
}
