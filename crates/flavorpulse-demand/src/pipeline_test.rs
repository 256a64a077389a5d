use chrono::{Duration, TimeZone};

use super::*;
use crate::calibration::{CalibrationBucket, StaticCalibration};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap()
}

fn item(title: &str, views: u64, age_days: i64) -> ContentItem {
    ContentItem {
        id: format!("{title}-{views}-{age_days}"),
        title: title.to_string(),
        description: None,
        view_count: views,
        published_at: Some(now() - Duration::days(age_days)),
    }
}

fn run(items: &[ContentItem], terms: &str, trend: Option<&TrendSignal>) -> DemandSignal {
    compute_demand_signal_with(items, &SearchTerms::parse(terms), trend, &ScoringContext::at(now()))
}

/// 40 kimchi videos averaging 200k views, only two of them recent.
fn saturated_items() -> Vec<ContentItem> {
    (0..40)
        .map(|i| {
            let age = if i < 2 { 10 } else { 500 };
            item(&format!("Kimchi fried rice #{i}"), 200_000, age)
        })
        .collect()
}

/// 12 gochujang butter videos at 60k views, half of them recent.
fn underserved_items() -> Vec<ContentItem> {
    (0..12)
        .map(|i| {
            let age = if i % 2 == 0 { 30 } else { 200 };
            item(&format!("Gochujang butter noodles v{i}"), 60_000, age)
        })
        .collect()
}

#[test]
fn no_items_yields_empty_signal() {
    let signal = run(&[], "kimchi", None);
    assert_eq!(signal.demand_score, 0);
    assert_eq!(signal.demand_band, DemandBand::Unknown);
    assert_eq!(signal.sample_size, 0);
    assert!(signal.confidence.abs() < f64::EPSILON);
    assert_eq!(signal.content_gap.market_type, MarketType::Balanced);
    assert_eq!(signal.content_gap.score, 0);
    assert!(signal.opportunities.is_empty());
    assert_eq!(signal.market_metrics, MarketMetrics::default());
}

#[test]
fn blank_terms_yield_empty_signal() {
    let items = vec![item("Kimchi stew", 10_000, 5)];
    let signal = run(&items, " , ", None);
    assert_eq!(signal.demand_band, DemandBand::Unknown);
    assert_eq!(signal.sample_size, 0);
}

#[test]
fn no_relevant_items_is_untapped() {
    let items = vec![
        item("Classic french omelette", 90_000, 20),
        item("Perfect roast chicken", 120_000, 400),
    ];
    let before = metrics::invocations();
    let signal = run(&items, "gochujang", None);

    assert_eq!(metrics::invocations(), before);
    assert_eq!(signal.demand_score, 0);
    assert_eq!(signal.demand_band, DemandBand::Unknown);
    assert!((signal.confidence - 0.1).abs() < f64::EPSILON);
    assert_eq!(signal.content_gap.market_type, MarketType::Underserved);
    assert_eq!(signal.content_gap.score, 0);
    assert_eq!(signal.opportunities.len(), 1);
    assert_eq!(signal.opportunities[0].kind, OpportunityKind::UntappedCombination);
    assert_eq!(signal.opportunities[0].priority, Priority::High);
}

#[test]
fn one_or_two_relevant_items_skip_metrics() {
    for count in 1..=2_usize {
        let mut items: Vec<ContentItem> = (0..count)
            .map(|i| item(&format!("Gochujang popcorn {i}"), 2_000_000, 3))
            .collect();
        items.push(item("Caramel popcorn", 500_000, 3));

        let before = metrics::invocations();
        let signal = run(&items, "gochujang, popcorn", None);

        assert_eq!(metrics::invocations(), before, "count {count}");
        assert_eq!(u64::from(signal.demand_score), 10 * count as u64);
        assert_eq!(signal.demand_band, DemandBand::Niche);
        assert!((signal.confidence - 0.15).abs() < f64::EPSILON);
        assert_eq!(signal.sample_size, count);
        assert_eq!(signal.market_metrics, MarketMetrics::counted(count));
        assert_eq!(signal.content_gap.score, 50);
        assert_eq!(signal.opportunities.len(), 1);
        assert_eq!(signal.opportunities[0].kind, OpportunityKind::UntappedCombination);
        assert_eq!(signal.opportunities[0].priority, Priority::Medium);
    }
}

#[test]
fn partial_matches_on_three_terms_are_unproven() {
    // 3 items mention all three terms; 5 mention only two.
    let mut items: Vec<ContentItem> = (0..3)
        .map(|i| item(&format!("Gochujang butter popcorn {i}"), 900_000, 15))
        .collect();
    items.extend((0..5).map(|i| item(&format!("Gochujang butter toast {i}"), 900_000, 15)));

    let before = metrics::invocations();
    let signal = run(&items, "gochujang, butter, popcorn", None);

    assert_eq!(metrics::invocations(), before);
    assert_eq!(signal.demand_score, 25);
    assert_eq!(signal.demand_band, DemandBand::Niche);
    assert!((signal.confidence - 0.3).abs() < f64::EPSILON);
    assert_eq!(signal.sample_size, 8);
    assert_eq!(signal.opportunities.len(), 1);
    assert_eq!(signal.opportunities[0].kind, OpportunityKind::UnprovenCombination);
}

#[test]
fn full_matches_on_three_terms_run_the_pipeline() {
    let items: Vec<ContentItem> = (0..8)
        .map(|i| item(&format!("Gochujang butter popcorn {i}"), 40_000, 15))
        .collect();

    let before = metrics::invocations();
    let signal = run(&items, "gochujang, butter, popcorn", None);

    assert_eq!(metrics::invocations(), before + 1);
    assert_eq!(signal.sample_size, 8);
    // Three terms with under ten samples is always underserved.
    assert_eq!(signal.content_gap.market_type, MarketType::Underserved);
}

#[test]
fn saturated_market_caps_band() {
    let signal = run(&saturated_items(), "kimchi", None);

    assert_eq!(signal.content_gap.market_type, MarketType::Saturated);
    assert!(!matches!(
        signal.demand_band,
        DemandBand::Hot | DemandBand::Growing
    ));
    assert_eq!(signal.market_metrics.avg_views, 200_000);
    assert_eq!(signal.sample_size, 40);
    assert!(signal
        .opportunities
        .iter()
        .all(|o| o.kind != OpportunityKind::QualityGap && o.kind != OpportunityKind::FreshnessGap));
}

#[test]
fn low_barrier_market_is_underserved() {
    let signal = run(&underserved_items(), "gochujang, butter", None);

    assert_eq!(signal.content_gap.market_type, MarketType::Underserved);
    assert!(signal.content_gap.score > 50);
    assert!(signal
        .opportunities
        .iter()
        .any(|o| o.kind == OpportunityKind::Underserved && o.priority == Priority::High));
    assert_eq!(signal.trends_boost, None);
}

#[test]
fn trend_signal_adds_boost() {
    let trend = TrendSignal {
        interest_score: 70.0,
        week_over_week_growth_pct: 25.0,
        is_breakout: false,
    };
    let signal = run(&underserved_items(), "gochujang, butter", Some(&trend));
    // 7 from interest, 3 from growth.
    assert_eq!(signal.trends_boost, Some(10));
}

#[test]
fn trend_without_interest_is_ignored() {
    let trend = TrendSignal::default();
    let with = run(&underserved_items(), "gochujang, butter", Some(&trend));
    let without = run(&underserved_items(), "gochujang, butter", None);
    assert_eq!(with.trends_boost, None);
    assert_eq!(with.demand_score, without.demand_score);
    assert!((with.confidence - without.confidence).abs() < f64::EPSILON);
}

#[test]
fn calibration_only_moves_confidence() {
    let items = underserved_items();
    let terms = SearchTerms::parse("gochujang, butter");
    let baseline = run(&items, "gochujang, butter", None);

    let table = StaticCalibration::new(vec![CalibrationBucket {
        band: baseline.demand_band,
        min_opportunity: 0,
        max_opportunity: 100,
        success_rate: 1.0,
    }])
    .unwrap();
    let ctx = ScoringContext::at(now()).with_calibration(&table);
    let calibrated = compute_demand_signal_with(&items, &terms, None, &ctx);

    assert_eq!(calibrated.demand_score, baseline.demand_score);
    assert_eq!(calibrated.demand_band, baseline.demand_band);
    assert_eq!(calibrated.content_gap, baseline.content_gap);
    assert_eq!(calibrated.opportunities, baseline.opportunities);
    assert!(calibrated.confidence > baseline.confidence);
}

#[test]
fn calibration_is_ignored_on_early_exit() {
    let table = StaticCalibration::new(vec![CalibrationBucket {
        band: DemandBand::Unknown,
        min_opportunity: 0,
        max_opportunity: 100,
        success_rate: 1.0,
    }])
    .unwrap();
    let ctx = ScoringContext::at(now()).with_calibration(&table);
    let items = vec![item("Classic french omelette", 90_000, 20)];
    let signal = compute_demand_signal_with(&items, &SearchTerms::parse("gochujang"), None, &ctx);
    assert!((signal.confidence - 0.1).abs() < f64::EPSILON);
}

#[test]
fn custom_alias_table_is_used() {
    let mut aliases = AliasTable::empty();
    aliases.insert("nori", ["laver"]);
    let items: Vec<ContentItem> = (0..4)
        .map(|i| item(&format!("Toasted laver snack {i}"), 15_000, 40))
        .collect();
    let terms = SearchTerms::parse("nori");

    let builtin = compute_demand_signal_with(&items, &terms, None, &ScoringContext::at(now()));
    let custom =
        compute_demand_signal_with(&items, &terms, None, &ScoringContext::new(now(), &aliases));

    assert_eq!(builtin.sample_size, 0);
    assert_eq!(custom.sample_size, 4);
}

#[test]
fn fixed_clock_is_idempotent() {
    let items = saturated_items();
    let first = run(&items, "kimchi", None);
    let second = run(&items, "kimchi", None);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn outputs_stay_in_range() {
    let view_levels = [0_u64, 800, 12_000, 80_000, 650_000, 3_000_000];
    let counts = [3_usize, 9, 22, 60];
    let trends = [
        None,
        Some(TrendSignal {
            interest_score: 100.0,
            week_over_week_growth_pct: 400.0,
            is_breakout: true,
        }),
        Some(TrendSignal {
            interest_score: f64::NAN,
            week_over_week_growth_pct: f64::INFINITY,
            is_breakout: false,
        }),
    ];

    for views in view_levels {
        for count in counts {
            let items: Vec<ContentItem> = (0..count)
                .map(|i| {
                    let age = i64::try_from(i * 37 % 800).unwrap();
                    item(&format!("Tofu kimchi bowl {i}"), views + i as u64, age)
                })
                .collect();
            for terms in ["kimchi", "kimchi, tofu"] {
                for trend in &trends {
                    let signal = run(&items, terms, trend.as_ref());
                    assert!(signal.demand_score <= 100);
                    assert!((0.0..=1.0).contains(&signal.confidence));
                    assert!(signal.content_gap.score <= 100);
                    if signal.content_gap.market_type == MarketType::Saturated {
                        assert!(!matches!(
                            signal.demand_band,
                            DemandBand::Hot | DemandBand::Growing
                        ));
                    }
                    let priorities: Vec<Priority> =
                        signal.opportunities.iter().map(|o| o.priority).collect();
                    assert!(priorities.windows(2).all(|w| w[0] <= w[1]));
                }
            }
        }
    }
}

#[test]
fn concurrent_scoring_matches_sequential() {
    let saturated = saturated_items();
    let underserved = underserved_items();
    let expected_a = run(&saturated, "kimchi", None);
    let expected_b = run(&underserved, "gochujang, butter", None);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let (items, terms) = if i % 2 == 0 {
                    (&saturated, "kimchi")
                } else {
                    (&underserved, "gochujang, butter")
                };
                s.spawn(move || (i, run(items, terms, None)))
            })
            .collect();

        for handle in handles {
            let (i, signal) = handle.join().unwrap();
            let expected = if i % 2 == 0 { &expected_a } else { &expected_b };
            assert_eq!(&signal, expected);
        }
    });
}

#[test]
fn public_types_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DemandSignal>();
    assert_send_sync::<ScoringContext<'static>>();
    assert_send_sync::<AliasTable>();
    assert_send_sync::<crate::calibration::CalibrationFile>();
}
