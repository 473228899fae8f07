//! Property tests for indicator invariants.
//!
//! Uses proptest to verify:
//! 1. Warm-up: SMA is absent everywhere when the input is shorter than the window
//! 2. Identity: SMA with window 1 reproduces the input exactly
//! 3. Constant input: EMA settles on the constant from its seed onward
//! 4. Bounds: RSI stays within [0, 100]
//! 5. Ordering: Bollinger upper >= middle >= lower
//! 6. MACD histogram equals line minus signal
//! 7. Assembly length: n - warmup offset records, never negative

mod common;

use common::make_bars;
use proptest::prelude::*;
use stockcast::domain::features::{build_features, FeatureSet};
use stockcast::domain::indicator::{bollinger, ema, macd, rsi, sma, IndicatorType};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_closes(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_price(), 0..max_len)
}

fn arb_indicator() -> impl Strategy<Value = IndicatorType> {
    prop_oneof![
        (1..30usize).prop_map(IndicatorType::Sma),
        (1..30usize).prop_map(IndicatorType::Ema),
        (1..30usize).prop_map(IndicatorType::Rsi),
        (1..15usize, 1..30usize, 1..10usize)
            .prop_map(|(fast, slow, signal)| IndicatorType::Macd { fast, slow, signal }),
        (1..30usize, 0..400u32).prop_map(|(period, stddev_mult_x100)| {
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            }
        }),
    ]
}

// ── Moving averages ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn sma_absent_when_input_shorter_than_window(
        closes in arb_closes(20),
        extra in 1..10usize,
    ) {
        let window = closes.len() + extra;
        let series = IndicatorType::Sma(window).compute(&closes);
        prop_assert_eq!(series.len(), closes.len());
        prop_assert!(series.values.iter().all(Option::is_none));
    }

    #[test]
    fn sma_window_one_is_identity(closes in arb_closes(200)) {
        let series = sma(&closes, 1).unwrap();
        let expected: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
        prop_assert_eq!(series, expected);
    }

    #[test]
    fn ema_of_constant_is_constant(
        c in arb_price(),
        n in 1..100usize,
        window_frac in 0.0..1.0_f64,
    ) {
        let window = 1 + ((n - 1) as f64 * window_frac) as usize;
        let series = ema(&vec![c; n], window).unwrap();

        for (i, value) in series.iter().enumerate() {
            if i + 1 < window {
                prop_assert!(value.is_none());
            } else {
                let v = value.unwrap();
                prop_assert!((v - c).abs() <= 1e-9 * c.abs().max(1.0), "ema[{}] = {} for {}", i, v, c);
            }
        }
    }
}

// ── Composite indicators ─────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_is_bounded(closes in arb_closes(150), window in 1..30usize) {
        prop_assume!(window <= closes.len());
        let series = rsi(&closes, window).unwrap();
        for value in series.into_iter().flatten() {
            prop_assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn bollinger_bands_are_ordered(
        closes in arb_closes(150),
        period in 1..30usize,
        multiplier in 0.0..4.0_f64,
    ) {
        prop_assume!(period <= closes.len());
        let bands = bollinger(&closes, period, multiplier).unwrap();
        for i in 0..closes.len() {
            match (bands.upper[i], bands.middle[i], bands.lower[i]) {
                (Some(u), Some(m), Some(l)) => {
                    prop_assert!(u >= m && m >= l, "{} {} {} at {}", u, m, l, i);
                }
                (None, None, None) => {}
                other => prop_assert!(false, "bands disagree at {}: {:?}", i, other),
            }
        }
    }

    #[test]
    fn macd_histogram_is_line_minus_signal(
        closes in arb_closes(120),
        fast in 1..15usize,
        slow in 1..30usize,
        signal in 1..10usize,
    ) {
        prop_assume!(fast.max(slow).max(signal) <= closes.len());
        let series = macd(&closes, fast, slow, signal).unwrap();
        for i in 0..closes.len() {
            match (series.line[i], series.signal[i]) {
                (Some(l), Some(s)) => prop_assert_eq!(series.histogram[i], Some(l - s)),
                _ => prop_assert!(series.histogram[i].is_none()),
            }
        }
    }
}

// ── Feature assembly ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn assembled_length_matches_warmup_offset(
        closes in arb_closes(120),
        indicators in prop::collection::vec(arb_indicator(), 0..5),
    ) {
        let bars = make_bars("2020-01-01", &closes);
        let set = FeatureSet::new(indicators).unwrap();
        let records = build_features(&bars, &set);

        let expected = closes.len().saturating_sub(set.warmup_offset());
        prop_assert_eq!(records.len(), expected);

        for pair in records.windows(2) {
            prop_assert!(pair[0].date < pair[1].date);
        }
        if let Some(last) = records.last() {
            prop_assert_eq!(last.date, bars[bars.len() - 1].date);
        }
    }
}
