// In crates/strategies/src/ema.rs

use chrono::{DateTime, Utc};
use core_types::{Error, PriceSeries, Result};
use num_traits::cast::ToPrimitive;
use serde::Serialize;

/// A streaming exponential moving average seeded with its first observation.
///
/// `next` is evaluated as `prev + α·(value − prev)`, the same recurrence as
/// `α·value + (1 − α)·prev`. A run of identical inputs keeps the average
/// exactly on that input.
#[derive(Debug, Clone)]
pub struct ExponentialMovingAverage {
    alpha: f64,
    current: Option<f64>,
}

impl ExponentialMovingAverage {
    /// Creates a new EMA for the given span. Spans of 0 or 1 are rejected.
    pub fn new(span: usize) -> Result<Self> {
        if span <= 1 {
            return Err(Error::InvalidSpan { span, len: 0 });
        }
        Ok(Self {
            alpha: 2.0 / (span as f64 + 1.0),
            current: None,
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Feeds one observation and returns the updated average.
    pub fn next(&mut self, value: f64) -> f64 {
        let updated = match self.current {
            None => value,
            Some(prev) => prev + self.alpha * (value - prev),
        };
        self.current = Some(updated);
        updated
    }
}

/// One EMA value, aligned by position with the bar it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmaPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// A full EMA series, one point per bar of the source `PriceSeries`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmaSeries {
    pub span: usize,
    pub points: Vec<EmaPoint>,
}

impl EmaSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }
}

/// Computes the EMA of the close prices of `series` for the given `span`.
///
/// The first value equals the first close; there is no SMA warm-up.
pub fn compute_ema(series: &PriceSeries, span: usize) -> Result<EmaSeries> {
    if span <= 1 || series.is_empty() {
        return Err(Error::InvalidSpan { span, len: series.len() });
    }

    let mut ema = ExponentialMovingAverage::new(span)?;
    let mut points = Vec::with_capacity(series.len());

    for (index, bar) in series.bars().iter().enumerate() {
        let close = bar.close.to_f64().ok_or(Error::InvalidPrice {
            index,
            price: bar.close,
        })?;
        points.push(EmaPoint {
            timestamp: bar.timestamp,
            value: ema.next(close),
        });
    }

    Ok(EmaSeries { span, points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::series_from_closes;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn seed_equals_first_close() {
        let series = series_from_closes(&[42.5, 40.0, 41.0]);
        let ema = compute_ema(&series, 12).unwrap();
        assert_eq!(ema.points[0].value, series.bars()[0].close.to_f64().unwrap());
        assert_eq!(ema.len(), series.len());
    }

    #[test]
    fn known_values_for_span_3() {
        // alpha = 0.5
        // 10 -> 10, 12 -> 11, 14 -> 12.5, 10 -> 11.25
        let series = series_from_closes(&[10.0, 12.0, 14.0, 10.0]);
        let values: Vec<f64> = compute_ema(&series, 3).unwrap().values().collect();
        let expected = [10.0, 11.0, 12.5, 11.25];
        for (got, want) in values.iter().zip(expected) {
            assert!((got - want).abs() < EPSILON, "got {got}, want {want}");
        }
    }

    #[test]
    fn timestamps_follow_the_source_bars() {
        let series = series_from_closes(&[1.0, 2.0, 3.0]);
        let ema = compute_ema(&series, 2).unwrap();
        for (point, bar) in ema.points.iter().zip(series.bars()) {
            assert_eq!(point.timestamp, bar.timestamp);
        }
    }

    #[test]
    fn constant_closes_stay_exactly_constant() {
        let series = series_from_closes(&[1234.56; 50]);
        let seed = series.bars()[0].close.to_f64().unwrap();
        for span in [2, 12, 26] {
            assert!(compute_ema(&series, span).unwrap().values().all(|v| v == seed));
        }
    }

    #[test]
    fn zero_and_duplicate_closes_do_not_produce_nan() {
        let series = series_from_closes(&[0.0, 0.0, 5.0, 5.0, 0.0]);
        assert!(compute_ema(&series, 3).unwrap().values().all(f64::is_finite));
    }

    #[test]
    fn rejects_span_of_one_or_less() {
        let series = series_from_closes(&[1.0, 2.0]);
        assert_eq!(compute_ema(&series, 1), Err(Error::InvalidSpan { span: 1, len: 2 }));
        assert_eq!(compute_ema(&series, 0), Err(Error::InvalidSpan { span: 0, len: 2 }));
    }

    #[test]
    fn rejects_empty_series() {
        let series = PriceSeries::default();
        assert_eq!(compute_ema(&series, 12), Err(Error::InvalidSpan { span: 12, len: 0 }));
    }

    proptest! {
        #[test]
        fn ema_never_leaves_the_running_close_range(
            closes in prop::collection::vec(0.01..100_000.0_f64, 1..200),
            span in 2usize..60,
        ) {
            let series = series_from_closes(&closes);
            let ema = compute_ema(&series, span).unwrap();
            prop_assert_eq!(ema.points[0].value, series.bars()[0].close.to_f64().unwrap());

            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for (i, value) in ema.values().enumerate() {
                let close = series.bars()[i].close.to_f64().unwrap();
                lo = lo.min(close);
                hi = hi.max(close);
                let slack = EPSILON * hi.abs().max(1.0);
                prop_assert!(value >= lo - slack && value <= hi + slack,
                    "ema {} outside [{}, {}] at {}", value, lo, hi, i);
            }
        }
    }
}
