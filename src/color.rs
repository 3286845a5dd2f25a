//! Color mapping: per-metric palettes and the quantile scale behind them.

use std::fmt;

use crate::map::{Metric, MetricStore};

/// Simple RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Number of quantile buckets (and palette entries).
pub const BUCKETS: usize = 4;

/// Fixed palette for each metric, light to dark.
pub fn palette(metric: Metric) -> [Rgb; BUCKETS] {
    match metric {
        // Orange to red
        Metric::Total => [
            Rgb::new(0xfe, 0xe0, 0xa5),
            Rgb::new(0xfd, 0xae, 0x61),
            Rgb::new(0xf4, 0x6d, 0x43),
            Rgb::new(0xd7, 0x30, 0x27),
        ],
        // Blue shades
        Metric::Male => [
            Rgb::new(0xde, 0xeb, 0xf7),
            Rgb::new(0x9e, 0xca, 0xe1),
            Rgb::new(0x31, 0x82, 0xbd),
            Rgb::new(0x08, 0x51, 0x9c),
        ],
        // Pink shades
        Metric::Female => [
            Rgb::new(0xfd, 0xe0, 0xdd),
            Rgb::new(0xfa, 0x9f, 0xb5),
            Rgb::new(0xf7, 0x68, 0xa1),
            Rgb::new(0xae, 0x01, 0x7e),
        ],
    }
}

/// Quantile scale over an observed domain, partitioning values into four
/// ordered buckets with equal observation counts.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileScale {
    thresholds: [f64; BUCKETS - 1],
}

impl QuantileScale {
    /// Build from the observed values. Non-finite values are ignored.
    /// An empty domain yields a scale that maps everything to bucket 0.
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        if sorted.is_empty() {
            return Self { thresholds: [f64::INFINITY; BUCKETS - 1] };
        }

        // Linearly interpolated quantiles at the 1/4, 2/4, 3/4 points.
        let quantile = |p: f64| -> f64 {
            let h = (sorted.len() - 1) as f64 * p;
            let lo = h.floor() as usize;
            let hi = h.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (h - lo as f64)
        };

        Self { thresholds: [quantile(0.25), quantile(0.5), quantile(0.75)] }
    }

    /// Bucket index in `0..BUCKETS`. Values outside the observed domain
    /// clamp to the end buckets; non-finite values land in bucket 0.
    pub fn bucket(&self, value: f64) -> usize {
        if !value.is_finite() {
            return 0;
        }
        self.thresholds.iter().filter(|threshold| **threshold <= value).count()
    }

    #[inline]
    pub fn thresholds(&self) -> [f64; BUCKETS - 1] {
        self.thresholds
    }
}

/// Binds the active metric's quantile scale to its fixed palette.
///
/// Derived state: rebuilt from the full value distribution whenever the
/// selected metric changes, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMapper {
    metric: Metric,
    scale: QuantileScale,
    colors: [Rgb; BUCKETS],
}

impl ColorMapper {
    /// Derive the scale from the distribution of `metric` across all
    /// region records and bind the metric's palette.
    pub fn recompute(store: &MetricStore, metric: Metric) -> Self {
        Self {
            metric,
            scale: QuantileScale::from_values(&store.values(metric)),
            colors: palette(metric),
        }
    }

    #[inline]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Bucket color for `value`; always defined.
    #[inline]
    pub fn color_for(&self, value: f64) -> Rgb {
        self.colors[self.scale.bucket(value)]
    }

    /// Palette swatches, light to dark, for the legend.
    #[inline]
    pub fn legend(&self) -> [Rgb; BUCKETS] {
        self.colors
    }

    #[inline]
    pub fn scale(&self) -> &QuantileScale {
        &self.scale
    }
}
