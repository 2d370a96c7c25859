//! Scales mapping data to canvas coordinates and colours
//!
//! - [`LinearScale`]: continuous value to pixel, with "nice" tick steps
//! - [`BandScale`]: categorical identifier to a rounded horizontal band
//! - [`QuantileScale`]: continuous value to one of a discrete set of outputs
//!
//! The rounding and tick rules follow the conventions of browser charting
//! libraries so that layouts stay pixel-aligned.

use std::collections::HashMap;

use scorebox_stats::{quantile_thresholds, Extent};

/// Continuous linear mapping from a domain to a range
#[derive(Clone, Debug, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    /// Create a scale from `domain` onto `range`
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Replace the domain
    pub fn set_domain(&mut self, domain: [f64; 2]) {
        self.domain = domain;
    }

    /// Replace the domain with a computed extent
    pub fn set_extent(&mut self, extent: Extent) {
        self.domain = extent.to_array();
    }

    /// Map a domain value to the range
    ///
    /// A degenerate domain maps every value to the start of the range.
    pub fn map(&self, value: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            return r0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Map a range value back to the domain
    pub fn invert(&self, position: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        let span = r1 - r0;
        if span == 0.0 {
            return d0;
        }
        d0 + (position - r0) / span * (d1 - d0)
    }

    /// Tick step for roughly `count` ticks, a power of ten times 1, 2 or 5
    pub fn tick_step(&self, count: usize) -> Option<f64> {
        let (min, max) = self.ordered_domain();
        let span = max - min;
        if !span.is_finite() || span <= 0.0 || count == 0 {
            return None;
        }

        let m = count as f64;
        let exponent = (span / m).log10().floor() as i32;
        let mut step = 10f64.powi(exponent);
        let err = m / span * step;
        if err <= 0.15 {
            step *= 10.0;
        } else if err <= 0.35 {
            step *= 5.0;
        } else if err <= 0.75 {
            step *= 2.0;
        }
        Some(step)
    }

    /// Tick values inside the domain, ascending
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (min, max) = self.ordered_domain();
        if !min.is_finite() || !max.is_finite() {
            return Vec::new();
        }
        let Some(step) = self.tick_step(count) else {
            return vec![min];
        };

        let start = (min / step).ceil() * step;
        let stop = (max / step).floor() * step + step * 0.5;

        // Work in integer multiples so 0.1 + 0.2 style drift never shows up
        let k = integer_scale(step);
        let (start_k, stop_k, step_k) = (start * k, stop * k, step * k);
        let mut ticks = Vec::new();
        let mut i = 0.0;
        loop {
            let v = start_k + step_k * i;
            if v >= stop_k {
                break;
            }
            ticks.push(v / k);
            i += 1.0;
        }
        ticks
    }

    fn ordered_domain(&self) -> (f64, f64) {
        let [a, b] = self.domain;
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// Power of ten that turns `step` into an integer
fn integer_scale(step: f64) -> f64 {
    let mut k = 1.0;
    while (step * k) % 1.0 != 0.0 && k < 1e15 {
        k *= 10.0;
    }
    k
}

/// Ordinal scale dividing a pixel range into rounded, evenly spaced bands
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    range: [f64; 2],
    padding: f64,
    outer_padding: f64,
    positions: Vec<f64>,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    /// Create an empty scale over `range`
    ///
    /// `padding` is the fraction of each step left empty between bands and
    /// `outer_padding` the fraction of a step left at both ends.
    pub fn new(range: [f64; 2], padding: f64, outer_padding: f64) -> Self {
        let mut scale = Self {
            domain: Vec::new(),
            index: HashMap::new(),
            range,
            padding,
            outer_padding,
            positions: Vec::new(),
            step: 0.0,
            bandwidth: 0.0,
        };
        scale.layout();
        scale
    }

    /// Replace the domain, keeping the order given
    ///
    /// Repeated identifiers keep their first position.
    pub fn set_domain<I, S>(&mut self, identifiers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain.clear();
        self.index.clear();
        for id in identifiers {
            let id = id.into();
            if !self.index.contains_key(&id) {
                self.index.insert(id.clone(), self.domain.len());
                self.domain.push(id);
            }
        }
        self.layout();
    }

    /// Replace the range and re-round the layout
    pub fn set_range(&mut self, range: [f64; 2]) {
        self.range = range;
        self.layout();
    }

    fn layout(&mut self) {
        let [r0, r1] = self.range;
        let reverse = r1 < r0;
        let (start, stop) = if reverse { (r1, r0) } else { (r0, r1) };
        let n = self.domain.len() as f64;

        let denominator = n - self.padding + 2.0 * self.outer_padding;
        let step = if denominator > 0.0 {
            ((stop - start) / denominator).floor()
        } else {
            0.0
        };
        let error = stop - start - (n - self.padding) * step;
        let first = start + (error / 2.0).round();

        self.positions = (0..self.domain.len())
            .map(|i| first + step * i as f64)
            .collect();
        if reverse {
            self.positions.reverse();
        }
        self.step = step;
        self.bandwidth = (step * (1.0 - self.padding)).round();
    }

    /// Start of the band for `identifier`
    pub fn position(&self, identifier: &str) -> Option<f64> {
        self.index.get(identifier).map(|&i| self.positions[i])
    }

    /// Centre of the band for `identifier`
    pub fn midpoint(&self, identifier: &str) -> Option<f64> {
        self.position(identifier).map(|x| x + self.bandwidth / 2.0)
    }

    /// Width of every band
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Distance between consecutive band starts
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// Band start for each identifier, in domain order
    pub fn bands(&self) -> impl Iterator<Item = (&str, f64)> {
        self.domain
            .iter()
            .map(String::as_str)
            .zip(self.positions.iter().copied())
    }
}

/// Maps a continuous value onto `range` by quantile bucket of a sample domain
#[derive(Clone, Debug, PartialEq)]
pub struct QuantileScale<T> {
    thresholds: Vec<f64>,
    range: Vec<T>,
}

impl<T: Clone> QuantileScale<T> {
    /// Create a scale with an empty domain
    pub fn new(range: Vec<T>) -> Self {
        Self {
            thresholds: Vec::new(),
            range,
        }
    }

    /// Set the sample domain; order does not matter, non-finite values are ignored
    pub fn set_domain(&mut self, domain: &[f64]) {
        self.thresholds = quantile_thresholds(domain, self.range.len());
    }

    /// Bucket boundaries, one fewer than the range length
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn range(&self) -> &[T] {
        &self.range
    }

    /// Output for `value`, or `None` for NaN or before a domain is set
    pub fn map(&self, value: f64) -> Option<T> {
        if value.is_nan() || self.range.is_empty() {
            return None;
        }
        if self.thresholds.is_empty() && self.range.len() > 1 {
            return None;
        }
        let bucket = self.thresholds.partition_point(|t| *t <= value);
        self.range.get(bucket).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_linear_map_and_invert() {
        let scale = LinearScale::new([0.0, 10.0], [430.0, 40.0]);
        assert_eq!(scale.map(0.0), 430.0);
        assert_eq!(scale.map(10.0), 40.0);
        assert_eq!(scale.map(5.0), 235.0);
        assert_eq!(scale.invert(235.0), 5.0);
    }

    #[test]
    fn test_linear_degenerate_domain() {
        let scale = LinearScale::new([0.3, 0.3], [430.0, 40.0]);
        assert_eq!(scale.map(0.3), 430.0);
        assert_eq!(scale.ticks(10), vec![0.3]);
    }

    #[test]
    fn test_ticks_unit_domain() {
        let scale = LinearScale::new([0.0, 1.0], [0.0, 100.0]);
        let ticks = scale.ticks(10);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[3], 0.3);
        assert_eq!(ticks[10], 1.0);
    }

    #[rstest]
    #[case([0.0, 100.0], 10.0)]
    #[case([0.0, 1.0], 0.1)]
    #[case([0.0025, 0.25], 0.02)]
    #[case([0.0, 35.0], 5.0)]
    #[case([-3.0, 7.0], 1.0)]
    fn test_tick_step(#[case] domain: [f64; 2], #[case] expected: f64) {
        let step = LinearScale::new(domain, [0.0, 1.0]).tick_step(10).unwrap();
        assert!((step - expected).abs() < 1e-12, "{step} != {expected}");
    }

    #[test]
    fn test_ticks_small_domain() {
        let scale = LinearScale::new([0.0025, 0.25], [430.0, 40.0]);
        let ticks = scale.ticks(10);
        assert_eq!(ticks.first(), Some(&0.02));
        assert_eq!(ticks.last(), Some(&0.24));
        assert_eq!(ticks.len(), 12);
    }

    #[test]
    fn test_band_layout_rounding() {
        let mut scale = BandScale::new([90.0, 920.0], 0.5, 0.4);
        scale.set_domain(["A", "B", "C"]);

        // step = floor(830 / 3.3) = 251, error = 830 - 2.5 * 251 = 202.5
        assert_eq!(scale.step(), 251.0);
        assert_eq!(scale.bandwidth(), 126.0);
        assert_eq!(scale.position("A"), Some(191.0));
        assert_eq!(scale.position("B"), Some(442.0));
        assert_eq!(scale.position("C"), Some(693.0));
        assert_eq!(scale.midpoint("A"), Some(254.0));
        assert_eq!(scale.position("D"), None);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(7)]
    #[case(40)]
    fn test_bands_stay_inside_range(#[case] n: usize) {
        let mut scale = BandScale::new([90.0, 920.0], 0.5, 0.4);
        scale.set_domain((0..n).map(|i| format!("p{i}")));
        for (_, x) in scale.bands() {
            assert!(x >= 90.0);
            assert!(x + scale.bandwidth() <= 920.0);
        }
    }

    #[test]
    fn test_band_domain_keeps_order() {
        let mut scale = BandScale::new([0.0, 100.0], 0.5, 0.4);
        scale.set_domain(["Tit For Tat", "Grudger", "Tit For Tat"]);
        assert_eq!(scale.domain(), &["Tit For Tat".to_string(), "Grudger".to_string()]);
        assert!(scale.position("Tit For Tat") < scale.position("Grudger"));
    }

    #[test]
    fn test_band_set_range() {
        let mut scale = BandScale::new([90.0, 920.0], 0.5, 0.4);
        scale.set_domain(["A", "B", "C"]);
        let mut wider = scale.clone();
        wider.set_range([180.0, 1840.0]);
        assert_eq!(wider.step(), 503.0);
        assert!(wider.position("A").unwrap() > scale.position("A").unwrap());
        assert_eq!(scale.step(), 251.0);
    }

    #[test]
    fn test_quantile_scale_buckets() {
        let mut scale = QuantileScale::new(vec!["a", "b", "c", "d"]);
        scale.set_domain(&[8.0, 0.0, 4.0, 2.0, 6.0, 1.0, 3.0, 5.0, 7.0]);
        assert_eq!(scale.thresholds(), &[2.0, 4.0, 6.0]);
        assert_eq!(scale.map(-1.0), Some("a"));
        assert_eq!(scale.map(2.0), Some("b"));
        assert_eq!(scale.map(5.9), Some("c"));
        assert_eq!(scale.map(100.0), Some("d"));
        assert_eq!(scale.map(f64::NAN), None);
    }

    #[test]
    fn test_quantile_scale_without_domain() {
        let scale = QuantileScale::new(vec![1, 2, 3]);
        assert_eq!(scale.map(0.5), None);
    }

    proptest! {
        #[test]
        fn prop_linear_roundtrip(a in -1e3f64..1e3, span in 1e-3f64..1e3, t in 0.0f64..1.0) {
            let scale = LinearScale::new([a, a + span], [430.0, 40.0]);
            let x = a + span * t;
            prop_assert!((scale.invert(scale.map(x)) - x).abs() < 1e-6 * (1.0 + span + a.abs()));
        }

        #[test]
        fn prop_ticks_within_domain(a in -1e3f64..1e3, span in 1e-3f64..1e3) {
            let scale = LinearScale::new([a, a + span], [0.0, 1.0]);
            let ticks = scale.ticks(10);
            prop_assert!(!ticks.is_empty());
            let eps = 1e-9 * (1.0 + a.abs() + span);
            for pair in ticks.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
            for t in ticks {
                prop_assert!(t >= a - eps && t <= a + span + eps);
            }
        }
    }
}
