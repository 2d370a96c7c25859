//! Linear-interpolation quantile estimation
//!
//! For a probability `p` over `n` sorted values the quantile sits at rank
//! `p * (n - 1)` and is interpolated between the values at the floor and
//! ceiling of that rank. This is the estimator spreadsheet tools call
//! `PERCENTILE.INC` (R type 7).

use crate::error::{StatsError, StatsResult};

/// Sort values ascending in numeric order
///
/// Uses a total order so that the result is deterministic even for
/// signed zeros. Callers are expected to have rejected NaN beforehand.
pub fn sort_sample(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

/// Collect values into a new ascending sample
pub fn sorted(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut sample: Vec<f64> = values.into_iter().collect();
    sort_sample(&mut sample);
    sample
}

/// Quantile of a sorted sample at probability `p`
pub fn quantile(sorted: &[f64], p: f64) -> StatsResult<f64> {
    if sorted.is_empty() {
        return Err(StatsError::EmptySample);
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(StatsError::InvalidProbability(p));
    }
    Ok(quantile_unchecked(sorted, p))
}

/// Quantile without argument checks; `sorted` must be non-empty
pub(crate) fn quantile_unchecked(sorted: &[f64], p: f64) -> f64 {
    let rank = (sorted.len() - 1) as f64 * p;
    let lower = rank.floor() as usize;
    let value = sorted[lower];
    match sorted.get(lower + 1) {
        Some(next) => value + (next - value) * (rank - lower as f64),
        None => value,
    }
}

/// Median of a sorted sample
pub fn median(sorted: &[f64]) -> StatsResult<f64> {
    quantile(sorted, 0.5)
}

/// Bucket boundaries splitting `domain` into `buckets` equally populated groups
///
/// The domain does not need to be sorted; non-finite values are ignored.
/// Returns `buckets - 1` thresholds, or nothing when the domain is empty.
pub fn quantile_thresholds(domain: &[f64], buckets: usize) -> Vec<f64> {
    let sample = sorted(domain.iter().copied().filter(|x| x.is_finite()));
    if sample.is_empty() || buckets < 2 {
        return Vec::new();
    }

    (1..buckets)
        .map(|k| quantile_unchecked(&sample, k as f64 / buckets as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(0.25, 3.0)]
    #[case(0.5, 5.0)]
    #[case(0.75, 7.0)]
    #[case(1.0, 9.0)]
    fn test_quantile_symmetric(#[case] p: f64, #[case] expected: f64) {
        let sample: Vec<f64> = (1..=9).map(f64::from).collect();
        assert!((quantile(&sample, p).unwrap() - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case(&[1.0, 2.0, 3.0, 4.0], 0.25, 1.75)]
    #[case(&[1.0, 2.0, 3.0, 4.0], 0.75, 3.25)]
    #[case(&[1.0, 2.0, 3.0, 4.0], 0.5, 2.5)]
    #[case(&[42.0], 0.3, 42.0)]
    fn test_quantile_interpolates(#[case] sample: &[f64], #[case] p: f64, #[case] expected: f64) {
        assert!((quantile(sample, p).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_rejects_bad_input() {
        assert_eq!(quantile(&[], 0.5), Err(StatsError::EmptySample));
        assert_eq!(
            quantile(&[1.0], 1.5),
            Err(StatsError::InvalidProbability(1.5))
        );
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[1.0, 2.0, 3.0]).unwrap(), 2.0);
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 2.5);
    }

    #[test]
    fn test_sorted_is_numeric() {
        // Lexicographic ordering would put 10 before 9
        assert_eq!(sorted(vec![10.0, 9.0, 100.0, 1.0]), vec![1.0, 9.0, 10.0, 100.0]);
    }

    #[test]
    fn test_quantile_thresholds() {
        let domain: Vec<f64> = (0..=8).rev().map(f64::from).collect();
        let thresholds = quantile_thresholds(&domain, 4);
        assert_eq!(thresholds, vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_quantile_thresholds_empty() {
        assert!(quantile_thresholds(&[], 9).is_empty());
        assert!(quantile_thresholds(&[f64::NAN], 9).is_empty());
        assert!(quantile_thresholds(&[1.0], 1).is_empty());
    }
}
