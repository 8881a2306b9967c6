//! Three-way quantile binning.
//!
//! Edges are the 0, 1/3, 2/3 and 1 quantiles (linear interpolation between
//! order statistics). Bins are `[e0, e1]`, `(e1, e2]`, `(e2, e3]`.

use crate::error::{AnalyticsError, Result};

/// Linear-interpolated quantile of an ascending slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

fn edges_of(sorted: &[f64]) -> [f64; 4] {
    [
        quantile(sorted, 0.0),
        quantile(sorted, 1.0 / 3.0),
        quantile(sorted, 2.0 / 3.0),
        quantile(sorted, 1.0),
    ]
}

fn distinct(sorted: &[f64]) -> usize {
    let mut unique = sorted.to_vec();
    unique.dedup();
    unique.len()
}

/// Tertile edges, failing when any two coincide.
pub fn tertile_edges(values: &[f64]) -> Result<[f64; 4]> {
    let sorted = sorted_copy(values);
    if sorted.is_empty() {
        return Err(AnalyticsError::Binning {
            values: 0,
            distinct: 0,
        });
    }

    let edges = edges_of(&sorted);
    if edges.windows(2).any(|w| w[0] >= w[1]) {
        return Err(AnalyticsError::Binning {
            values: sorted.len(),
            distinct: distinct(&sorted),
        });
    }
    Ok(edges)
}

/// Bin index of `value` given the interior edges of a partition.
fn bin_index(value: f64, interior: &[f64]) -> usize {
    interior.iter().filter(|edge| value > **edge).count()
}

/// Assigns every value to bin 0, 1 or 2.
pub fn tertile_bins(values: &[f64]) -> Result<Vec<usize>> {
    let edges = tertile_edges(values)?;
    Ok(values.iter().map(|v| bin_index(*v, &edges[1..3])).collect())
}

/// Fallback when [`tertile_bins`] fails: duplicate edges are dropped and the
/// values are split over whatever bins remain. Returns the bin of every value
/// and the number of bins (1 or 2; 0 for empty input).
pub fn coarse_bins(values: &[f64]) -> (Vec<usize>, usize) {
    let sorted = sorted_copy(values);
    if sorted.is_empty() {
        return (Vec::new(), 0);
    }

    let mut edges = edges_of(&sorted).to_vec();
    edges.dedup();

    let bins = edges.len().saturating_sub(1).max(1);
    let interior: &[f64] = if edges.len() > 2 {
        &edges[1..edges.len() - 1]
    } else {
        &[]
    };

    let assigned = values.iter().map(|v| bin_index(*v, interior)).collect();
    (assigned, bins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
    }

    #[test]
    fn test_tertile_bins_equal_population() {
        let values: Vec<f64> = (1..=9).map(f64::from).collect();
        let bins = tertile_bins(&values).unwrap();
        assert_eq!(bins, vec![0, 0, 0, 1, 1, 1, 2, 2, 2]);
    }

    #[test]
    fn test_tertile_bins_preserve_input_order() {
        let values = [30.0, 10.0, 20.0];
        assert_eq!(tertile_bins(&values).unwrap(), vec![2, 0, 1]);
    }

    #[test]
    fn test_tertile_rejects_too_few_distinct_values() {
        let err = tertile_bins(&[5.0, 5.0, 5.0, 6.0]).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::Binning {
                values: 4,
                distinct: 2
            }
        ));
    }

    #[test]
    fn test_tertile_rejects_empty_and_single() {
        assert!(tertile_bins(&[]).is_err());
        assert!(tertile_bins(&[1.0]).is_err());
    }

    #[test]
    fn test_coarse_bins_two_levels() {
        let values = [1.0, 1.0, 1.0, 2.0, 3.0, 4.0];
        let (bins, count) = coarse_bins(&values);
        assert_eq!(count, 2);
        assert_eq!(bins, vec![0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_coarse_bins_constant_column() {
        let (bins, count) = coarse_bins(&[7.0, 7.0]);
        assert_eq!(count, 1);
        assert_eq!(bins, vec![0, 0]);
    }

    #[test]
    fn test_bins_are_monotonic() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0, 5.0, 3.0, 5.0];
        let bins = tertile_bins(&values).unwrap();
        for i in 0..values.len() {
            for j in 0..values.len() {
                if values[i] < values[j] {
                    assert!(bins[i] <= bins[j]);
                }
            }
        }
    }
}
