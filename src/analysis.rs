use simple_error::{SimpleError, SimpleResult};
use statrs::statistics::Statistics;

use crate::spike_train::SpikeTrain;

/// Spike counts in consecutive bins of `bin_ticks` ticks, starting at tick 1. A trailing partial
/// bin is dropped.
pub fn binned_counts(train: &SpikeTrain, bin_ticks: usize) -> Vec<f64> {
    let fires = train.as_slice();
    if fires.len() < 2 || bin_ticks == 0 {
        return Vec::new();
    }

    fires[1..]
        .chunks_exact(bin_ticks)
        .map(|bin| bin.iter().filter(|fires| **fires).count() as f64)
        .collect()
}

/// Pearson correlation of the binned spike counts of two trains on the same grid.
pub fn pairwise_correlation(
    a: &SpikeTrain,
    b: &SpikeTrain,
    bin_ticks: usize,
) -> SimpleResult<f64> {
    if bin_ticks == 0 {
        return Err(SimpleError::new("bin_ticks must be strictly positive"));
    }

    if a.len() != b.len() {
        return Err(SimpleError::new(format!(
            "spike trains differ in length: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let counts_a = binned_counts(a, bin_ticks);
    let counts_b = binned_counts(b, bin_ticks);

    if counts_a.len() < 2 {
        return Err(SimpleError::new("at least two bins required"));
    }

    let std_dev_a = counts_a.iter().std_dev();
    let std_dev_b = counts_b.iter().std_dev();

    if !(std_dev_a > 0.0 && std_dev_b > 0.0) {
        return Err(SimpleError::new(
            "correlation undefined for constant spike counts",
        ));
    }

    Ok(counts_a.iter().covariance(counts_b.iter()) / (std_dev_a * std_dev_b))
}

/// Mean correlation over all distinct pairs of `trains`.
pub fn mean_pairwise_correlation(trains: &[SpikeTrain], bin_ticks: usize) -> SimpleResult<f64> {
    let mut correlations = Vec::new();

    for (i, a) in trains.iter().enumerate() {
        for b in &trains[i + 1..] {
            correlations.push(pairwise_correlation(a, b, bin_ticks)?);
        }
    }

    if correlations.is_empty() {
        return Err(SimpleError::new("at least two spike trains required"));
    }

    Ok(correlations.mean())
}
