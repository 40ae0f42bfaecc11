use serde::{Deserialize, Serialize};

use crate::params::MS_PER_SECOND;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateCheckpoint {
    pub t: f64,
    /// Hz, averaged over the whole run so far.
    pub firing_rate: f64,
    pub threshold: f64,
}

/// Time series of a completed run. Per-tick series have one entry per tick of the grid
/// `t_0..=t_max`, entry 0 holding the initial state. Matrices are indexed `[tick][line]` over the
/// excitatory lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub times: Vec<f64>,
    pub voltages: Vec<f64>,
    pub thresholds: Vec<f64>,
    pub spike_times: Vec<f64>,
    pub weights: Vec<Vec<f64>>,
    pub facilitation: Option<Vec<Vec<f64>>>,
    pub depression: Option<Vec<Vec<f64>>>,
    pub rate_checkpoints: Vec<RateCheckpoint>,
}

impl SimulationRecord {
    pub fn with_capacity(num_ticks: usize, record_stp: bool) -> Self {
        let stp_matrix = || record_stp.then(|| Vec::with_capacity(num_ticks));

        Self {
            times: Vec::with_capacity(num_ticks),
            voltages: Vec::with_capacity(num_ticks),
            thresholds: Vec::with_capacity(num_ticks),
            spike_times: Vec::new(),
            weights: Vec::with_capacity(num_ticks),
            facilitation: stp_matrix(),
            depression: stp_matrix(),
            rate_checkpoints: Vec::new(),
        }
    }

    pub fn num_ticks(&self) -> usize {
        self.times.len()
    }

    pub fn spike_count(&self) -> usize {
        self.spike_times.len()
    }

    pub fn duration(&self) -> f64 {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Hz
    pub fn mean_firing_rate(&self) -> f64 {
        let duration = self.duration();
        if duration > 0.0 {
            self.spike_count() as f64 / duration * MS_PER_SECOND
        } else {
            0.0
        }
    }

    /// Output rate relative to the rate of a single input line.
    pub fn transmission_ratio(&self, input_rate: f64) -> f64 {
        if input_rate > 0.0 {
            self.mean_firing_rate() / input_rate
        } else {
            0.0
        }
    }

    pub fn weight_trace(&self, line_idx: usize) -> Vec<f64> {
        self.weights.iter().map(|row| row[line_idx]).collect()
    }

    pub fn checkpoint_rates(&self) -> Vec<f64> {
        self.rate_checkpoints
            .iter()
            .map(|checkpoint| checkpoint.firing_rate)
            .collect()
    }

    pub fn checkpoint_thresholds(&self) -> Vec<f64> {
        self.rate_checkpoints
            .iter()
            .map(|checkpoint| checkpoint.threshold)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use itertools::assert_equal;

    fn record() -> SimulationRecord {
        let mut record = SimulationRecord::with_capacity(3, false);
        record.times = vec![0.0, 1000.0, 2000.0];
        record.weights = vec![vec![0.1, 0.2], vec![0.15, 0.2], vec![0.3, 0.1]];
        record.spike_times = vec![10.0, 500.0, 1500.0, 1900.0];
        record.rate_checkpoints = vec![
            RateCheckpoint {
                t: 1000.0,
                firing_rate: 2.0,
                threshold: -50.3,
            },
            RateCheckpoint {
                t: 2000.0,
                firing_rate: 2.0,
                threshold: -50.6,
            },
        ];
        record
    }

    #[test]
    fn rates() {
        let record = record();

        assert_eq!(record.spike_count(), 4);
        assert_approx_eq!(f64, record.duration(), 2000.0);
        assert_approx_eq!(f64, record.mean_firing_rate(), 2.0);
        assert_approx_eq!(f64, record.transmission_ratio(10.0), 0.2);
        assert_approx_eq!(f64, record.transmission_ratio(0.0), 0.0);
    }

    #[test]
    fn empty_record() {
        let record = SimulationRecord::with_capacity(0, true);

        assert_eq!(record.num_ticks(), 0);
        assert_approx_eq!(f64, record.mean_firing_rate(), 0.0);
        assert!(record.facilitation.is_some());
        assert!(record.depression.is_some());
    }

    #[test]
    fn traces() {
        let record = record();

        assert_equal(record.weight_trace(0), [0.1, 0.15, 0.3]);
        assert_equal(record.checkpoint_rates(), [2.0, 2.0]);
        assert_equal(record.checkpoint_thresholds(), [-50.3, -50.6]);
    }
}
