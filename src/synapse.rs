use serde::{Deserialize, Serialize};

use crate::{
    euler::{decay_derivative, euler_step},
    params::SynapsePopulationParams,
    spike_train::SpikeTrain,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Excitatory,
    Inhibitory,
}

/// Facilitation `u` and available resources `x` of a short-term plastic line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StpState {
    pub u: f64,
    pub x: f64,
}

impl Default for StpState {
    fn default() -> Self {
        Self { u: 0.0, x: 1.0 }
    }
}

/// `weight` is the long-term weight (the one STDP acts on). A presynaptic spike adds
/// `weight * efficacy` to the conductance; `efficacy` stays 1 unless short-term plasticity sets it.
#[derive(Debug, Clone)]
pub struct SynapseLine {
    pub idx: usize,
    pub polarity: Polarity,
    pub conductance: f64,
    pub weight: f64,
    pub efficacy: f64,
    pub stp_state: Option<StpState>,
}

impl SynapseLine {
    pub fn new(idx: usize, polarity: Polarity, initial_weight: f64) -> Self {
        Self {
            idx,
            polarity,
            conductance: 0.0,
            weight: initial_weight,
            efficacy: 1.0,
            stp_state: None,
        }
    }
}

/// One Euler decay step for every line, then the effective weight of each line whose train fires
/// at `tick` is added to its conductance. Returns the indexes of the spiking lines.
pub fn advance_conductances(
    lines: &mut [SynapseLine],
    spike_trains: &[SpikeTrain],
    tick: usize,
    time_step: f64,
    tau: f64,
) -> Vec<usize> {
    let mut spiking_idxs = Vec::new();

    for (line, train) in lines.iter_mut().zip(spike_trains) {
        line.conductance = euler_step(line.conductance, time_step, |g| decay_derivative(g, tau));

        if train.fires_at(tick) {
            line.conductance += line.weight * line.efficacy;
            spiking_idxs.push(line.idx);
        }
    }

    spiking_idxs
}

pub fn synaptic_drive(lines: &[SynapseLine], reversal_potential: f64, voltage: f64) -> f64 {
    lines
        .iter()
        .map(|line| line.conductance * (reversal_potential - voltage))
        .sum()
}

/// The lines of one polarity together with their fixed input trains.
#[derive(Debug, Clone)]
pub struct SynapsePopulation {
    pub lines: Vec<SynapseLine>,
    spike_trains: Vec<SpikeTrain>,
    tau: f64,
    reversal_potential: f64,
}

impl SynapsePopulation {
    pub fn new(
        polarity: Polarity,
        params: &SynapsePopulationParams,
        spike_trains: Vec<SpikeTrain>,
    ) -> Self {
        let lines = (0..params.num_synapses)
            .map(|idx| SynapseLine::new(idx, polarity, params.initial_weight))
            .collect();

        Self {
            lines,
            spike_trains,
            tau: params.tau,
            reversal_potential: params.reversal_potential,
        }
    }

    pub fn advance(&mut self, tick: usize, time_step: f64) -> Vec<usize> {
        advance_conductances(&mut self.lines, &self.spike_trains, tick, time_step, self.tau)
    }

    pub fn drive(&self, voltage: f64) -> f64 {
        synaptic_drive(&self.lines, self.reversal_potential, voltage)
    }

    pub fn weights(&self) -> Vec<f64> {
        self.lines.iter().map(|line| line.weight).collect()
    }

    pub fn spike_trains(&self) -> &[SpikeTrain] {
        &self.spike_trains
    }

    pub fn is_finite(&self) -> bool {
        self.lines.iter().all(|line| {
            line.conductance.is_finite() && line.weight.is_finite() && line.efficacy.is_finite()
        })
    }
}
