use rand::{
    distributions::{Bernoulli, Uniform},
    prelude::Distribution,
    Rng,
};
use serde::{Deserialize, Serialize};
use simple_error::{SimpleError, SimpleResult};

use crate::params::{
    self, ClockParams, ExcitatoryInputParams, SimulationParams, SynapsePopulationParams,
};

/// Spike occurrence flags over the tick grid `0..=num_steps`. Tick 0 is the initial state and
/// never carries a spike from the generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpikeTrain {
    fires: Vec<bool>,
}

impl SpikeTrain {
    pub fn silent(num_ticks: usize) -> Self {
        Self {
            fires: vec![false; num_ticks],
        }
    }

    /// Ticks outside the grid are ignored.
    pub fn from_spike_ticks(num_ticks: usize, spike_ticks: &[usize]) -> Self {
        let mut result = Self::silent(num_ticks);
        for &tick in spike_ticks {
            if tick < num_ticks {
                result.fires[tick] = true;
            }
        }
        result
    }

    pub fn fires_at(&self, tick: usize) -> bool {
        self.fires.get(tick).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.fires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fires.is_empty()
    }

    pub fn spike_count(&self) -> usize {
        self.fires.iter().filter(|fires| **fires).count()
    }

    pub fn spike_ticks(&self) -> impl Iterator<Item = usize> + '_ {
        self.fires
            .iter()
            .enumerate()
            .filter_map(|(tick, fires)| (*fires).then_some(tick))
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.fires
    }
}

fn num_ticks(clock_params: &ClockParams) -> usize {
    clock_params.num_steps() + 1
}

fn bernoulli(p: f64) -> SimpleResult<Bernoulli> {
    Bernoulli::new(p).map_err(|_| {
        SimpleError::new(format!("spike probability per step must be in [0, 1], got {}", p))
    })
}

/// Independent trains, each tick firing with probability `firing_rate * time_step`.
pub fn poisson_trains<R: Rng>(
    num_trains: usize,
    firing_rate: f64,
    clock_params: &ClockParams,
    rng: &mut R,
) -> SimpleResult<Vec<SpikeTrain>> {
    let num_ticks = num_ticks(clock_params);
    let dist = bernoulli(params::spike_probability_per_step(
        firing_rate,
        clock_params.time_step,
    ))?;

    Ok((0..num_trains)
        .map(|_| {
            let mut train = SpikeTrain::silent(num_ticks);
            for tick in 1..num_ticks {
                train.fires[tick] = dist.sample(rng);
            }
            train
        })
        .collect())
}

/// Copy probability and source probability so that each derived train fires with probability
/// `p` per step and any two derived trains have Pearson correlation `c` at zero lag.
///
/// Derived trains copy each source event independently with probability `q`, so
/// `p = p_source * q` and `corr = (q - p) / (1 - p)`, which gives `q = c + p * (1 - c)`.
pub fn source_and_copy_probabilities(p: f64, c: f64) -> SimpleResult<(f64, f64)> {
    params::validate_correlation(c)?;
    bernoulli(p)?;

    if p == 0.0 {
        return Ok((0.0, 0.0));
    }

    let copy_probability = c + p * (1.0 - c);
    let source_probability = p / copy_probability;

    if source_probability > 1.0 {
        return Err(SimpleError::new(format!(
            "correlation {} not achievable at spike probability {}",
            c, p
        )));
    }

    Ok((source_probability, copy_probability))
}

/// Trains derived from one shared source train. Each copied spike is displaced by a uniform
/// offset in `-jitter_ticks..=jitter_ticks`; spikes displaced off the grid are lost.
pub fn correlated_trains<R: Rng>(
    num_trains: usize,
    firing_rate: f64,
    c: f64,
    jitter_ticks: usize,
    clock_params: &ClockParams,
    rng: &mut R,
) -> SimpleResult<Vec<SpikeTrain>> {
    let num_ticks = num_ticks(clock_params);
    let p = params::spike_probability_per_step(firing_rate, clock_params.time_step);
    let (source_probability, copy_probability) = source_and_copy_probabilities(p, c)?;

    let source_dist = bernoulli(source_probability)?;
    let copy_dist = bernoulli(copy_probability)?;
    let jitter_bound = jitter_ticks as i64;
    let jitter_dist = Uniform::new_inclusive(-jitter_bound, jitter_bound);

    let source_ticks: Vec<usize> = (1..num_ticks)
        .filter(|_| source_dist.sample(rng))
        .collect();

    let mut trains = vec![SpikeTrain::silent(num_ticks); num_trains];

    for source_tick in source_ticks {
        for train in trains.iter_mut() {
            if !copy_dist.sample(rng) {
                continue;
            }

            let offset = if jitter_ticks > 0 {
                jitter_dist.sample(rng)
            } else {
                0
            };

            let tick = source_tick as i64 + offset;
            if tick >= 1 && (tick as usize) < num_ticks {
                train.fires[tick as usize] = true;
            }
        }
    }

    Ok(trains)
}

/// Two correlated groups (`c1` for the first half of the lines, `c2` for the rest), concatenated.
pub fn create_excitatory_trains<R: Rng>(
    params: &SimulationParams,
    rng: &mut R,
) -> SimpleResult<Vec<SpikeTrain>> {
    let population_params = &params.excitatory_params;
    let clock_params = &params.clock_params;
    let num_group_1 = population_params.num_synapses / 2;
    let num_group_2 = population_params.num_synapses - num_group_1;
    let rate = population_params.firing_rate;

    let (c1, c2, jitter_ticks) = match params.excitatory_input {
        ExcitatoryInputParams::Poisson => {
            return create_poisson_population(population_params, clock_params, rng)
        }
        ExcitatoryInputParams::Correlated { c1, c2 } => (c1, c2, 0),
        ExcitatoryInputParams::CorrelatedJitter { c1, c2, tau_c } => {
            (c1, c2, clock_params.ticks_in(tau_c))
        }
    };

    let mut trains = correlated_trains(num_group_1, rate, c1, jitter_ticks, clock_params, rng)?;
    trains.extend(correlated_trains(
        num_group_2,
        rate,
        c2,
        jitter_ticks,
        clock_params,
        rng,
    )?);

    Ok(trains)
}

pub fn create_inhibitory_trains<R: Rng>(
    params: &SimulationParams,
    rng: &mut R,
) -> SimpleResult<Vec<SpikeTrain>> {
    create_poisson_population(&params.inhibitory_params, &params.clock_params, rng)
}

fn create_poisson_population<R: Rng>(
    population_params: &SynapsePopulationParams,
    clock_params: &ClockParams,
    rng: &mut R,
) -> SimpleResult<Vec<SpikeTrain>> {
    poisson_trains(
        population_params.num_synapses,
        population_params.firing_rate,
        clock_params,
        rng,
    )
}
