use crate::neuron::Neuron;
use crate::params::{self, SimulationParams};
use crate::plasticity::{self, PlasticityRule, PlasticityTarget, TickContext};
use crate::record::{RateCheckpoint, SimulationRecord};
use crate::spike_train::{self, SpikeTrain};
use crate::synapse::{Polarity, StpState, SynapsePopulation};
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use simple_error::{try_with, SimpleError, SimpleResult};

/// Validates the parameters and generates the input spike trains from the configured seed.
pub fn create_simulation(params: SimulationParams) -> Result<Simulation, SimpleError> {
    try_with!(
        params::validate_simulation_params(&params),
        "invalid simulation parameters"
    );

    let mut rng = StdRng::seed_from_u64(params.technical_params.seed);
    let excitatory_trains = spike_train::create_excitatory_trains(&params, &mut rng)?;
    let inhibitory_trains = spike_train::create_inhibitory_trains(&params, &mut rng)?;

    create_simulation_with_spike_trains(params, excitatory_trains, inhibitory_trains)
}

/// Like [`create_simulation`], with externally supplied input spike trains. The configured
/// excitatory input and seed are not used. Tick 0 is the initial state, so trains must not fire
/// there.
pub fn create_simulation_with_spike_trains(
    params: SimulationParams,
    excitatory_trains: Vec<SpikeTrain>,
    inhibitory_trains: Vec<SpikeTrain>,
) -> Result<Simulation, SimpleError> {
    try_with!(
        params::validate_simulation_params(&params),
        "invalid simulation parameters"
    );

    let num_ticks = params.clock_params.num_steps() + 1;

    validate_spike_trains(
        &excitatory_trains,
        params.excitatory_params.num_synapses,
        num_ticks,
        "excitatory",
    )?;

    validate_spike_trains(
        &inhibitory_trains,
        params.inhibitory_params.num_synapses,
        num_ticks,
        "inhibitory",
    )?;

    let mut excitatory = SynapsePopulation::new(
        Polarity::Excitatory,
        &params.excitatory_params,
        excitatory_trains,
    );

    let inhibitory = SynapsePopulation::new(
        Polarity::Inhibitory,
        &params.inhibitory_params,
        inhibitory_trains,
    );

    if params.stp_params.is_some() {
        let initial_weight = params.initial_excitatory_weight();
        for line in excitatory.lines.iter_mut() {
            line.weight = initial_weight;
            line.stp_state = Some(StpState::default());
        }
    }

    let rules = plasticity::create_rules(&params);
    let neuron = Neuron::new(&params.neuron_params);
    let record = SimulationRecord::with_capacity(num_ticks, params.stp_params.is_some());

    info!(
        "simulation created: {} ticks, {} excitatory and {} inhibitory lines, {} plasticity rules",
        num_ticks,
        excitatory.lines.len(),
        inhibitory.lines.len(),
        rules.len()
    );

    let mut simulation = Simulation {
        num_steps: params.clock_params.num_steps(),
        params,
        neuron,
        excitatory,
        inhibitory,
        rules,
        record,
        tick_period: 1,
    };

    simulation.record_state(0);

    Ok(simulation)
}

fn validate_spike_trains(
    trains: &[SpikeTrain],
    num_synapses: usize,
    num_ticks: usize,
    population_name: &str,
) -> SimpleResult<()> {
    if trains.len() != num_synapses {
        return Err(SimpleError::new(format!(
            "{}: expected {} spike trains, got {}",
            population_name,
            num_synapses,
            trains.len()
        )));
    }

    if let Some(train) = trains.iter().find(|train| train.len() != num_ticks) {
        return Err(SimpleError::new(format!(
            "{}: spike train covers {} ticks, expected {}",
            population_name,
            train.len(),
            num_ticks
        )));
    }

    if trains.iter().any(|train| train.fires_at(0)) {
        return Err(SimpleError::new(format!(
            "{}: spike trains must not fire at tick 0",
            population_name
        )));
    }

    Ok(())
}

#[derive(Debug, Clone)]
pub struct TickResult {
    pub tick: usize,
    pub t: f64,
    pub voltage: f64,
    pub threshold: f64,
    pub spiked: bool,
    pub rate_checkpoint: Option<RateCheckpoint>,
}

pub struct Simulation {
    params: SimulationParams,
    neuron: Neuron,
    excitatory: SynapsePopulation,
    inhibitory: SynapsePopulation,
    rules: Vec<Box<dyn PlasticityRule + Send>>,
    record: SimulationRecord,
    tick_period: usize,
    num_steps: usize,
}

impl Simulation {
    pub fn get_tick_period(&self) -> usize {
        self.tick_period
    }

    pub fn get_num_steps(&self) -> usize {
        self.num_steps
    }

    pub fn is_finished(&self) -> bool {
        self.tick_period > self.num_steps
    }

    pub fn get_voltage(&self) -> f64 {
        self.neuron.get_voltage()
    }

    pub fn get_threshold(&self) -> f64 {
        self.neuron.get_threshold()
    }

    pub fn get_last_spike_time(&self) -> Option<f64> {
        self.neuron
            .get_last_spike_tick()
            .map(|tick| self.params.clock_params.time_at(tick))
    }

    pub fn get_excitatory_weights(&self) -> Vec<f64> {
        self.excitatory.weights()
    }

    pub fn get_excitatory_spike_trains(&self) -> &[SpikeTrain] {
        self.excitatory.spike_trains()
    }

    pub fn get_inhibitory_spike_trains(&self) -> &[SpikeTrain] {
        self.inhibitory.spike_trains()
    }

    pub fn get_record(&self) -> &SimulationRecord {
        &self.record
    }

    /// Conductances, drive, voltage and spike check, then plasticity, then recording.
    pub fn tick(&mut self) -> SimpleResult<TickResult> {
        if self.is_finished() {
            return Err(SimpleError::new("simulation already reached t_max"));
        }

        let tick = self.tick_period;
        let t = self.params.clock_params.time_at(tick);
        let time_step = self.params.clock_params.time_step;
        let neuron_params = &self.params.neuron_params;

        let last_voltage = self.neuron.get_voltage();
        let spiking_line_idxs = self.excitatory.advance(tick, time_step);
        self.inhibitory.advance(tick, time_step);

        let total_input = self.excitatory.drive(last_voltage) + self.inhibitory.drive(last_voltage);

        let mut ctx = TickContext {
            tick,
            t,
            time_step,
            spiking_line_idxs: &spiking_line_idxs,
            post_syn_spike_count: self.neuron.get_spike_count(),
        };

        {
            let mut target = PlasticityTarget {
                lines: &mut self.excitatory.lines,
                threshold: self.neuron.threshold_mut(),
            };

            for rule in self.rules.iter_mut() {
                rule.on_pre_syn_spikes(&ctx, &mut target);
            }
        }

        self.neuron.integrate(total_input, time_step, neuron_params);

        if !self.neuron.get_voltage().is_finite() {
            warn!("non-finite membrane voltage at t = {}", t);
            return Err(SimpleError::new(format!(
                "numerical instability: non-finite membrane voltage at t = {}",
                t
            )));
        }

        let spiked = self.neuron.check_spike(tick, neuron_params);
        ctx.post_syn_spike_count = self.neuron.get_spike_count();

        let mut rate_checkpoint = None;

        {
            let mut target = PlasticityTarget {
                lines: &mut self.excitatory.lines,
                threshold: self.neuron.threshold_mut(),
            };

            if spiked {
                for rule in self.rules.iter_mut() {
                    rule.on_post_syn_spike(&ctx, &mut target);
                }
            }

            for rule in self.rules.iter_mut() {
                if let Some(checkpoint) = rule.on_tick_end(&ctx, &mut target) {
                    rate_checkpoint = Some(checkpoint);
                }
            }
        }

        if !self.neuron.get_threshold().is_finite()
            || !self.excitatory.is_finite()
            || !self.inhibitory.is_finite()
        {
            warn!("non-finite synaptic or threshold state at t = {}", t);
            return Err(SimpleError::new(format!(
                "numerical instability: non-finite synaptic or threshold state at t = {}",
                t
            )));
        }

        if spiked {
            self.record.spike_times.push(t);
        }

        if let Some(checkpoint) = rate_checkpoint {
            self.record.rate_checkpoints.push(checkpoint);
        }

        self.record_state(tick);
        self.tick_period += 1;

        Ok(TickResult {
            tick,
            t,
            voltage: self.neuron.get_voltage(),
            threshold: self.neuron.get_threshold(),
            spiked,
            rate_checkpoint,
        })
    }

    /// Ticks until `t_max` and hands over the record.
    pub fn run(mut self) -> SimpleResult<SimulationRecord> {
        while !self.is_finished() {
            self.tick()?;
        }

        info!(
            "simulation finished: {} spikes, mean firing rate {:.3} Hz",
            self.record.spike_count(),
            self.record.mean_firing_rate()
        );

        Ok(self.record)
    }

    fn record_state(&mut self, tick: usize) {
        let record = &mut self.record;
        record.times.push(self.params.clock_params.time_at(tick));
        record.voltages.push(self.neuron.get_voltage());
        record.thresholds.push(self.neuron.get_threshold());
        record.weights.push(self.excitatory.weights());

        if let Some(facilitation) = record.facilitation.as_mut() {
            facilitation.push(stp_values(&self.excitatory, |state| state.u));
        }

        if let Some(depression) = record.depression.as_mut() {
            depression.push(stp_values(&self.excitatory, |state| state.x));
        }
    }
}

fn stp_values(population: &SynapsePopulation, value: impl Fn(&StpState) -> f64) -> Vec<f64> {
    population
        .lines
        .iter()
        .map(|line| line.stp_state.as_ref().map_or(0.0, &value))
        .collect()
}
