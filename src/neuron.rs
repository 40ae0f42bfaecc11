use crate::{
    euler::{euler_step, membrane_voltage_derivative},
    params::NeuronParams,
};

#[derive(Debug, Clone)]
pub struct Neuron {
    voltage: f64,
    threshold: f64,
    last_spike_tick: Option<usize>,
    spike_count: usize,
}

impl Neuron {
    pub fn new(neuron_params: &NeuronParams) -> Self {
        Self {
            voltage: neuron_params.reset_voltage,
            threshold: neuron_params.threshold,
            last_spike_tick: None,
            spike_count: 0,
        }
    }

    pub fn get_voltage(&self) -> f64 {
        self.voltage
    }

    pub fn get_threshold(&self) -> f64 {
        self.threshold
    }

    pub fn threshold_mut(&mut self) -> &mut f64 {
        &mut self.threshold
    }

    pub fn get_last_spike_tick(&self) -> Option<usize> {
        self.last_spike_tick
    }

    pub fn get_spike_count(&self) -> usize {
        self.spike_count
    }

    /// Advances the membrane voltage by one Euler step. Spikes are left to [`Neuron::check_spike`].
    pub fn integrate(&mut self, total_input: f64, time_step: f64, neuron_params: &NeuronParams) {
        self.voltage = euler_step(self.voltage, time_step, |v| {
            membrane_voltage_derivative(
                v,
                total_input,
                neuron_params.leak_potential,
                neuron_params.tau_membrane,
            )
        });

        if let Some(voltage_floor) = neuron_params.voltage_floor {
            self.voltage = self.voltage.max(voltage_floor);
        }
    }

    pub fn check_spike(&mut self, tick: usize, neuron_params: &NeuronParams) -> bool {
        if self.voltage >= self.threshold {
            self.spike(tick, neuron_params);
            true
        } else {
            false
        }
    }

    pub fn spike(&mut self, tick: usize, neuron_params: &NeuronParams) {
        self.last_spike_tick = Some(tick);
        self.spike_count += 1;
        self.voltage = neuron_params.reset_voltage;
    }
}
