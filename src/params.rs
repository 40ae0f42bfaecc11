use serde::{Deserialize, Serialize};
use simple_error::SimpleError;

pub const MS_PER_SECOND: f64 = 1000.0;

const GRID_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationParams {
    pub neuron_params: NeuronParams,
    pub clock_params: ClockParams,
    pub excitatory_params: SynapsePopulationParams,
    pub inhibitory_params: SynapsePopulationParams,
    pub excitatory_input: ExcitatoryInputParams,
    pub stdp_params: Option<StdpParams>,
    pub ip_params: Option<IpParams>,
    pub stp_params: Option<StpParams>,
    pub technical_params: TechnicalParams,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuronParams {
    pub tau_membrane: f64,
    pub leak_potential: f64,
    pub reset_voltage: f64,
    pub threshold: f64,
    pub voltage_floor: Option<f64>,
}

/// Times are in ms, the simulation covers `t_0..=t_max` in steps of `time_step`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockParams {
    pub t_0: f64,
    pub t_max: f64,
    pub time_step: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynapsePopulationParams {
    pub num_synapses: usize,
    pub tau: f64,
    pub reversal_potential: f64,
    /// Hz
    pub firing_rate: f64,
    pub initial_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExcitatoryInputParams {
    Poisson,
    Correlated { c1: f64, c2: f64 },
    CorrelatedJitter { c1: f64, c2: f64, tau_c: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StdpParams {
    pub tau_ltp: f64,
    pub factor_ltp: f64,
    pub tau_ltd: f64,
    pub factor_ltd: f64,
    pub max_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpParams {
    pub learning_rate: f64,
    /// Hz
    pub target_rate: f64,
    pub checkpoint_period: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StpParams {
    pub tau_facilitation: f64,
    pub tau_depression: f64,
    pub utilization: f64,
    pub fixed_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalParams {
    pub seed: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            neuron_params: NeuronParams::default(),
            clock_params: ClockParams::default(),
            excitatory_params: SynapsePopulationParams::default_excitatory(),
            inhibitory_params: SynapsePopulationParams::default_inhibitory(),
            excitatory_input: ExcitatoryInputParams::default(),
            stdp_params: None,
            ip_params: None,
            stp_params: None,
            technical_params: TechnicalParams::default(),
        }
    }
}

impl Default for NeuronParams {
    fn default() -> Self {
        Self {
            tau_membrane: 20.0,
            leak_potential: -60.0,
            reset_voltage: -70.0,
            threshold: -50.0,
            voltage_floor: Some(-70.0),
        }
    }
}

impl Default for ClockParams {
    fn default() -> Self {
        Self {
            t_0: 0.0,
            t_max: 10000.0,
            time_step: 1.0,
        }
    }
}

impl SynapsePopulationParams {
    pub fn default_excitatory() -> Self {
        Self {
            num_synapses: 100,
            tau: 3.0,
            reversal_potential: 0.0,
            firing_rate: 10.0,
            initial_weight: 0.05,
        }
    }

    pub fn default_inhibitory() -> Self {
        Self {
            num_synapses: 25,
            tau: 5.0,
            reversal_potential: -80.0,
            firing_rate: 10.0,
            initial_weight: 0.05,
        }
    }
}

impl Default for ExcitatoryInputParams {
    fn default() -> Self {
        ExcitatoryInputParams::Poisson
    }
}

impl Default for StdpParams {
    fn default() -> Self {
        Self {
            tau_ltp: 17.0,
            factor_ltp: 0.005,
            tau_ltd: 34.0,
            factor_ltd: 0.0055,
            max_weight: 0.1,
        }
    }
}

impl Default for IpParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            target_rate: 5.0,
            checkpoint_period: 1000.0,
        }
    }
}

impl Default for StpParams {
    fn default() -> Self {
        Self {
            tau_facilitation: 750.0,
            tau_depression: 50.0,
            utilization: 0.15,
            fixed_weight: 0.5,
        }
    }
}

impl Default for TechnicalParams {
    fn default() -> Self {
        Self { seed: 0 }
    }
}

impl SimulationParams {
    /// STDP together with intrinsic plasticity of the threshold.
    pub fn stdp_ip_defaults() -> Self {
        Self {
            excitatory_input: ExcitatoryInputParams::CorrelatedJitter {
                c1: 0.2,
                c2: 0.05,
                tau_c: 5.0,
            },
            stdp_params: Some(StdpParams::default()),
            ip_params: Some(IpParams::default()),
            ..Self::default()
        }
    }

    /// Long-term weight of every excitatory line at the start. Under short-term plasticity this is
    /// `fixed_weight`, otherwise the population's `initial_weight`.
    pub fn initial_excitatory_weight(&self) -> f64 {
        match &self.stp_params {
            Some(stp_params) => stp_params.fixed_weight,
            None => self.excitatory_params.initial_weight,
        }
    }

    /// Short-term facilitation and depression on the excitatory synapses, no inhibition.
    pub fn stp_defaults() -> Self {
        let mut inhibitory_params = SynapsePopulationParams::default_inhibitory();
        inhibitory_params.num_synapses = 0;

        Self {
            inhibitory_params,
            stp_params: Some(StpParams::default()),
            ..Self::default()
        }
    }
}

impl ClockParams {
    pub fn num_steps(&self) -> usize {
        ((self.t_max - self.t_0) / self.time_step).round() as usize
    }

    pub fn time_at(&self, tick: usize) -> f64 {
        self.t_0 + tick as f64 * self.time_step
    }

    pub fn ticks_in(&self, duration: f64) -> usize {
        (duration / self.time_step).round() as usize
    }
}

/// Probability that a line fires within one time step of `time_step` ms.
pub fn spike_probability_per_step(firing_rate: f64, time_step: f64) -> f64 {
    firing_rate * time_step / MS_PER_SECOND
}

pub fn validate_simulation_params(params: &SimulationParams) -> Result<(), SimpleError> {
    validate_clock_params(&params.clock_params)?;
    validate_neuron_params(&params.neuron_params)?;
    validate_population_params(&params.excitatory_params, &params.clock_params, "excitatory")?;
    validate_population_params(&params.inhibitory_params, &params.clock_params, "inhibitory")?;
    validate_excitatory_input_params(&params.excitatory_input)?;

    if let Some(stdp_params) = &params.stdp_params {
        validate_stdp_params(stdp_params)?;
    }

    if let Some(ip_params) = &params.ip_params {
        validate_ip_params(ip_params, &params.clock_params)?;
    }

    if let Some(stp_params) = &params.stp_params {
        validate_stp_params(stp_params)?;
    }

    if let Some(stdp_params) = &params.stdp_params {
        if params.initial_excitatory_weight() > stdp_params.max_weight {
            return Err(SimpleError::new("initial_weight must not exceed max_weight"));
        }
    }

    Ok(())
}

fn is_whole_number_of_steps(duration: f64, time_step: f64) -> bool {
    let steps = duration / time_step;
    (steps - steps.round()).abs() < GRID_TOLERANCE * steps.max(1.0)
}

fn validate_clock_params(clock_params: &ClockParams) -> Result<(), SimpleError> {
    if !(clock_params.time_step > 0.0) || !clock_params.time_step.is_finite() {
        return Err(SimpleError::new("time_step must be strictly positive"));
    }

    if !clock_params.t_0.is_finite() || !clock_params.t_max.is_finite() {
        return Err(SimpleError::new("t_0 and t_max must be finite"));
    }

    if clock_params.t_max <= clock_params.t_0 {
        return Err(SimpleError::new("t_max must be greater than t_0"));
    }

    if !is_whole_number_of_steps(clock_params.t_max - clock_params.t_0, clock_params.time_step) {
        return Err(SimpleError::new(
            "t_max - t_0 must be a whole number of time steps",
        ));
    }

    Ok(())
}

fn validate_neuron_params(neuron_params: &NeuronParams) -> Result<(), SimpleError> {
    if !(neuron_params.tau_membrane > 0.0) {
        return Err(SimpleError::new("tau_membrane must be strictly positive"));
    }

    if !(neuron_params.reset_voltage < neuron_params.threshold) {
        return Err(SimpleError::new("reset_voltage must be less than threshold"));
    }

    if let Some(voltage_floor) = neuron_params.voltage_floor {
        if voltage_floor > neuron_params.reset_voltage {
            return Err(SimpleError::new(
                "voltage_floor must not be greater than reset_voltage",
            ));
        }
    }

    Ok(())
}

fn validate_population_params(
    population_params: &SynapsePopulationParams,
    clock_params: &ClockParams,
    population_name: &str,
) -> Result<(), SimpleError> {
    if !(population_params.tau > 0.0) {
        return Err(SimpleError::new(format!(
            "{}: tau must be strictly positive",
            population_name
        )));
    }

    if !(population_params.firing_rate >= 0.0) {
        return Err(SimpleError::new(format!(
            "{}: firing_rate must not be negative",
            population_name
        )));
    }

    if spike_probability_per_step(population_params.firing_rate, clock_params.time_step) > 1.0 {
        return Err(SimpleError::new(format!(
            "{}: firing_rate too high for time_step",
            population_name
        )));
    }

    if !(population_params.initial_weight >= 0.0) {
        return Err(SimpleError::new(format!(
            "{}: initial_weight must not be negative",
            population_name
        )));
    }

    Ok(())
}

pub fn validate_correlation(c: f64) -> Result<(), SimpleError> {
    if !(0.0..=1.0).contains(&c) {
        return Err(SimpleError::new(format!(
            "correlation coefficient must be in [0, 1], got {}",
            c
        )));
    }

    Ok(())
}

fn validate_excitatory_input_params(
    input_params: &ExcitatoryInputParams,
) -> Result<(), SimpleError> {
    match *input_params {
        ExcitatoryInputParams::Poisson => Ok(()),
        ExcitatoryInputParams::Correlated { c1, c2 } => {
            validate_correlation(c1)?;
            validate_correlation(c2)
        }
        ExcitatoryInputParams::CorrelatedJitter { c1, c2, tau_c } => {
            validate_correlation(c1)?;
            validate_correlation(c2)?;

            if !(tau_c >= 0.0) || !tau_c.is_finite() {
                return Err(SimpleError::new("tau_c must not be negative"));
            }

            Ok(())
        }
    }
}

fn validate_stdp_params(stdp_params: &StdpParams) -> Result<(), SimpleError> {
    if !(stdp_params.tau_ltp > 0.0) {
        return Err(SimpleError::new("tau_ltp must be strictly positive"));
    }

    if !(stdp_params.tau_ltd > 0.0) {
        return Err(SimpleError::new("tau_ltd must be strictly positive"));
    }

    if !(stdp_params.factor_ltp >= 0.0) || !(stdp_params.factor_ltd >= 0.0) {
        return Err(SimpleError::new("stdp factors must not be negative"));
    }

    if !(stdp_params.max_weight > 0.0) {
        return Err(SimpleError::new("max_weight must be strictly positive"));
    }

    Ok(())
}

fn validate_ip_params(ip_params: &IpParams, clock_params: &ClockParams) -> Result<(), SimpleError> {
    if !ip_params.learning_rate.is_finite() {
        return Err(SimpleError::new("ip learning_rate must be finite"));
    }

    if !(ip_params.target_rate >= 0.0) {
        return Err(SimpleError::new("ip target_rate must not be negative"));
    }

    if !(ip_params.checkpoint_period > 0.0) {
        return Err(SimpleError::new(
            "ip checkpoint_period must be strictly positive",
        ));
    }

    if !is_whole_number_of_steps(ip_params.checkpoint_period, clock_params.time_step)
        || clock_params.ticks_in(ip_params.checkpoint_period) == 0
    {
        return Err(SimpleError::new(
            "ip checkpoint_period must be a whole number of time steps",
        ));
    }

    Ok(())
}

fn validate_stp_params(stp_params: &StpParams) -> Result<(), SimpleError> {
    if !(stp_params.tau_facilitation > 0.0) {
        return Err(SimpleError::new("tau_facilitation must be strictly positive"));
    }

    if !(stp_params.tau_depression > 0.0) {
        return Err(SimpleError::new("tau_depression must be strictly positive"));
    }

    if !(stp_params.utilization > 0.0 && stp_params.utilization <= 1.0) {
        return Err(SimpleError::new("utilization must be in (0, 1]"));
    }

    if !(stp_params.fixed_weight >= 0.0) {
        return Err(SimpleError::new("fixed_weight must not be negative"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::util::test_util;

    fn assert_invalid(params: &SimulationParams, expected_msg: &str) {
        let result = validate_simulation_params(params);

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().as_str(), expected_msg);
    }

    #[test]
    fn valid_params() {
        let params = test_util::get_template_simulation_params();
        assert!(validate_simulation_params(&params).is_ok());
    }

    #[test]
    fn variant_defaults_are_valid() {
        assert!(validate_simulation_params(&SimulationParams::default()).is_ok());
        assert!(validate_simulation_params(&SimulationParams::stdp_ip_defaults()).is_ok());
        assert!(validate_simulation_params(&SimulationParams::stp_defaults()).is_ok());
    }

    #[test]
    fn zero_time_step() {
        let mut params = test_util::get_template_simulation_params();
        params.clock_params.time_step = 0.0;
        assert_invalid(&params, "time_step must be strictly positive");
    }

    #[test]
    fn negative_time_step() {
        let mut params = test_util::get_template_simulation_params();
        params.clock_params.time_step = -1.0;
        assert_invalid(&params, "time_step must be strictly positive");
    }

    #[test]
    fn nan_time_step() {
        let mut params = test_util::get_template_simulation_params();
        params.clock_params.time_step = f64::NAN;
        assert_invalid(&params, "time_step must be strictly positive");
    }

    #[test]
    fn t_max_not_after_t_0() {
        let mut params = test_util::get_template_simulation_params();
        params.clock_params.t_0 = 100.0;
        params.clock_params.t_max = 100.0;
        assert_invalid(&params, "t_max must be greater than t_0");
    }

    #[test]
    fn duration_off_grid() {
        let mut params = test_util::get_template_simulation_params();
        params.clock_params.t_max = 100.5;
        assert_invalid(&params, "t_max - t_0 must be a whole number of time steps");
    }

    #[test]
    fn fractional_time_step_on_grid() {
        let mut params = test_util::get_template_simulation_params();
        params.clock_params.time_step = 0.1;
        params.clock_params.t_max = 1000.0;
        assert!(validate_simulation_params(&params).is_ok());
        assert_eq!(params.clock_params.num_steps(), 10000);
    }

    #[test]
    fn zero_tau_membrane() {
        let mut params = test_util::get_template_simulation_params();
        params.neuron_params.tau_membrane = 0.0;
        assert_invalid(&params, "tau_membrane must be strictly positive");
    }

    #[test]
    fn reset_not_below_threshold() {
        let mut params = test_util::get_template_simulation_params();
        params.neuron_params.reset_voltage = params.neuron_params.threshold;
        assert_invalid(&params, "reset_voltage must be less than threshold");
    }

    #[test]
    fn voltage_floor_above_reset() {
        let mut params = test_util::get_template_simulation_params();
        params.neuron_params.voltage_floor = Some(params.neuron_params.reset_voltage + 1.0);
        assert_invalid(&params, "voltage_floor must not be greater than reset_voltage");
    }

    #[test]
    fn zero_tau_inhibitory() {
        let mut params = test_util::get_template_simulation_params();
        params.inhibitory_params.tau = 0.0;
        assert_invalid(&params, "inhibitory: tau must be strictly positive");
    }

    #[test]
    fn negative_firing_rate() {
        let mut params = test_util::get_template_simulation_params();
        params.excitatory_params.firing_rate = -1.0;
        assert_invalid(&params, "excitatory: firing_rate must not be negative");
    }

    #[test]
    fn firing_rate_too_high_for_time_step() {
        let mut params = test_util::get_template_simulation_params();
        params.excitatory_params.firing_rate = 1001.0;
        assert_invalid(&params, "excitatory: firing_rate too high for time_step");
    }

    #[test]
    fn negative_initial_weight() {
        let mut params = test_util::get_template_simulation_params();
        params.inhibitory_params.initial_weight = -0.1;
        assert_invalid(&params, "inhibitory: initial_weight must not be negative");
    }

    #[test]
    fn correlation_out_of_range() {
        let mut params = test_util::get_template_simulation_params();
        params.excitatory_input = ExcitatoryInputParams::Correlated { c1: 0.1, c2: 1.1 };
        assert_invalid(&params, "correlation coefficient must be in [0, 1], got 1.1");

        params.excitatory_input = ExcitatoryInputParams::CorrelatedJitter {
            c1: -0.1,
            c2: 0.1,
            tau_c: 1.0,
        };
        assert_invalid(&params, "correlation coefficient must be in [0, 1], got -0.1");
    }

    #[test]
    fn nan_correlation() {
        assert!(validate_correlation(f64::NAN).is_err());
    }

    #[test]
    fn negative_jitter() {
        let mut params = test_util::get_template_simulation_params();
        params.excitatory_input = ExcitatoryInputParams::CorrelatedJitter {
            c1: 0.1,
            c2: 0.1,
            tau_c: -1.0,
        };
        assert_invalid(&params, "tau_c must not be negative");
    }

    #[test]
    fn zero_tau_ltd() {
        let mut params = test_util::get_template_simulation_params();
        params.stdp_params.as_mut().unwrap().tau_ltd = 0.0;
        assert_invalid(&params, "tau_ltd must be strictly positive");
    }

    #[test]
    fn zero_max_weight() {
        let mut params = test_util::get_template_simulation_params();
        params.stdp_params.as_mut().unwrap().max_weight = 0.0;
        assert_invalid(&params, "max_weight must be strictly positive");
    }

    #[test]
    fn negative_stdp_factor() {
        let mut params = test_util::get_template_simulation_params();
        params.stdp_params.as_mut().unwrap().factor_ltd = -0.1;
        assert_invalid(&params, "stdp factors must not be negative");
    }

    #[test]
    fn initial_weight_above_max_weight() {
        let mut params = test_util::get_template_simulation_params();
        params.excitatory_params.initial_weight = 1.0;
        assert_invalid(&params, "initial_weight must not exceed max_weight");

        params.excitatory_params.initial_weight = 0.1;
        assert!(validate_simulation_params(&params).is_ok());

        params.stdp_params = None;
        params.excitatory_params.initial_weight = 1.0;
        assert!(validate_simulation_params(&params).is_ok());
    }

    #[test]
    fn fixed_weight_above_max_weight() {
        let mut params = test_util::get_template_simulation_params();
        params.stp_params = Some(StpParams {
            fixed_weight: 0.5,
            ..StpParams::default()
        });
        assert_invalid(&params, "initial_weight must not exceed max_weight");

        params.stp_params.as_mut().unwrap().fixed_weight = 0.08;
        assert!(validate_simulation_params(&params).is_ok());
        float_cmp::assert_approx_eq!(f64, params.initial_excitatory_weight(), 0.08);
    }

    #[test]
    fn checkpoint_period_off_grid() {
        let mut params = test_util::get_template_simulation_params();
        params.clock_params.time_step = 0.3;
        params.clock_params.t_max = 3000.0;
        params.ip_params.as_mut().unwrap().checkpoint_period = 1000.0;
        assert_invalid(&params, "ip checkpoint_period must be a whole number of time steps");
    }

    #[test]
    fn zero_checkpoint_period() {
        let mut params = test_util::get_template_simulation_params();
        params.ip_params.as_mut().unwrap().checkpoint_period = 0.0;
        assert_invalid(&params, "ip checkpoint_period must be strictly positive");
    }

    #[test]
    fn utilization_out_of_range() {
        let mut params = test_util::get_template_simulation_params();
        params.stdp_params = None;
        params.stp_params = Some(StpParams {
            utilization: 0.0,
            ..StpParams::default()
        });
        assert_invalid(&params, "utilization must be in (0, 1]");

        params.stp_params.as_mut().unwrap().utilization = 1.0;
        assert!(validate_simulation_params(&params).is_ok());
    }

    #[test]
    fn zero_tau_depression() {
        let mut params = test_util::get_template_simulation_params();
        params.stp_params = Some(StpParams {
            tau_depression: 0.0,
            ..StpParams::default()
        });
        assert_invalid(&params, "tau_depression must be strictly positive");
    }

    #[test]
    fn clock_grid() {
        let clock_params = ClockParams {
            t_0: 10.0,
            t_max: 20.0,
            time_step: 0.5,
        };

        assert_eq!(clock_params.num_steps(), 20);
        assert_eq!(clock_params.ticks_in(5.0), 10);
        assert!((clock_params.time_at(3) - 11.5).abs() < 1e-12);
    }
}
