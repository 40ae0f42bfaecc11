use plastic_lif::params::SimulationParams;

pub fn get_stdp_ip_scenario_params() -> SimulationParams {
    let params_yaml_str = r#"
neuron_params:
  tau_membrane: 20.0
  leak_potential: -60.0
  reset_voltage: -70.0
  threshold: -50.0
  voltage_floor: -70.0
clock_params:
  t_0: 0.0
  t_max: 10000.0
  time_step: 1.0
excitatory_params:
  num_synapses: 100
  tau: 3.0
  reversal_potential: 0.0
  firing_rate: 10.0
  initial_weight: 0.05
inhibitory_params:
  num_synapses: 25
  tau: 5.0
  reversal_potential: -80.0
  firing_rate: 10.0
  initial_weight: 0.05
excitatory_input: !CorrelatedJitter
  c1: 0.2
  c2: 0.0
  tau_c: 5.0
stdp_params:
  tau_ltp: 17.0
  factor_ltp: 0.005
  tau_ltd: 34.0
  factor_ltd: 0.0055
  max_weight: 0.1
ip_params:
  learning_rate: 0.05
  target_rate: 5.0
  checkpoint_period: 1000.0
stp_params: null
technical_params:
  seed: 0
"#;

    serde_yaml::from_str(params_yaml_str).unwrap()
}

pub fn get_stp_scenario_params() -> SimulationParams {
    let params_yaml_str = r#"
neuron_params:
  tau_membrane: 20.0
  leak_potential: -60.0
  reset_voltage: -70.0
  threshold: -50.0
  voltage_floor: null
clock_params:
  t_0: 0.0
  t_max: 2000.0
  time_step: 1.0
excitatory_params:
  num_synapses: 10
  tau: 3.0
  reversal_potential: 0.0
  firing_rate: 20.0
  initial_weight: 0.5
inhibitory_params:
  num_synapses: 0
  tau: 5.0
  reversal_potential: -80.0
  firing_rate: 10.0
  initial_weight: 0.05
excitatory_input: Poisson
stdp_params: null
ip_params: null
stp_params:
  tau_facilitation: 750.0
  tau_depression: 50.0
  utilization: 0.15
  fixed_weight: 0.5
technical_params:
  seed: 0
"#;

    serde_yaml::from_str(params_yaml_str).unwrap()
}
