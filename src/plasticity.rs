use crate::{
    intrinsic_plasticity::IntrinsicPlasticity, params::SimulationParams,
    record::RateCheckpoint, short_term_plasticity::ShortTermPlasticity, stdp::Stdp,
    synapse::SynapseLine,
};

#[derive(Debug, Clone)]
pub struct TickContext<'a> {
    pub tick: usize,
    pub t: f64,
    pub time_step: f64,
    /// Excitatory lines with a presynaptic spike in this tick.
    pub spiking_line_idxs: &'a [usize],
    /// Postsynaptic spikes since the start, including one in this tick.
    pub post_syn_spike_count: usize,
}

pub struct PlasticityTarget<'a> {
    pub lines: &'a mut [SynapseLine],
    pub threshold: &'a mut f64,
}

/// Hooks are invoked by the driver in this order within a tick: `on_pre_syn_spikes` after the
/// conductance update, `on_post_syn_spike` right after a threshold crossing and reset,
/// `on_tick_end` once the tick is otherwise complete.
pub trait PlasticityRule {
    fn on_pre_syn_spikes(&mut self, _ctx: &TickContext, _target: &mut PlasticityTarget) {}

    fn on_post_syn_spike(&mut self, _ctx: &TickContext, _target: &mut PlasticityTarget) {}

    fn on_tick_end(
        &mut self,
        _ctx: &TickContext,
        _target: &mut PlasticityTarget,
    ) -> Option<RateCheckpoint> {
        None
    }
}

pub fn create_rules(params: &SimulationParams) -> Vec<Box<dyn PlasticityRule + Send>> {
    let mut rules: Vec<Box<dyn PlasticityRule + Send>> = Vec::new();
    let num_lines = params.excitatory_params.num_synapses;

    if let Some(stdp_params) = &params.stdp_params {
        rules.push(Box::new(Stdp::new(stdp_params.clone(), num_lines)));
    }

    if let Some(stp_params) = &params.stp_params {
        rules.push(Box::new(ShortTermPlasticity::new(stp_params.clone())));
    }

    if let Some(ip_params) = &params.ip_params {
        rules.push(Box::new(IntrinsicPlasticity::new(ip_params.clone())));
    }

    rules
}
