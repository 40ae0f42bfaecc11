use crate::{
    euler::{decay_derivative, euler_step},
    params::StpParams,
    plasticity::{PlasticityRule, PlasticityTarget, TickContext},
    record::RateCheckpoint,
    synapse::StpState,
};

/// Facilitation and depression after Tsodyks et al. (1998). On a presynaptic spike `u` is
/// facilitated, the line's efficacy becomes `u * x` and the resources are depleted by `u * x`.
/// Every tick `u` decays towards 0 and `x` recovers towards 1. The efficacy scales the line's
/// long-term weight, which starts at `fixed_weight` and is left to STDP if that is active.
pub struct ShortTermPlasticity {
    params: StpParams,
}

impl ShortTermPlasticity {
    pub fn new(params: StpParams) -> Self {
        Self { params }
    }

    /// Returns the efficacy after the spike.
    pub fn on_spike(&self, state: &mut StpState) -> f64 {
        state.u += self.params.utilization * (1.0 - state.u);
        let efficacy = state.u * state.x;
        state.x -= efficacy;
        efficacy
    }

    pub fn relax(&self, state: &mut StpState, time_step: f64) {
        state.u = euler_step(state.u, time_step, |u| {
            decay_derivative(u, self.params.tau_facilitation)
        });
        state.x = euler_step(state.x, time_step, |x| {
            (1.0 - x) / self.params.tau_depression
        });
    }
}

impl PlasticityRule for ShortTermPlasticity {
    fn on_pre_syn_spikes(&mut self, ctx: &TickContext, target: &mut PlasticityTarget) {
        for &idx in ctx.spiking_line_idxs {
            let line = &mut target.lines[idx];
            if let Some(state) = line.stp_state.as_mut() {
                line.efficacy = self.on_spike(state);
            }
        }
    }

    fn on_tick_end(
        &mut self,
        ctx: &TickContext,
        target: &mut PlasticityTarget,
    ) -> Option<RateCheckpoint> {
        for line in target.lines.iter_mut() {
            if let Some(state) = line.stp_state.as_mut() {
                self.relax(state, ctx.time_step);
            }
        }

        None
    }
}
