use crate::{
    params::StdpParams,
    plasticity::{PlasticityRule, PlasticityTarget, TickContext},
    util::{clamp_weight, stdp_kernel},
};

/// Nearest-neighbour STDP on the excitatory lines. A presynaptic spike is paired with the most
/// recent postsynaptic spike of a strictly earlier tick (depression), a postsynaptic spike with
/// the most recent presynaptic spike of each line up to and including the same tick
/// (potentiation).
pub struct Stdp {
    params: StdpParams,
    last_pre_syn_spike_ticks: Vec<Option<usize>>,
    last_post_syn_spike_tick: Option<usize>,
}

impl Stdp {
    pub fn new(params: StdpParams, num_lines: usize) -> Self {
        Self {
            params,
            last_pre_syn_spike_ticks: vec![None; num_lines],
            last_post_syn_spike_tick: None,
        }
    }

    pub fn ltp(&self, t_post_minus_pre: f64) -> f64 {
        stdp_kernel(t_post_minus_pre, self.params.factor_ltp, self.params.tau_ltp)
    }

    pub fn ltd(&self, t_pre_minus_post: f64) -> f64 {
        stdp_kernel(t_pre_minus_post, self.params.factor_ltd, self.params.tau_ltd)
    }
}

impl PlasticityRule for Stdp {
    fn on_pre_syn_spikes(&mut self, ctx: &TickContext, target: &mut PlasticityTarget) {
        for &idx in ctx.spiking_line_idxs {
            if let Some(post_tick) = self.last_post_syn_spike_tick {
                let t_diff = (ctx.tick - post_tick) as f64 * ctx.time_step;
                let line = &mut target.lines[idx];
                line.weight = clamp_weight(line.weight - self.ltd(t_diff), self.params.max_weight);
            }

            self.last_pre_syn_spike_ticks[idx] = Some(ctx.tick);
        }
    }

    fn on_post_syn_spike(&mut self, ctx: &TickContext, target: &mut PlasticityTarget) {
        for (line, last_pre_tick) in target.lines.iter_mut().zip(&self.last_pre_syn_spike_ticks) {
            if let Some(pre_tick) = *last_pre_tick {
                let t_diff = (ctx.tick - pre_tick) as f64 * ctx.time_step;
                line.weight = clamp_weight(line.weight + self.ltp(t_diff), self.params.max_weight);
            }
        }

        self.last_post_syn_spike_tick = Some(ctx.tick);
    }
}
