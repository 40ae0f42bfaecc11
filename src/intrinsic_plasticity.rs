use log::debug;

use crate::{
    params::{IpParams, MS_PER_SECOND},
    plasticity::{PlasticityRule, PlasticityTarget, TickContext},
    record::RateCheckpoint,
};

const CHECKPOINT_TOLERANCE: f64 = 1e-9;

/// Homeostatic threshold control on a fixed checkpoint schedule. Checkpoints fall on the absolute
/// times that are whole multiples of `checkpoint_period`, independent of `t_0`. At every
/// checkpoint the firing rate observed since `t_0` is compared with the target rate and the
/// threshold is moved by `learning_rate * (rate - target_rate)`.
pub struct IntrinsicPlasticity {
    params: IpParams,
}

impl IntrinsicPlasticity {
    pub fn new(params: IpParams) -> Self {
        Self { params }
    }

    fn is_checkpoint(&self, tick: usize, t: f64) -> bool {
        let periods = t / self.params.checkpoint_period;
        let off_grid = (periods - periods.round()).abs();
        tick > 0 && off_grid < CHECKPOINT_TOLERANCE * periods.abs().max(1.0)
    }
}

impl PlasticityRule for IntrinsicPlasticity {
    fn on_tick_end(
        &mut self,
        ctx: &TickContext,
        target: &mut PlasticityTarget,
    ) -> Option<RateCheckpoint> {
        if !self.is_checkpoint(ctx.tick, ctx.t) {
            return None;
        }

        let elapsed = ctx.tick as f64 * ctx.time_step;
        let firing_rate = ctx.post_syn_spike_count as f64 / elapsed * MS_PER_SECOND;

        *target.threshold += self.params.learning_rate * (firing_rate - self.params.target_rate);

        debug!(
            "ip checkpoint at t = {}: rate {:.3} Hz, threshold {:.4}",
            ctx.t, firing_rate, *target.threshold
        );

        Some(RateCheckpoint {
            t: ctx.t,
            firing_rate,
            threshold: *target.threshold,
        })
    }
}
