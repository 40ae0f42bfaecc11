/// Exponential STDP kernel for a pairing separated by `t_diff >= 0` time units.
pub fn stdp_kernel(t_diff: f64, factor: f64, tau: f64) -> f64 {
    factor * (-t_diff / tau).exp()
}

pub fn clamp_weight(weight: f64, max_weight: f64) -> f64 {
    weight.max(0.0).min(max_weight)
}
