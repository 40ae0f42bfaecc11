pub mod analysis;
pub mod params;
pub mod plasticity;
pub mod record;
pub mod simulation;
pub mod spike_train;
pub mod synapse;

mod euler;
mod intrinsic_plasticity;
mod neuron;
mod short_term_plasticity;
mod stdp;
mod util;
