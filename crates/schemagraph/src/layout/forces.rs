//! Forces acting on a [`Simulation`](super::Simulation).
//!
//! Each force nudges node velocities once per tick, scaled by the current
//! alpha. Positions are only integrated by the simulation itself.

mod link;
mod many_body;
mod position;

pub use link::LinkForce;
pub use many_body::ManyBodyForce;
pub use position::{Axis, PositionForce};

use std::fmt;

use rand::{Rng, rngs::StdRng};

use super::SimNode;

/// A force applied to every node on each tick.
pub trait Force: fmt::Debug {
    /// Accumulate this force into the node velocities.
    fn apply(&mut self, nodes: &mut [SimNode], alpha: f32, rng: &mut StdRng);
}

/// Tiny random offset used to separate coincident nodes.
pub(crate) fn jiggle(rng: &mut StdRng) -> f32 {
    (rng.random::<f32>() - 0.5) * 1e-6
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_jiggle_is_tiny_and_nonzero_on_average() {
        let mut rng = StdRng::seed_from_u64(7);
        let values: Vec<f32> = (0..100).map(|_| jiggle(&mut rng)).collect();

        assert!(values.iter().all(|v| v.abs() <= 5e-7));
        assert!(values.iter().any(|v| *v != 0.0));
    }
}
