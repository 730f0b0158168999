use rand::rngs::StdRng;

use super::Force;
use crate::layout::SimNode;

/// Axis along which a [`PositionForce`] acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Pulls every node toward the origin along one axis.
#[derive(Debug, Clone)]
pub struct PositionForce {
    axis: Axis,
    strength: f32,
}

impl PositionForce {
    pub fn new(axis: Axis, strength: f32) -> Self {
        Self { axis, strength }
    }
}

impl Force for PositionForce {
    fn apply(&mut self, nodes: &mut [SimNode], alpha: f32, _rng: &mut StdRng) {
        let k = self.strength * alpha;
        for node in nodes {
            match self.axis {
                Axis::X => node.vx -= node.x * k,
                Axis::Y => node.vy -= node.y * k,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_pulls_toward_origin_on_its_axis_only() {
        let mut nodes = vec![SimNode::new("A", 50.0, -20.0)];
        let mut rng = StdRng::seed_from_u64(0);

        PositionForce::new(Axis::X, 0.1).apply(&mut nodes, 0.5, &mut rng);
        assert_approx_eq!(f32, nodes[0].vx, -2.5);
        assert_approx_eq!(f32, nodes[0].vy, 0.0);

        PositionForce::new(Axis::Y, 0.1).apply(&mut nodes, 1.0, &mut rng);
        assert_approx_eq!(f32, nodes[0].vx, -2.5);
        assert_approx_eq!(f32, nodes[0].vy, 2.0);
    }
}
