use rand::rngs::StdRng;

use super::{Force, jiggle};
use crate::layout::SimNode;

/// Spring force pulling linked nodes toward a rest distance.
///
/// Each link's strength is `1 / min(degree(source), degree(target))`, so
/// hubs are pulled less than leaves, and the correction is split between the
/// endpoints in proportion to their degrees.
#[derive(Debug, Clone)]
pub struct LinkForce {
    links: Vec<(usize, usize)>,
    strengths: Vec<f32>,
    bias: Vec<f32>,
    distance: f32,
    iterations: usize,
}

impl LinkForce {
    /// Creates a link force over `(source, target)` node indices.
    ///
    /// Every index must be below `node_count`.
    pub fn new(links: Vec<(usize, usize)>, node_count: usize, distance: f32) -> Self {
        let mut degree = vec![0usize; node_count];
        for &(source, target) in &links {
            degree[source] += 1;
            degree[target] += 1;
        }

        let strengths = links
            .iter()
            .map(|&(s, t)| 1.0 / degree[s].min(degree[t]) as f32)
            .collect();
        let bias = links
            .iter()
            .map(|&(s, t)| degree[s] as f32 / (degree[s] + degree[t]) as f32)
            .collect();

        Self {
            links,
            strengths,
            bias,
            distance,
            iterations: 1,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    /// Per-link strengths, in link order.
    pub fn strengths(&self) -> &[f32] {
        &self.strengths
    }
}

impl Force for LinkForce {
    fn apply(&mut self, nodes: &mut [SimNode], alpha: f32, rng: &mut StdRng) {
        for _ in 0..self.iterations {
            for (i, &(s, t)) in self.links.iter().enumerate() {
                let source = &nodes[s];
                let target = &nodes[t];

                let mut x = target.x + target.vx - source.x - source.vx;
                let mut y = target.y + target.vy - source.y - source.vy;
                if x == 0.0 {
                    x = jiggle(rng);
                }
                if y == 0.0 {
                    y = jiggle(rng);
                }

                let mut l = (x * x + y * y).sqrt();
                l = (l - self.distance) / l * alpha * self.strengths[i];
                x *= l;
                y *= l;

                let b = self.bias[i];
                nodes[t].vx -= x * b;
                nodes[t].vy -= y * b;
                nodes[s].vx += x * (1.0 - b);
                nodes[s].vy += y * (1.0 - b);
            }
        }
    }
}
