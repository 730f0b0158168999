use rand::rngs::StdRng;

use schemagraph_core::geometry::Point;

use super::{Force, jiggle};
use crate::layout::{SimNode, quadtree::QuadTree};

/// Mutual attraction (positive strength) or repulsion (negative strength)
/// between every pair of nodes, approximated with a Barnes–Hut quadtree.
#[derive(Debug, Clone)]
pub struct ManyBodyForce {
    strength: f32,
    theta2: f32,
    distance_min2: f32,
    distance_max2: f32,
}

impl ManyBodyForce {
    pub fn new(strength: f32) -> Self {
        Self {
            strength,
            theta2: 0.81,
            distance_min2: 1.0,
            distance_max2: f32::INFINITY,
        }
    }

    /// Sets the Barnes–Hut criterion; smaller values are more accurate.
    pub fn with_theta(mut self, theta: f32) -> Self {
        self.theta2 = theta * theta;
        self
    }

    /// Clamps the distance between two bodies from below and above.
    pub fn with_distance_range(mut self, min: f32, max: f32) -> Self {
        self.distance_min2 = min * min;
        self.distance_max2 = max * max;
        self
    }
}

impl Force for ManyBodyForce {
    fn apply(&mut self, nodes: &mut [SimNode], alpha: f32, rng: &mut StdRng) {
        let points: Vec<Point> = nodes.iter().map(|n| Point::new(n.x, n.y)).collect();
        let strengths = vec![self.strength; nodes.len()];
        let tree = QuadTree::new(&points, &strengths);

        for index in 0..nodes.len() {
            let node = points[index];
            let mut vx = 0.0;
            let mut vy = 0.0;

            tree.visit(|quad, width| {
                if quad.value() == 0.0 {
                    return true;
                }

                let centroid = quad.centroid();
                let mut x = centroid.x() - node.x();
                let mut y = centroid.y() - node.y();
                let mut l = x * x + y * y;

                // Far enough away to treat the whole quad as one body.
                if width * width / self.theta2 < l {
                    if l < self.distance_max2 {
                        if x == 0.0 {
                            x = jiggle(rng);
                            l += x * x;
                        }
                        if y == 0.0 {
                            y = jiggle(rng);
                            l += y * y;
                        }
                        if l < self.distance_min2 {
                            l = (self.distance_min2 * l).sqrt();
                        }
                        vx += x * quad.value() * alpha / l;
                        vy += y * quad.value() * alpha / l;
                    }
                    return true;
                }

                if !quad.is_leaf() || l >= self.distance_max2 {
                    return !quad.is_leaf();
                }

                let points = quad.points();
                if points.iter().any(|&other| other != index) {
                    if x == 0.0 {
                        x = jiggle(rng);
                        l += x * x;
                    }
                    if y == 0.0 {
                        y = jiggle(rng);
                        l += y * y;
                    }
                    if l < self.distance_min2 {
                        l = (self.distance_min2 * l).sqrt();
                    }
                }

                for &other in points.iter().filter(|&&other| other != index) {
                    let w = strengths[other] * alpha / l;
                    vx += x * w;
                    vy += y * w;
                }
                true
            });

            nodes[index].vx += vx;
            nodes[index].vy += vy;
        }
    }
}
