//! Velocity Verlet force simulation.
//!
//! The simulation cools from `alpha = 1` toward `alpha_target` by a fixed
//! fraction per tick and stops once alpha drops below `alpha_min`. With the
//! default decay a cold start settles in 300 ticks.

use std::f32::consts::PI;

use indexmap::IndexMap;
use log::{debug, trace};
use rand::{SeedableRng, rngs::StdRng};

use schemagraph_core::geometry::Point;

use super::{
    Frame, LayoutBackend, LayoutError,
    forces::{Axis, Force, LinkForce, ManyBodyForce, PositionForce},
};
use crate::{config::LayoutConfig, graph::SchemaGraph};

/// A node's physical state.
#[derive(Debug, Clone, PartialEq)]
pub struct SimNode {
    id: String,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) vx: f32,
    pub(crate) vy: f32,
    pub(crate) fx: Option<f32>,
    pub(crate) fy: Option<f32>,
}

impl SimNode {
    pub fn new(id: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            fx: None,
            fy: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn velocity(&self) -> Point {
        Point::new(self.vx, self.vy)
    }

    pub fn is_pinned(&self) -> bool {
        self.fx.is_some() || self.fy.is_some()
    }
}

/// Initial placement on a phyllotaxis spiral, which spreads nodes evenly
/// around the origin without overlaps.
fn phyllotaxis(index: usize) -> Point {
    let angle_step = PI * (3.0 - 5.0_f32.sqrt());
    let radius = 10.0 * (0.5 + index as f32).sqrt();
    let angle = index as f32 * angle_step;
    Point::new(radius * angle.cos(), radius * angle.sin())
}

/// Force-directed layout backend.
#[derive(Debug)]
pub struct Simulation {
    nodes: Vec<SimNode>,
    index: IndexMap<String, usize>,
    forces: IndexMap<&'static str, Box<dyn Force>>,
    alpha: f32,
    alpha_min: f32,
    alpha_decay: f32,
    alpha_target: f32,
    velocity_decay: f32,
    running: bool,
    tick: usize,
    rng: StdRng,
}

impl Simulation {
    /// Creates a simulation without forces, with nodes on a phyllotaxis spiral.
    pub fn new<I, S>(ids: I, config: &LayoutConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut nodes = Vec::new();
        let mut index = IndexMap::new();
        for id in ids {
            let id = id.into();
            if index.contains_key(&id) {
                continue;
            }
            let p = phyllotaxis(nodes.len());
            index.insert(id.clone(), nodes.len());
            nodes.push(SimNode::new(id, p.x(), p.y()));
        }

        Self {
            nodes,
            index,
            forces: IndexMap::new(),
            alpha: 1.0,
            alpha_min: config.alpha_min(),
            alpha_decay: config.alpha_decay(),
            alpha_target: 0.0,
            velocity_decay: 1.0 - config.velocity_decay(),
            running: true,
            tick: 0,
            rng: StdRng::seed_from_u64(config.seed()),
        }
    }

    /// Registers a force under `name`, replacing any force with that name.
    pub fn with_force(mut self, name: &'static str, force: impl Force + 'static) -> Self {
        self.forces.insert(name, Box::new(force));
        self
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&SimNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Names of the registered forces, in application order.
    pub fn force_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.forces.keys().copied()
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> usize {
        self.tick
    }

    fn node_index(&self, id: &str) -> Result<usize, LayoutError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| LayoutError::UnknownNode(id.to_string()))
    }

    /// Advance the physics by one tick regardless of the running state.
    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        for force in self.forces.values_mut() {
            force.apply(&mut self.nodes, self.alpha, &mut self.rng);
        }

        for node in &mut self.nodes {
            match node.fx {
                Some(fx) => {
                    node.x = fx;
                    node.vx = 0.0;
                }
                None => {
                    node.vx *= self.velocity_decay;
                    node.x += node.vx;
                }
            }
            match node.fy {
                Some(fy) => {
                    node.y = fy;
                    node.vy = 0.0;
                }
                None => {
                    node.vy *= self.velocity_decay;
                    node.y += node.vy;
                }
            }
        }

        self.tick += 1;
        if self.tick % 50 == 0 {
            debug!(tick = self.tick, alpha = self.alpha; "Simulation cooling");
        } else {
            trace!(tick = self.tick, alpha = self.alpha; "Simulation tick");
        }
    }
}

impl LayoutBackend for Simulation {
    /// Sets up the standard forces: `link`, `charge`, `x` and `y`.
    fn compute_layout(graph: &SchemaGraph, config: &LayoutConfig) -> Result<Self, LayoutError> {
        let simulation = Self::new(graph.nodes().iter().map(|node| node.id()), config);

        let links = graph
            .edges()
            .iter()
            .map(|edge| {
                Ok((
                    simulation.node_index(edge.source())?,
                    simulation.node_index(edge.target())?,
                ))
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;

        debug!(
            nodes = simulation.nodes.len(),
            links = links.len();
            "Starting force simulation"
        );

        let link = LinkForce::new(links, simulation.nodes.len(), config.link_distance())
            .with_iterations(config.link_iterations());
        let charge = ManyBodyForce::new(config.charge_strength())
            .with_theta(config.theta())
            .with_distance_range(config.distance_min(), config.distance_max());

        Ok(simulation
            .with_force("link", link)
            .with_force("charge", charge)
            .with_force("x", PositionForce::new(Axis::X, config.center_strength()))
            .with_force("y", PositionForce::new(Axis::Y, config.center_strength())))
    }

    fn step(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.tick();
        if self.alpha < self.alpha_min {
            self.running = false;
            debug!(ticks = self.tick, alpha = self.alpha; "Simulation settled");
        }
        true
    }

    fn frame(&self) -> Frame {
        let positions = self
            .nodes
            .iter()
            .map(|node| (node.id.clone(), node.position()))
            .collect();
        Frame::new(self.tick, self.alpha, positions)
    }

    fn position(&self, id: &str) -> Option<Point> {
        self.node(id).map(SimNode::position)
    }

    fn alpha(&self) -> f32 {
        self.alpha
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn pin(&mut self, id: &str, position: Point) -> Result<(), LayoutError> {
        let i = self.node_index(id)?;
        if !position.is_finite() {
            return Err(LayoutError::InvalidPosition(id.to_string()));
        }

        let started = self.tick > 0;
        let node = &mut self.nodes[i];
        node.fx = Some(position.x());
        node.fy = Some(position.y());
        // Before the first tick the node starts at its pin.
        if !started {
            node.x = position.x();
            node.y = position.y();
        }
        Ok(())
    }

    fn unpin(&mut self, id: &str) -> Result<(), LayoutError> {
        let i = self.node_index(id)?;
        let node = &mut self.nodes[i];
        node.fx = None;
        node.fy = None;
        Ok(())
    }

    fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    fn restart(&mut self) {
        self.running = true;
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use schemagraph_core::model::{Edge, EdgeType, Node};

    use super::*;

    fn graph() -> SchemaGraph {
        SchemaGraph::new(
            vec![
                Node::new("A"),
                Node::new("B"),
                Node::new("C"),
                Node::new("D"),
                Node::new("E"),
            ],
            vec![
                Edge::new("A", "B", EdgeType::Inheritance),
                Edge::new("B", "C", EdgeType::Link),
                Edge::new("D", "A", EdgeType::EdgeIn),
            ],
        )
    }

    fn simulation() -> Simulation {
        Simulation::compute_layout(&graph(), &LayoutConfig::default()).unwrap()
    }

    #[test]
    fn test_initial_positions_follow_phyllotaxis() {
        let sim = simulation();

        assert_eq!(sim.nodes().len(), 5);
        let first = sim.position("A").unwrap();
        assert_approx_eq!(f32, first.hypot(), 10.0 * 0.5_f32.sqrt(), epsilon = 1e-4);
        assert_approx_eq!(f32, first.y(), 0.0);
        assert!(sim.nodes().iter().all(|n| n.velocity().is_zero()));
    }

    #[test]
    fn test_standard_forces_in_order() {
        let names: Vec<_> = simulation().force_names().collect();
        assert_eq!(names, ["link", "charge", "x", "y"]);
    }

    #[test]
    fn test_unknown_edge_endpoint_is_an_error() {
        let graph = SchemaGraph::new(
            vec![Node::new("A")],
            vec![Edge::new("A", "Ghost", EdgeType::Link)],
        );
        let err = Simulation::compute_layout(&graph, &LayoutConfig::default()).unwrap_err();
        assert_eq!(err, LayoutError::UnknownNode("Ghost".to_string()));
    }

    #[test]
    fn test_settles_after_about_300_ticks() {
        let mut sim = simulation();
        let frame = sim.settle(1000);

        assert!(!sim.is_running());
        assert!(sim.alpha() < 0.001);
        assert!((295..=305).contains(&frame.tick()), "ticks: {}", frame.tick());
        assert!(!sim.step(), "a settled simulation does not tick");
    }

    #[test]
    fn test_alpha_decays_monotonically() {
        let mut sim = simulation();
        let alphas: Vec<f32> = sim.frames().take(50).map(|f| f.alpha()).collect();
        assert!(alphas.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_pinned_node_holds_position() {
        let mut sim = simulation();
        let pinned = Point::new(200.0, -100.0);
        sim.pin("C", pinned).unwrap();
        sim.settle(1000);

        assert_eq!(sim.position("C"), Some(pinned));
        assert!(sim.node("C").unwrap().is_pinned());
        assert!(sim.node("C").unwrap().velocity().is_zero());
    }

    #[test]
    fn test_unpin_releases_node() {
        let mut sim = simulation();
        sim.pin("C", Point::new(500.0, 500.0)).unwrap();
        sim.frames().take(10).for_each(drop);
        sim.unpin("C").unwrap();
        sim.frames().take(10).for_each(drop);

        assert!(!sim.node("C").unwrap().is_pinned());
        assert_ne!(sim.position("C"), Some(Point::new(500.0, 500.0)));
    }

    #[test]
    fn test_pinned_node_starts_at_its_pin() {
        let mut sim = simulation();
        let pinned = Point::new(500.0, 500.0);
        sim.pin("A", pinned).unwrap();
        assert_eq!(sim.position("A"), Some(pinned));

        sim.step();
        let moved = Point::new(-500.0, 0.0);
        sim.pin("A", moved).unwrap();
        assert_eq!(sim.position("A"), Some(pinned), "later pins apply on the next tick");
        sim.step();
        assert_eq!(sim.position("A"), Some(moved));
    }

    #[test]
    fn test_non_finite_pin_is_rejected() {
        let mut sim = simulation();
        for position in [Point::new(f32::NAN, 0.0), Point::new(0.0, f32::INFINITY)] {
            assert_eq!(
                sim.pin("B", position),
                Err(LayoutError::InvalidPosition("B".to_string()))
            );
        }
        assert!(!sim.node("B").unwrap().is_pinned());

        let frame = sim.settle(1000);
        assert!(frame.positions().all(|(_, p)| p.is_finite()));
    }

    #[test]
    fn test_pin_unknown_node() {
        let mut sim = simulation();
        assert!(sim.pin("Ghost", Point::default()).is_err());
        assert!(sim.unpin("Ghost").is_err());
    }

    #[test]
    fn test_alpha_target_keeps_simulation_warm() {
        let mut sim = simulation();
        sim.settle(1000);
        assert!(!sim.is_running());

        sim.set_alpha_target(0.3);
        sim.restart();
        sim.frames().take(500).for_each(drop);

        assert!(sim.is_running());
        assert!(sim.alpha() > 0.2);

        sim.set_alpha_target(0.0);
        sim.settle(1000);
        assert!(!sim.is_running());
    }

    #[test]
    fn test_linked_nodes_end_closer_than_unlinked() {
        let mut sim = simulation();
        let frame = sim.settle(1000);

        let distance = |s: &str, t: &str| {
            frame
                .position(s)
                .unwrap()
                .distance(frame.position(t).unwrap())
        };
        let linked = (distance("A", "B") + distance("B", "C") + distance("D", "A")) / 3.0;
        let isolated = ["A", "B", "C", "D"]
            .iter()
            .map(|id| distance("E", id))
            .sum::<f32>()
            / 4.0;
        assert!(linked < isolated, "linked {linked} isolated {isolated}");
    }

    #[test]
    fn test_layout_is_roughly_centered() {
        let mut sim = simulation();
        let bounds = sim.settle(1000).bounds().unwrap();

        let center = bounds.center();
        assert!(center.hypot() < 100.0, "center: {center:?}");
        assert!(bounds.width() < 1000.0 && bounds.height() < 1000.0);
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let a = simulation().settle(1000);
        let b = simulation().settle(1000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_duplicate_ids_share_a_node() {
        let sim = Simulation::new(["A", "B", "A"], &LayoutConfig::default());
        assert_eq!(sim.nodes().len(), 2);
    }
}
