//! Tick loop tying a layout backend to the SVG exporter.

use log::{debug, info};

use schemagraph_core::geometry::Point;

use crate::{
    config::StyleConfig,
    error::SchemaGraphError,
    export::svg::Svg,
    graph::SchemaGraph,
    layout::{DragController, DragGesture, Frame, LayoutBackend, LayoutError},
    palette::Palette,
};

/// Drives a [`LayoutBackend`] for one graph and renders each tick.
///
/// The driver owns the backend, so ticks and drag gestures are applied one at
/// a time through `&mut self`.
#[derive(Debug)]
pub struct Driver<'g, B: LayoutBackend> {
    graph: &'g SchemaGraph,
    backend: B,
    svg: Svg,
    drag: DragController,
}

impl<'g, B: LayoutBackend> Driver<'g, B> {
    /// Creates a driver with the palette derived from `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaGraphError::Config`] if the style has an invalid
    /// palette or background color.
    pub fn new(
        graph: &'g SchemaGraph,
        backend: B,
        style: &StyleConfig,
    ) -> Result<Self, SchemaGraphError> {
        let scheme = style.palette().map_err(SchemaGraphError::Config)?;
        let palette = Palette::new(graph, &scheme);
        let svg =
            Svg::new(palette, style).map_err(|err| SchemaGraphError::Config(err.to_string()))?;

        Ok(Self {
            graph,
            backend,
            svg,
            drag: DragController::new(),
        })
    }

    pub fn graph(&self) -> &'g SchemaGraph {
        self.graph
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn palette(&self) -> &Palette {
        self.svg.palette()
    }

    /// Advances the layout by one tick and renders the new frame.
    ///
    /// Returns `Ok(None)` without rendering once the layout has settled.
    pub fn tick(&mut self) -> Result<Option<svg::Document>, SchemaGraphError> {
        if !self.backend.step() {
            return Ok(None);
        }
        self.render().map(Some)
    }

    /// Ticks until the layout settles or `max_ticks` ticks ran, calling
    /// `on_tick` with every frame. Returns the final frame.
    pub fn run(&mut self, max_ticks: usize, mut on_tick: impl FnMut(&Frame)) -> Frame {
        for frame in self.backend.frames().take(max_ticks) {
            on_tick(&frame);
        }

        let frame = self.backend.frame();
        if self.backend.is_running() {
            info!(
                ticks = frame.tick(),
                alpha = frame.alpha();
                "Tick limit reached before layout settled"
            );
        } else {
            info!(ticks = frame.tick(); "Layout settled");
        }
        frame
    }

    /// Renders the current frame.
    pub fn render(&self) -> Result<svg::Document, SchemaGraphError> {
        Ok(self.svg.render(self.graph, &self.backend.frame())?)
    }

    /// Fixes a node at `position`.
    pub fn pin(&mut self, id: &str, position: Point) -> Result<(), LayoutError> {
        debug!(node = id, x = position.x(), y = position.y(); "Pinning node");
        self.backend.pin(id, position)
    }

    pub fn unpin(&mut self, id: &str) -> Result<(), LayoutError> {
        self.backend.unpin(id)
    }

    pub fn drag_start(&mut self, id: &str) -> Result<DragGesture, LayoutError> {
        self.drag.start(&mut self.backend, id)
    }

    /// Starts a drag on the node under `pointer`, if any.
    pub fn drag_start_at(&mut self, pointer: Point, radius: f32) -> Option<DragGesture> {
        self.drag.start_at(&mut self.backend, pointer, radius)
    }

    pub fn drag_move(&mut self, gesture: &DragGesture, pointer: Point) -> Result<(), LayoutError> {
        self.drag.drag(&mut self.backend, gesture, pointer)
    }

    pub fn drag_end(&mut self, gesture: DragGesture) -> Result<(), LayoutError> {
        self.drag.end(&mut self.backend, gesture)
    }
}

#[cfg(test)]
mod tests {
    use schemagraph_core::model::{Edge, EdgeType, Node};

    use super::*;
    use crate::{config::LayoutConfig, layout::Simulation};

    fn graph() -> SchemaGraph {
        SchemaGraph::new(
            vec![Node::new("A"), Node::new("B"), Node::new("C")],
            vec![
                Edge::new("A", "B", EdgeType::Inheritance),
                Edge::new("C", "A", EdgeType::EdgeIn),
            ],
        )
    }

    fn driver(graph: &SchemaGraph) -> Driver<'_, Simulation> {
        let sim = Simulation::compute_layout(graph, &LayoutConfig::default()).unwrap();
        Driver::new(graph, sim, &StyleConfig::default()).unwrap()
    }

    #[test]
    fn test_tick_renders_until_settled() {
        let graph = graph();
        let mut driver = driver(&graph);

        let first = driver.tick().unwrap().unwrap().to_string();
        assert!(first.contains("translate("));

        let mut rendered = 1;
        while driver.tick().unwrap().is_some() {
            rendered += 1;
        }
        assert!(rendered < 400, "rendered {rendered} frames");
        assert!(!driver.backend().is_running());
    }

    #[test]
    fn test_run_reports_every_frame() {
        let graph = graph();
        let mut driver = driver(&graph);

        let mut ticks = Vec::new();
        let last = driver.run(1000, |frame| ticks.push(frame.tick()));

        assert_eq!(ticks.first(), Some(&1));
        assert_eq!(ticks.last(), Some(&last.tick()));
    }

    #[test]
    fn test_run_respects_tick_cap() {
        let graph = graph();
        let mut driver = driver(&graph);

        let last = driver.run(10, |_| {});
        assert_eq!(last.tick(), 10);
        assert!(driver.backend().is_running());
    }

    #[test]
    fn test_drag_round_trip() {
        let graph = graph();
        let mut driver = driver(&graph);
        driver.run(1000, |_| {});

        let gesture = driver.drag_start("B").unwrap();
        driver.drag_move(&gesture, Point::new(100.0, 100.0)).unwrap();
        assert!(driver.tick().unwrap().is_some());
        assert_eq!(driver.backend().position("B"), Some(Point::new(100.0, 100.0)));

        driver.drag_end(gesture).unwrap();
        driver.run(1000, |_| {});
        assert!(!driver.backend().is_running());
    }

    #[test]
    fn test_drag_start_at_picks_node_under_pointer() {
        let graph = graph();
        let mut driver = driver(&graph);
        let frame = driver.run(1000, |_| {});

        let c = frame.position("C").unwrap();
        let gesture = driver.drag_start_at(c.add_point(Point::new(1.0, 1.0)), 5.0).unwrap();
        assert_eq!(gesture.node_id(), "C");
        assert!(driver.backend().is_running());

        driver.drag_end(gesture).unwrap();
        assert!(driver.drag_start_at(Point::new(5000.0, 5000.0), 5.0).is_none());
    }

    #[test]
    fn test_palette_covers_present_types() {
        let graph = graph();
        let driver = driver(&graph);
        let types: Vec<_> = driver.palette().entries().map(|(t, _)| t).collect();
        assert_eq!(types, [EdgeType::Inheritance, EdgeType::EdgeIn]);
    }

    #[test]
    fn test_invalid_palette_is_a_config_error() {
        let graph = graph();
        let sim = Simulation::compute_layout(&graph, &LayoutConfig::default()).unwrap();
        let style: StyleConfig = serde_json::from_str(r#"{"palette": ["nope"]}"#).unwrap();

        let err = Driver::new(&graph, sim, &style).unwrap_err();
        assert!(matches!(err, SchemaGraphError::Config(_)));
    }
}
