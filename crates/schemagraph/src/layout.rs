//! Layout backends for schema graphs.
//!
//! A [`LayoutBackend`] turns a [`SchemaGraph`] into node positions that evolve
//! over time, one [`Frame`] per tick, and exposes the pin/unpin/reheat
//! capabilities that drag interaction needs. [`Simulation`] is the built-in
//! force-directed backend; [`DragController`] drives gestures over any
//! backend.

pub mod drag;
pub mod forces;

mod quadtree;
mod simulation;

pub use drag::{DragController, DragGesture};
pub use simulation::{SimNode, Simulation};

use std::str::FromStr;

use indexmap::IndexMap;
use thiserror::Error;

use schemagraph_core::geometry::{Bounds, Point};

use crate::{config::LayoutConfig, graph::SchemaGraph};

/// Errors raised by layout backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("node not found: {0}")]
    UnknownNode(String),

    #[error("position of node {0} must have finite coordinates")]
    InvalidPosition(String),
}

/// Node positions after one tick of a layout backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    tick: usize,
    alpha: f32,
    positions: IndexMap<String, Point>,
}

impl Frame {
    pub fn new(tick: usize, alpha: f32, positions: IndexMap<String, Point>) -> Self {
        Self {
            tick,
            alpha,
            positions,
        }
    }

    /// Number of ticks run before this frame was taken.
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// Simulation temperature when this frame was taken.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    /// Positions in node order.
    pub fn positions(&self) -> impl Iterator<Item = (&str, Point)> {
        self.positions.iter().map(|(id, p)| (id.as_str(), *p))
    }

    /// Smallest bounds containing every node, or `None` without nodes.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.positions.values().copied())
    }

    /// Closest node to `point` within `radius`.
    pub fn nearest(&self, point: Point, radius: f32) -> Option<&str> {
        self.positions()
            .map(|(id, p)| (id, p.distance(point)))
            .filter(|(_, distance)| *distance <= radius)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(id, _)| id)
    }
}

/// A fixed position for one node, e.g. `Person=120,-40`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    id: String,
    position: Point,
}

impl Pin {
    pub fn new(id: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }
}

impl FromStr for Pin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, coords) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected `<class>=<x>,<y>`, got `{s}`"))?;
        let (x, y) = coords
            .split_once(',')
            .ok_or_else(|| format!("expected `<x>,<y>` coordinates, got `{coords}`"))?;

        let parse = |value: &str| {
            let coordinate = value
                .trim()
                .parse::<f32>()
                .map_err(|err| format!("invalid coordinate `{value}`: {err}"))?;
            if coordinate.is_finite() {
                Ok(coordinate)
            } else {
                Err(format!("coordinate must be finite, got `{}`", value.trim()))
            }
        };

        let id = id.trim();
        if id.is_empty() {
            return Err(format!("missing class name in `{s}`"));
        }

        Ok(Self::new(id, Point::new(parse(x)?, parse(y)?)))
    }
}

/// A layout engine that positions graph nodes over time.
///
/// Implementations own all positional state. Positions only change through
/// [`step`](LayoutBackend::step) and the drag capabilities
/// ([`pin`](LayoutBackend::pin), [`unpin`](LayoutBackend::unpin),
/// [`set_alpha_target`](LayoutBackend::set_alpha_target),
/// [`restart`](LayoutBackend::restart)).
pub trait LayoutBackend {
    /// Prepare a layout for `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownNode`] if an edge endpoint is not a node.
    fn compute_layout(graph: &SchemaGraph, config: &LayoutConfig) -> Result<Self, LayoutError>
    where
        Self: Sized;

    /// Advance by one tick. Returns `false` without ticking once settled.
    fn step(&mut self) -> bool;

    /// Snapshot of the current positions.
    fn frame(&self) -> Frame;

    /// Current position of a node.
    fn position(&self, id: &str) -> Option<Point>;

    /// Current temperature.
    fn alpha(&self) -> f32;

    fn is_running(&self) -> bool;

    /// Fix a node at `position` until [`unpin`](LayoutBackend::unpin).
    ///
    /// Fails with [`LayoutError::InvalidPosition`] unless both coordinates
    /// are finite.
    fn pin(&mut self, id: &str, position: Point) -> Result<(), LayoutError>;

    /// Release a pinned node back to the physics.
    fn unpin(&mut self, id: &str) -> Result<(), LayoutError>;

    /// Temperature the layout decays toward.
    fn set_alpha_target(&mut self, target: f32);

    /// Resume ticking after the layout settled.
    fn restart(&mut self);

    /// Node closest to `point` within `radius`.
    fn find(&self, point: Point, radius: f32) -> Option<String> {
        self.frame().nearest(point, radius).map(str::to_string)
    }

    /// Frames produced by successive ticks until the layout settles.
    ///
    /// The iterator is unbounded while the layout is kept warm (for example
    /// during a drag); bound it with [`Iterator::take`].
    fn frames(&mut self) -> Frames<'_, Self>
    where
        Self: Sized,
    {
        Frames { backend: self }
    }

    /// Tick until the layout settles or `max_ticks` ticks ran, returning the
    /// final frame.
    fn settle(&mut self, max_ticks: usize) -> Frame
    where
        Self: Sized,
    {
        self.frames().take(max_ticks).for_each(drop);
        self.frame()
    }
}

/// Iterator over the frames of a running [`LayoutBackend`].
pub struct Frames<'a, B: LayoutBackend> {
    backend: &'a mut B,
}

impl<B: LayoutBackend> Iterator for Frames<'_, B> {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        self.backend.step().then(|| self.backend.frame())
    }
}
