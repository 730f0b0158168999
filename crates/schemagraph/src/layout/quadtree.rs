//! Weighted quadtree for the Barnes–Hut approximation.
//!
//! Every quad carries the sum of the strengths below it and the
//! strength-weighted centroid of those points, so a distant cluster of nodes
//! can be treated as a single body.

use schemagraph_core::geometry::Point;

// Points closer than f32 can split are kept together in one leaf.
const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy)]
struct Extent {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
}

impl Extent {
    /// Square extent covering every point.
    fn covering(points: &[Point]) -> Self {
        let mut x0 = f32::INFINITY;
        let mut y0 = f32::INFINITY;
        let mut x1 = f32::NEG_INFINITY;
        let mut y1 = f32::NEG_INFINITY;
        for p in points {
            x0 = x0.min(p.x());
            y0 = y0.min(p.y());
            x1 = x1.max(p.x());
            y1 = y1.max(p.y());
        }

        let size = (x1 - x0).max(y1 - y0).max(1.0);
        Self {
            x0,
            y0,
            x1: x0 + size,
            y1: y0 + size,
        }
    }

    fn width(self) -> f32 {
        self.x1 - self.x0
    }

    /// Child index (0..4) containing `p` and that child's extent.
    fn quadrant(self, p: Point) -> (usize, Extent) {
        let xm = (self.x0 + self.x1) / 2.0;
        let ym = (self.y0 + self.y1) / 2.0;
        let right = p.x() >= xm;
        let bottom = p.y() >= ym;

        let (x0, x1) = if right { (xm, self.x1) } else { (self.x0, xm) };
        let (y0, y1) = if bottom { (ym, self.y1) } else { (self.y0, ym) };

        (
            (usize::from(bottom) << 1) | usize::from(right),
            Extent { x0, y0, x1, y1 },
        )
    }
}

#[derive(Debug)]
enum QuadKind {
    Leaf { position: Point, points: Vec<usize> },
    Internal([Option<Box<Quad>>; 4]),
}

/// A node of the [`QuadTree`].
#[derive(Debug)]
pub(crate) struct Quad {
    value: f32,
    centroid: Point,
    kind: QuadKind,
}

impl Quad {
    fn leaf(index: usize, position: Point) -> Self {
        Self {
            value: 0.0,
            centroid: position,
            kind: QuadKind::Leaf {
                position,
                points: vec![index],
            },
        }
    }

    /// Sum of the strengths of every point below this quad.
    pub(crate) fn value(&self) -> f32 {
        self.value
    }

    /// Strength-weighted center of the points below this quad.
    pub(crate) fn centroid(&self) -> Point {
        self.centroid
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.kind, QuadKind::Leaf { .. })
    }

    /// Indices of the coincident points stored in a leaf; empty for internal quads.
    pub(crate) fn points(&self) -> &[usize] {
        match &self.kind {
            QuadKind::Leaf { points, .. } => points,
            QuadKind::Internal(_) => &[],
        }
    }
}

/// Quadtree over a set of points, each carrying a strength.
#[derive(Debug)]
pub(crate) struct QuadTree {
    root: Option<Box<Quad>>,
    extent: Extent,
}

impl QuadTree {
    /// Builds the tree and accumulates strengths.
    ///
    /// `strengths[i]` is the strength of `points[i]`; both slices must have
    /// the same length.
    pub(crate) fn new(points: &[Point], strengths: &[f32]) -> Self {
        debug_assert_eq!(points.len(), strengths.len());

        let extent = Extent::covering(points);
        let mut root = None;
        for (index, &p) in points.iter().enumerate() {
            insert(&mut root, index, p, extent, 0);
        }
        if let Some(root) = root.as_deref_mut() {
            accumulate(root, strengths);
        }

        Self { root, extent }
    }

    pub(crate) fn root(&self) -> Option<&Quad> {
        self.root.as_deref()
    }

    /// Visits quads depth-first, passing each quad with its width.
    ///
    /// Children are skipped when `callback` returns `true`.
    pub(crate) fn visit(&self, mut callback: impl FnMut(&Quad, f32) -> bool) {
        let Some(root) = self.root() else {
            return;
        };

        let mut stack = vec![(root, self.extent.width())];
        while let Some((quad, width)) = stack.pop() {
            if callback(quad, width) {
                continue;
            }
            if let QuadKind::Internal(children) = &quad.kind {
                for child in children.iter().rev().flatten() {
                    stack.push((child.as_ref(), width / 2.0));
                }
            }
        }
    }
}

fn insert(slot: &mut Option<Box<Quad>>, index: usize, p: Point, extent: Extent, depth: usize) {
    let Some(quad) = slot else {
        *slot = Some(Box::new(Quad::leaf(index, p)));
        return;
    };

    if let QuadKind::Leaf { position, points } = &mut quad.kind {
        if *position == p || depth >= MAX_DEPTH {
            points.push(index);
            return;
        }

        let existing = *position;
        let existing_points = std::mem::take(points);
        quad.kind = QuadKind::Internal(Default::default());
        for existing_index in existing_points {
            insert_child(quad, existing_index, existing, extent, depth);
        }
    }

    insert_child(quad, index, p, extent, depth);
}

fn insert_child(quad: &mut Quad, index: usize, p: Point, extent: Extent, depth: usize) {
    if let QuadKind::Internal(children) = &mut quad.kind {
        let (i, child_extent) = extent.quadrant(p);
        insert(&mut children[i], index, p, child_extent, depth + 1);
    }
}

fn accumulate(quad: &mut Quad, strengths: &[f32]) {
    match &mut quad.kind {
        QuadKind::Leaf { position, points } => {
            quad.value = points.iter().map(|&i| strengths[i]).sum();
            quad.centroid = *position;
        }
        QuadKind::Internal(children) => {
            let mut strength = 0.0;
            let mut weight = 0.0;
            let mut x = 0.0;
            let mut y = 0.0;
            for child in children.iter_mut().flatten() {
                accumulate(child, strengths);
                let c = child.value.abs();
                if c != 0.0 {
                    strength += child.value;
                    weight += c;
                    x += c * child.centroid.x();
                    y += c * child.centroid.y();
                }
            }
            quad.value = strength;
            if weight != 0.0 {
                quad.centroid = Point::new(x / weight, y / weight);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_empty_tree() {
        let tree = QuadTree::new(&[], &[]);
        assert!(tree.root().is_none());

        let mut visited = 0;
        tree.visit(|_, _| {
            visited += 1;
            false
        });
        assert_eq!(visited, 0);
    }

    #[test]
    fn test_root_value_is_sum_of_strengths() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(0.0, 100.0),
            Point::new(50.0, 50.0),
        ];
        let strengths = [-30.0, -30.0, -30.0, -10.0];
        let tree = QuadTree::new(&points, &strengths);

        let root = tree.root().unwrap();
        assert!(!root.is_leaf());
        assert_approx_eq!(f32, root.value(), -100.0);
    }

    #[test]
    fn test_centroid_is_strength_weighted() {
        let points = [Point::new(0.0, 0.0), Point::new(30.0, 0.0)];
        let strengths = [-10.0, -20.0];
        let tree = QuadTree::new(&points, &strengths);

        let centroid = tree.root().unwrap().centroid();
        assert_approx_eq!(f32, centroid.x(), 20.0, epsilon = 1e-4);
        assert_approx_eq!(f32, centroid.y(), 0.0);
    }

    #[test]
    fn test_coincident_points_share_a_leaf() {
        let points = [Point::new(5.0, 5.0), Point::new(5.0, 5.0)];
        let tree = QuadTree::new(&points, &[-1.0, -1.0]);

        let root = tree.root().unwrap();
        assert!(root.is_leaf());
        assert_eq!(root.points(), [0, 1]);
        assert_approx_eq!(f32, root.value(), -2.0);
    }

    #[test]
    fn test_visit_reaches_every_point() {
        let points: Vec<Point> = (0..20)
            .map(|i| Point::new((i * 7 % 13) as f32, (i * 11 % 17) as f32))
            .collect();
        let strengths = vec![-1.0; points.len()];
        let tree = QuadTree::new(&points, &strengths);

        let mut seen = Vec::new();
        tree.visit(|quad, _| {
            seen.extend_from_slice(quad.points());
            false
        });
        seen.sort_unstable();
        assert_eq!(seen, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_visit_halves_width_per_level() {
        let points = [Point::new(0.0, 0.0), Point::new(64.0, 64.0)];
        let tree = QuadTree::new(&points, &[-1.0, -1.0]);

        let mut widths = Vec::new();
        tree.visit(|quad, width| {
            if quad.is_leaf() {
                widths.push(width);
            }
            false
        });
        assert_eq!(widths, [32.0, 32.0]);
    }
}
