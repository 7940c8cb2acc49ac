//! Splitting of straddling triangles.

use crate::cut::classify::{PointClass, Side, classify_point};
use crate::float_types::Real;
use crate::mesh::Triangle;
use nalgebra::Point3;
use std::cmp::Ordering;

/// A directed edge lying on the cutting plane.
///
/// Segments are oriented the way the cap of side **A** walks its boundary;
/// side B walks them [`reversed`](Segment::reversed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3<Real>,
    pub end: Point3<Real>,
}

impl Segment {
    pub const fn new(start: Point3<Real>, end: Point3<Real>) -> Self {
        Segment { start, end }
    }

    pub const fn reversed(&self) -> Self {
        Segment {
            start: self.end,
            end: self.start,
        }
    }

    pub fn length(&self) -> Real {
        (self.end - self.start).norm()
    }
}

/// The pieces of one straddling triangle.
#[derive(Debug, Clone)]
pub struct SplitTriangle<S: Clone> {
    /// One or two triangles above the plane.
    pub a: Vec<Triangle<S>>,
    /// One or two triangles below the plane.
    pub b: Vec<Triangle<S>>,
    /// The chord across the triangle, in side A cap order.
    pub segment: Segment,
}

#[derive(Debug, Clone, Copy)]
struct PieceVertex {
    pos: Point3<Real>,
    on_plane: bool,
}

fn lexicographic(p: &Point3<Real>, q: &Point3<Real>) -> Ordering {
    p.x.total_cmp(&q.x)
        .then(p.y.total_cmp(&q.y))
        .then(p.z.total_cmp(&q.z))
}

/// Point where the plane crosses the edge `p..q`, by linear interpolation of
/// the signed distances.
///
/// The computation always starts from the lexicographically smaller endpoint,
/// so two triangles sharing the edge get bit-identical points.
pub fn edge_intersection(
    p: &Point3<Real>,
    dp: Real,
    q: &Point3<Real>,
    dq: Real,
) -> Point3<Real> {
    let ((p0, d0), (p1, d1)) = if lexicographic(p, q) == Ordering::Greater {
        ((q, dq), (p, dp))
    } else {
        ((p, dp), (q, dq))
    };
    let t = d0 / (d0 - d1);
    p0 + (p1 - p0) * t
}

/// Index of the first vertex of the edge whose both ends are on the plane.
fn on_plane_edge(polygon: &[PieceVertex]) -> Option<usize> {
    let n = polygon.len();
    (0..n).find(|&k| polygon[k].on_plane && polygon[(k + 1) % n].on_plane)
}

/// Fan-triangulate a convex piece starting at the end of its on-plane edge.
fn fan<S: Clone>(polygon: &[PieceVertex], parent: &Triangle<S>, edge: usize) -> Vec<Triangle<S>> {
    let n = polygon.len();
    let apex = (edge + 1) % n;
    (1..n - 1)
        .map(|k| {
            let positions = [
                polygon[apex].pos,
                polygon[(apex + k) % n].pos,
                polygon[(apex + k + 1) % n].pos,
            ];
            Triangle::with_normal(positions, parent.normal, parent.metadata.clone())
        })
        .collect()
}

/// Split a triangle with vertices strictly on both sides of the plane.
///
/// `distances` are the signed distances of the triangle's vertices. Each side
/// receives the part of the triangle it contains, wound like the parent and
/// carrying the parent's normal and metadata. Returns `None` if the triangle
/// does not actually straddle the plane at `tolerance`.
pub fn split_triangle<S: Clone>(
    triangle: &Triangle<S>,
    distances: &[Real; 3],
    tolerance: Real,
) -> Option<SplitTriangle<S>> {
    let classes = distances.map(|d| classify_point(d, tolerance));
    let mut above: Vec<PieceVertex> = Vec::with_capacity(4);
    let mut below: Vec<PieceVertex> = Vec::with_capacity(4);

    for i in 0..3 {
        let j = (i + 1) % 3;
        let vertex = PieceVertex {
            pos: triangle.positions[i],
            on_plane: classes[i] == PointClass::OnPlane,
        };

        if classes[i] != PointClass::Strict(Side::B) {
            above.push(vertex);
        }
        if classes[i] != PointClass::Strict(Side::A) {
            below.push(vertex);
        }

        if let (Some(si), Some(sj)) = (classes[i].side(), classes[j].side()) {
            if si != sj {
                let crossing = PieceVertex {
                    pos: edge_intersection(
                        &triangle.positions[i],
                        distances[i],
                        &triangle.positions[j],
                        distances[j],
                    ),
                    on_plane: true,
                };
                above.push(crossing);
                below.push(crossing);
            }
        }
    }

    if above.len() < 3 || below.len() < 3 {
        return None;
    }

    let edge_above = on_plane_edge(&above)?;
    let edge_below = on_plane_edge(&below)?;

    // A's piece walks the chord p -> q, so A's cap walks it q -> p
    let segment = Segment::new(
        above[(edge_above + 1) % above.len()].pos,
        above[edge_above].pos,
    );

    Some(SplitTriangle {
        a: fan(&above, triangle, edge_above),
        b: fan(&below, triangle, edge_below),
        segment,
    })
}
