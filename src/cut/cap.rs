//! Triangulation of the planar caps closing each side of a cut.
//!
//! Loops are projected into a 2D frame of the cutting plane, holes are
//! bridged into the loop that contains them, and the resulting simple polygon
//! is ear clipped. Ear clipping is based on
//! <https://github.com/ivanfratric/polypartition>; unlike most triangulators it
//! keeps collinear vertices, which is what lets the cap share its edges with the
//! split triangles.

use crate::cut::classify::Side;
use crate::cut::loops::BoundaryLoop;
use crate::errors::CutError;
use crate::float_types::Real;
use crate::mesh::{Plane, Triangle};
use geo::{Area, Contains, Coord, LineString, Polygon};
use nalgebra::{Point2, Point3, Vector3};

/// Twice the signed area of `a, b, c`; positive for a left turn.
fn orient(a: &Point2<Real>, b: &Point2<Real>, c: &Point2<Real>) -> Real {
    (b - a).perp(&(c - a))
}

fn segment_distance(p: &Point2<Real>, a: &Point2<Real>, b: &Point2<Real>) -> Real {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// The information stored for each vertex while clipping.
#[derive(Clone, Default)]
struct VertexInfo {
    /// Whether the vertex has not been clipped yet.
    is_active: bool,
    is_ear: bool,
    /// Cosine of the corner angle. Pointier ears are clipped first.
    pointiness: Real,
    prev: usize,
    next: usize,
}

/// Returns the pointiness of vertex `idx` if it is the tip of an ear.
///
/// An ear tip stands more than `tolerance` away from the line joining its
/// neighbours, on the inner side, and no other active vertex lies inside the
/// ear or within `tolerance` of its edges. Vertices sitting on an ear corner
/// (both ends of a hole bridge) never block it.
fn ear_pointiness(
    idx: usize,
    infos: &[VertexInfo],
    points: &[Point2<Real>],
    tolerance: Real,
) -> Option<Real> {
    let info = &infos[idx];
    let (a, p, c) = (points[info.prev], points[idx], points[info.next]);

    let base = (c - a).norm();
    if base <= tolerance || orient(&a, &p, &c) <= tolerance * base {
        return None;
    }

    let corners = [a, p, c];
    let edges = [(a, p), (p, c), (c, a)];
    let blocked = infos
        .iter()
        .enumerate()
        .filter(|&(j, other)| other.is_active && j != idx && j != info.prev && j != info.next)
        .any(|(j, _)| {
            let q = points[j];
            if corners.iter().any(|corner| (q - corner).norm() <= tolerance) {
                return false;
            }
            edges
                .iter()
                .all(|(s, e)| orient(s, e, &q) >= -tolerance * (e - s).norm())
        });
    if blocked {
        return None;
    }

    let pointiness = (a - p).normalize().dot(&(c - p).normalize());
    if pointiness.is_nan() { None } else { Some(pointiness) }
}

fn refresh(idx: usize, infos: &mut [VertexInfo], points: &[Point2<Real>], tolerance: Real) {
    let pointiness = ear_pointiness(idx, infos, points, tolerance);
    infos[idx].is_ear = pointiness.is_some();
    infos[idx].pointiness = pointiness.unwrap_or(Real::NEG_INFINITY);
}

fn pointiest_ear(infos: &[VertexInfo]) -> Option<usize> {
    infos
        .iter()
        .enumerate()
        .filter(|(_, info)| info.is_active && info.is_ear)
        .max_by(|(_, a), (_, b)| a.pointiness.total_cmp(&b.pointiness))
        .map(|(i, _)| i)
}

/// Triangulate a counter-clockwise simple polygon by ear clipping.
///
/// Returns `points.len() - 2` index triples, counter-clockwise, or `None` if
/// the polygon is clockwise, degenerate or self-intersecting.
pub fn ear_clip(points: &[Point2<Real>], tolerance: Real) -> Option<Vec<[usize; 3]>> {
    let n = points.len();
    if n < 3 {
        return None;
    }

    let mut infos: Vec<VertexInfo> = (0..n)
        .map(|i| VertexInfo {
            is_active: true,
            prev: (i + n - 1) % n,
            next: (i + 1) % n,
            ..Default::default()
        })
        .collect();
    for i in 0..n {
        refresh(i, &mut infos, points, tolerance);
    }

    let mut triangles = Vec::with_capacity(n - 2);
    let mut remaining = n;
    while remaining > 3 {
        let ear = match pointiest_ear(&infos) {
            Some(ear) => ear,
            None => {
                // clipping only ever unblocks vertices; pick up stale ones
                for i in 0..n {
                    if infos[i].is_active {
                        refresh(i, &mut infos, points, tolerance);
                    }
                }
                pointiest_ear(&infos)?
            },
        };

        infos[ear].is_active = false;
        let VertexInfo { prev, next, .. } = infos[ear];
        triangles.push([prev, ear, next]);
        infos[prev].next = next;
        infos[next].prev = prev;
        remaining -= 1;

        refresh(prev, &mut infos, points, tolerance);
        refresh(next, &mut infos, points, tolerance);
    }

    let last = infos.iter().position(|info| info.is_active)?;
    let triangle = [infos[last].prev, last, infos[last].next];
    if orient(&points[triangle[0]], &points[triangle[1]], &points[triangle[2]]) <= 0.0 {
        return None;
    }
    triangles.push(triangle);
    Some(triangles)
}

/// Whether `m` is inside the polygon corner `prev -> v -> next` (counter-clockwise).
fn in_corner(prev: &Point2<Real>, v: &Point2<Real>, next: &Point2<Real>, m: &Point2<Real>) -> bool {
    let left_of_out = orient(v, next, m) > 0.0;
    let left_of_in = orient(prev, v, m) > 0.0;
    if orient(prev, v, next) >= 0.0 {
        left_of_out && left_of_in
    } else {
        left_of_out || left_of_in
    }
}

/// Position in `hole` of its vertex with the largest `x`.
fn rightmost(hole: &[usize], points: &[Point2<Real>]) -> usize {
    (0..hole.len())
        .max_by(|&a, &b| points[hole[a]].x.total_cmp(&points[hole[b]].x))
        .unwrap_or(0)
}

/// A loop projected into the cap frame.
struct ProjectedLoop {
    /// Indices into the side's point tables.
    indices: Vec<usize>,
    polygon: Polygon<Real>,
    area: Real,
}

/// Closes the loops of one side with triangles lying in the cutting plane.
#[derive(Debug, Clone, Copy)]
pub struct CapTriangulator {
    plane: Plane,
    tolerance: Real,
}

impl CapTriangulator {
    pub const fn new(plane: Plane, tolerance: Real) -> Self {
        CapTriangulator { plane, tolerance }
    }

    /// Outward normal of the cap of `side`: `-N` for A, `+N` for B.
    pub fn cap_normal(&self, side: Side) -> Vector3<Real> {
        match side {
            Side::A => -self.plane.normal(),
            Side::B => self.plane.normal(),
        }
    }

    /// Triangulate the caps bounded by `loops`, all belonging to `side`.
    ///
    /// Triangles are wound counter-clockwise around the cap's outward normal
    /// and reuse the loop points as they are.
    ///
    /// ## Errors
    /// [`CutError::CapTriangulation`] when a loop encloses no area, a hole lies
    /// outside every outer loop, a hole cannot be bridged, or a polygon cannot
    /// be clipped.
    pub fn triangulate<S: Clone>(
        &self,
        side: Side,
        loops: &[BoundaryLoop],
        metadata: Option<S>,
    ) -> Result<Vec<Triangle<S>>, CutError> {
        let up = self.cap_normal(side);
        let frame = self.plane.frame(up);

        let mut points3: Vec<Point3<Real>> = Vec::new();
        let mut points2: Vec<Point2<Real>> = Vec::new();
        let mut projected = Vec::with_capacity(loops.len());
        for boundary in loops {
            let start = points3.len();
            let flat: Vec<Point2<Real>> = boundary.points.iter().map(|p| frame.project(p)).collect();
            let exterior: Vec<Coord<Real>> = flat.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
            points3.extend_from_slice(&boundary.points);
            points2.extend(flat);

            let polygon = Polygon::new(LineString::new(exterior), vec![]);
            let area = polygon.signed_area();
            let perimeter: Real = boundary.segments().map(|s| s.length()).sum();
            if area.abs() <= self.tolerance * perimeter {
                return Err(CutError::CapTriangulation {
                    points: boundary.len(),
                    reason: "boundary loop has no area".to_string(),
                });
            }
            projected.push(ProjectedLoop {
                indices: (start..points3.len()).collect(),
                polygon,
                area,
            });
        }

        let (outers, holes): (Vec<usize>, Vec<usize>) =
            (0..projected.len()).partition(|&i| projected[i].area > 0.0);

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); projected.len()];
        for &h in &holes {
            let hole = &projected[h];
            let parent = outers
                .iter()
                .copied()
                .filter(|&o| {
                    hole.polygon
                        .exterior()
                        .points()
                        .any(|p| projected[o].polygon.contains(&p))
                })
                .min_by(|&x, &y| projected[x].area.total_cmp(&projected[y].area));
            match parent {
                Some(o) => children[o].push(h),
                None => {
                    return Err(CutError::CapTriangulation {
                        points: hole.indices.len(),
                        reason: "hole is not inside any outer loop".to_string(),
                    });
                },
            }
        }

        let mut triangles = Vec::new();
        for &o in &outers {
            let holes: Vec<Vec<usize>> = children[o]
                .iter()
                .map(|&h| projected[h].indices.clone())
                .collect();
            let ring = self.bridge_holes(projected[o].indices.clone(), holes, &points2)?;

            let ring_points: Vec<Point2<Real>> = ring.iter().map(|&i| points2[i]).collect();
            let clipped = ear_clip(&ring_points, self.tolerance).ok_or_else(|| {
                CutError::CapTriangulation {
                    points: ring.len(),
                    reason: "no ear left to clip".to_string(),
                }
            })?;
            triangles.extend(clipped.into_iter().map(|[i, j, k]| {
                Triangle::with_normal(
                    [points3[ring[i]], points3[ring[j]], points3[ring[k]]],
                    up,
                    metadata.clone(),
                )
            }));
        }

        log::debug!(
            "side {:?}: {} outer loops, {} holes, {} cap triangles",
            side,
            outers.len(),
            holes.len(),
            triangles.len()
        );
        Ok(triangles)
    }

    /// Merge every hole into `ring` through a pair of coincident bridge edges.
    ///
    /// Holes are taken right to left; each is joined from its rightmost vertex
    /// to the nearest ring vertex it can see.
    fn bridge_holes(
        &self,
        mut ring: Vec<usize>,
        mut holes: Vec<Vec<usize>>,
        points: &[Point2<Real>],
    ) -> Result<Vec<usize>, CutError> {
        holes.sort_by(|a, b| {
            let xa = points[a[rightmost(a, points)]].x;
            let xb = points[b[rightmost(b, points)]].x;
            xb.total_cmp(&xa)
        });

        for h in 0..holes.len() {
            let hole = &holes[h];
            let m_pos = rightmost(hole, points);
            let m = points[hole[m_pos]];

            let mut candidates: Vec<usize> = (0..ring.len()).collect();
            candidates.sort_by(|&a, &b| {
                (points[ring[a]] - m)
                    .norm_squared()
                    .total_cmp(&(points[ring[b]] - m).norm_squared())
            });

            let n = ring.len();
            let bridge = candidates.into_iter().find(|&c| {
                let v = points[ring[c]];
                (v - m).norm() > self.tolerance
                    && in_corner(&points[ring[(c + n - 1) % n]], &v, &points[ring[(c + 1) % n]], &m)
                    && self.is_visible(&m, &v, &ring, &holes[h..], points)
            });
            let Some(c) = bridge else {
                return Err(CutError::CapTriangulation {
                    points: hole.len(),
                    reason: "no visible vertex to bridge a hole".to_string(),
                });
            };

            let mut merged = Vec::with_capacity(ring.len() + hole.len() + 2);
            merged.extend_from_slice(&ring[..=c]);
            merged.extend(hole[m_pos..].iter().chain(&hole[..=m_pos]));
            merged.extend_from_slice(&ring[c..]);
            ring = merged;
        }
        Ok(ring)
    }

    /// Whether the segment `m..v` crosses no edge of the ring or of the given
    /// holes, and passes through none of their vertices.
    fn is_visible(
        &self,
        m: &Point2<Real>,
        v: &Point2<Real>,
        ring: &[usize],
        holes: &[Vec<usize>],
        points: &[Point2<Real>],
    ) -> bool {
        let near = |p: &Point2<Real>| (p - m).norm() <= self.tolerance || (p - v).norm() <= self.tolerance;
        std::iter::once(ring)
            .chain(holes.iter().map(Vec::as_slice))
            .all(|polygon| {
                let n = polygon.len();
                (0..n).all(|i| {
                    let a = points[polygon[i]];
                    let b = points[polygon[(i + 1) % n]];
                    if !near(&a) && segment_distance(&a, m, v) <= self.tolerance {
                        return false;
                    }
                    if near(&a) || near(&b) {
                        return true;
                    }
                    let crosses = orient(m, v, &a) * orient(m, v, &b) < 0.0
                        && orient(&a, &b, m) * orient(&a, &b, v) < 0.0;
                    !crosses
                })
            })
    }
}
