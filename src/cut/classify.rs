//! Point and triangle classification against the cutting plane.

use crate::float_types::Real;
use crate::mesh::{Plane, Triangle};

/// One of the two half-spaces of a cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// `N·P + D > 0`
    A,
    /// `N·P + D < 0`
    B,
}

impl Side {
    pub const fn opposite(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Side of a signed distance, `A` for zero.
    pub fn of_distance(distance: Real) -> Side {
        if distance >= 0.0 { Side::A } else { Side::B }
    }
}

/// Position of a single point relative to the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClass {
    Strict(Side),
    OnPlane,
}

impl PointClass {
    pub const fn side(self) -> Option<Side> {
        match self {
            PointClass::Strict(side) => Some(side),
            PointClass::OnPlane => None,
        }
    }
}

/// Aggregate classification of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleClass {
    /// No vertex below the plane, at most one on it.
    EntirelyA,
    /// No vertex above the plane, at most one on it.
    EntirelyB,
    /// At least one vertex strictly on each side.
    Straddling,
    /// Two or three vertices on the plane; the whole triangle belongs to `Side`.
    DegenerateOnPlane(Side),
}

impl TriangleClass {
    /// The side a non-straddling triangle is assigned to whole.
    pub const fn side(self) -> Option<Side> {
        match self {
            TriangleClass::EntirelyA => Some(Side::A),
            TriangleClass::EntirelyB => Some(Side::B),
            TriangleClass::DegenerateOnPlane(side) => Some(side),
            TriangleClass::Straddling => None,
        }
    }
}

/// Classify a signed distance with tolerance `tolerance`.
pub fn classify_point(distance: Real, tolerance: Real) -> PointClass {
    if distance > tolerance {
        PointClass::Strict(Side::A)
    } else if distance < -tolerance {
        PointClass::Strict(Side::B)
    } else {
        PointClass::OnPlane
    }
}

/// Classify a triangle from the signed distances of its vertices.
///
/// A triangle lying in the plane goes to the side its facet normal points
/// away from: a normal along `+N` means the solid is below, so it bounds B.
pub fn classify_triangle<S: Clone>(
    plane: &Plane,
    triangle: &Triangle<S>,
    distances: &[Real; 3],
    tolerance: Real,
) -> TriangleClass {
    let classes = distances.map(|d| classify_point(d, tolerance));
    let above = classes
        .iter()
        .filter(|c| **c == PointClass::Strict(Side::A))
        .count();
    let below = classes
        .iter()
        .filter(|c| **c == PointClass::Strict(Side::B))
        .count();
    let on_plane = 3 - above - below;

    match (above, below, on_plane) {
        (a, b, _) if a > 0 && b > 0 => TriangleClass::Straddling,
        (_, _, 3) => {
            if triangle.normal.dot(&plane.normal()) > 0.0 {
                TriangleClass::DegenerateOnPlane(Side::B)
            } else {
                TriangleClass::DegenerateOnPlane(Side::A)
            }
        },
        (1, 0, 2) => TriangleClass::DegenerateOnPlane(Side::A),
        (0, 1, 2) => TriangleClass::DegenerateOnPlane(Side::B),
        (_, 0, _) => TriangleClass::EntirelyA,
        _ => TriangleClass::EntirelyB,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Vector3};

    const EPS: Real = 1e-9;

    fn classify(points: [[Real; 3]; 3]) -> TriangleClass {
        let plane = Plane::new(Vector3::y(), 0.0).unwrap();
        let tri: Triangle<()> = Triangle::new(points.map(|p| Point3::new(p[0], p[1], p[2])), None);
        let distances = tri.positions.map(|p| plane.signed_distance(&p));
        classify_triangle(&plane, &tri, &distances, EPS)
    }

    #[test]
    fn sides() {
        assert_eq!(Side::A.opposite(), Side::B);
        assert_eq!(Side::B.opposite(), Side::A);
        assert_eq!(Side::of_distance(0.0), Side::A);
        assert_eq!(Side::of_distance(-1e-12), Side::B);
    }

    #[test]
    fn point_classes() {
        assert_eq!(classify_point(1.0, EPS), PointClass::Strict(Side::A));
        assert_eq!(classify_point(-1.0, EPS), PointClass::Strict(Side::B));
        assert_eq!(classify_point(EPS / 2.0, EPS), PointClass::OnPlane);
        assert_eq!(classify_point(-EPS, EPS), PointClass::OnPlane);
    }

    #[test]
    fn whole_triangles() {
        assert_eq!(
            classify([[0.0, 1.0, 0.0], [1.0, 2.0, 0.0], [0.0, 3.0, 1.0]]),
            TriangleClass::EntirelyA
        );
        assert_eq!(
            classify([[0.0, -1.0, 0.0], [1.0, -2.0, 0.0], [0.0, -3.0, 1.0]]),
            TriangleClass::EntirelyB
        );
    }

    #[test]
    fn single_vertex_on_plane_passes_through() {
        assert_eq!(
            classify([[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 1.0]]),
            TriangleClass::EntirelyA
        );
        assert_eq!(
            classify([[0.0, 0.0, 0.0], [1.0, -1.0, 0.0], [0.0, -1.0, 1.0]]),
            TriangleClass::EntirelyB
        );
    }

    #[test]
    fn straddling_needs_both_sides() {
        assert_eq!(
            classify([[0.0, -1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 1.0]]),
            TriangleClass::Straddling
        );
        // one vertex on the plane, one on each side
        assert_eq!(
            classify([[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, -1.0, 1.0]]),
            TriangleClass::Straddling
        );
    }

    #[test]
    fn edge_on_plane_follows_third_vertex() {
        assert_eq!(
            classify([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 1.0]]),
            TriangleClass::DegenerateOnPlane(Side::A)
        );
        assert_eq!(
            classify([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, -1.0, 1.0]]),
            TriangleClass::DegenerateOnPlane(Side::B)
        );
    }

    #[test]
    fn coplanar_triangle_follows_normal() {
        // CCW seen from +Y: normal is +Y, so it caps the solid below
        assert_eq!(
            classify([[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]),
            TriangleClass::DegenerateOnPlane(Side::B)
        );
        assert_eq!(
            classify([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]),
            TriangleClass::DegenerateOnPlane(Side::A)
        );
    }
}
