//! Struct and functions for working with the `Triangle`s a `Mesh` is made of.

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// A triangle in 3D space with a facet normal and optional metadata.
///
/// Positions are ordered counter-clockwise when viewed from the side the
/// `normal` points to.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle<S: Clone> {
    pub positions: [Point3<Real>; 3],
    pub normal: Vector3<Real>,
    pub metadata: Option<S>,
}

impl<S: Clone> Triangle<S> {
    /// Create a triangle whose normal is computed from the winding of `positions`.
    ///
    /// A degenerate triangle gets a zero normal.
    pub fn new(positions: [Point3<Real>; 3], metadata: Option<S>) -> Self {
        let normal = Self::winding_normal(&positions);
        Triangle {
            positions,
            normal,
            metadata,
        }
    }

    /// Create a triangle with an explicit facet normal, copied **verbatim**.
    pub const fn with_normal(
        positions: [Point3<Real>; 3],
        normal: Vector3<Real>,
        metadata: Option<S>,
    ) -> Self {
        Triangle {
            positions,
            normal,
            metadata,
        }
    }

    /// Unit normal implied by the vertex order, or zero when the triangle has no area.
    pub fn winding_normal(positions: &[Point3<Real>; 3]) -> Vector3<Real> {
        let n = (positions[1] - positions[0]).cross(&(positions[2] - positions[0]));
        n.try_normalize(Real::EPSILON).unwrap_or_else(Vector3::zeros)
    }

    /// Twice the area, as the length of the edge cross product.
    fn double_area(&self) -> Real {
        let [a, b, c] = self.positions;
        (b - a).cross(&(c - a)).norm()
    }

    pub fn area(&self) -> Real {
        0.5 * self.double_area()
    }

    pub fn centroid(&self) -> Point3<Real> {
        let [a, b, c] = self.positions;
        Point3::from((a.coords + b.coords + c.coords) / 3.0)
    }

    /// Length of the longest edge.
    pub fn longest_edge(&self) -> Real {
        let [a, b, c] = self.positions;
        (b - a).norm().max((c - b).norm()).max((a - c).norm())
    }

    /// Height of the triangle over its longest edge.
    ///
    /// This is the thickness that matters for classification: a triangle whose
    /// height is below the cutting tolerance cannot be split reliably.
    pub fn height(&self) -> Real {
        let longest = self.longest_edge();
        if longest <= Real::EPSILON {
            0.0
        } else {
            self.double_area() / longest
        }
    }

    /// Signed volume of the tetrahedron spanned by the origin and this triangle.
    pub fn signed_volume(&self) -> Real {
        let [a, b, c] = self.positions;
        a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
    }

    /// Reverse the winding and the normal in place.
    pub fn flip(&mut self) {
        self.positions.swap(1, 2);
        self.normal = -self.normal;
    }

    /// Return a copy with reversed winding and normal.
    pub fn flipped(&self) -> Self {
        let mut triangle = self.clone();
        triangle.flip();
        triangle
    }
}
