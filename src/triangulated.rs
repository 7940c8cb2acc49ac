//! A trait for any shape which can be represented by triangles
use crate::float_types::Real;
use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

/// A triangulated 3D surface.
///
/// Anything that can present itself as a bunch of triangles in 3D
/// can automatically use all the triangle-based IO backends.
pub trait Triangulated3D {
    /// Call `f` for each triangle.
    ///
    /// The triangle is `[p0, p1, p2]` followed by its facet normal.
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut([Point3<Real>; 3], Vector3<Real>);

    /// Number of triangles `visit_triangles` reports.
    fn triangle_count(&self) -> usize {
        let mut count = 0;
        self.visit_triangles(|_, _| count += 1);
        count
    }
}

impl<S: Clone + Send + Sync + Debug> Triangulated3D for Mesh<S> {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Point3<Real>; 3], Vector3<Real>),
    {
        for tri in &self.triangles {
            f(tri.positions, tri.normal);
        }
    }

    fn triangle_count(&self) -> usize {
        self.triangles.len()
    }
}
