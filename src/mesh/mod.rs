//! `Mesh` struct: a triangulated solid, the input and output of a cut

use crate::errors::CutError;
use crate::float_types::{
    Real,
    parry3d::{bounding_volume::Aabb, shape::TriMesh},
};
use nalgebra::{Point3, Vector3, partial_max, partial_min};
use std::{fmt::Debug, sync::OnceLock};

pub mod manifold;
pub mod plane;
pub mod shapes;
pub mod triangle;

pub use plane::Plane;
pub use triangle::Triangle;

#[derive(Clone, Debug)]
pub struct Mesh<S: Clone + Send + Sync + Debug> {
    /// Triangles of the surface, wound counter-clockwise seen from outside
    pub triangles: Vec<Triangle<S>>,

    /// Lazily calculated AABB that spans `triangles`.
    pub bounding_box: OnceLock<Aabb>,

    /// Metadata
    pub metadata: Option<S>,
}

impl<S: Clone + Send + Sync + Debug> Default for Mesh<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Returns a new empty Mesh
    pub const fn new() -> Self {
        Mesh {
            triangles: Vec::new(),
            bounding_box: OnceLock::new(),
            metadata: None,
        }
    }

    /// Build a Mesh from an existing triangle list
    pub fn from_triangles(triangles: Vec<Triangle<S>>, metadata: Option<S>) -> Self {
        Mesh {
            triangles,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Build a Mesh from a shared vertex table and index triples.
    ///
    /// Facet normals are computed from the winding of each face. Returns
    /// `None` if a face refers to a vertex that does not exist.
    pub fn from_indexed(
        points: &[Point3<Real>],
        faces: &[[usize; 3]],
        metadata: Option<S>,
    ) -> Option<Self> {
        let mut triangles = Vec::with_capacity(faces.len());
        for face in faces {
            let positions = [
                *points.get(face[0])?,
                *points.get(face[1])?,
                *points.get(face[2])?,
            ];
            triangles.push(Triangle::new(positions, metadata.clone()));
        }
        Some(Mesh::from_triangles(triangles, metadata))
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Append a triangle and drop the cached bounding box.
    pub fn push(&mut self, triangle: Triangle<S>) {
        self.triangles.push(triangle);
        self.invalidate_bounding_box();
    }

    /// Unique vertex positions (exact comparison), in order of first use.
    pub fn vertices(&self) -> Vec<Point3<Real>> {
        let mut seen = hashbrown::HashSet::new();
        let mut out = Vec::new();
        for p in self.triangles.iter().flat_map(|t| t.positions.iter()) {
            if seen.insert([p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]) {
                out.push(*p);
            }
        }
        out
    }

    /// Returns a [`parry3d::bounding_volume::Aabb`] indicating the 3D bounds of all `triangles`.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut min_x = Real::MAX;
            let mut min_y = Real::MAX;
            let mut min_z = Real::MAX;
            let mut max_x = -Real::MAX;
            let mut max_y = -Real::MAX;
            let mut max_z = -Real::MAX;

            for p in self.triangles.iter().flat_map(|t| t.positions.iter()) {
                min_x = *partial_min(&min_x, &p.x).unwrap_or(&min_x);
                min_y = *partial_min(&min_y, &p.y).unwrap_or(&min_y);
                min_z = *partial_min(&min_z, &p.z).unwrap_or(&min_z);

                max_x = *partial_max(&max_x, &p.x).unwrap_or(&max_x);
                max_y = *partial_max(&max_y, &p.y).unwrap_or(&max_y);
                max_z = *partial_max(&max_z, &p.z).unwrap_or(&max_z);
            }

            // If still uninitialized (e.g., no triangles), return a trivial AABB at origin
            if min_x > max_x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }

            Aabb::new(
                Point3::new(min_x, min_y, min_z),
                Point3::new(max_x, max_y, max_z),
            )
        })
    }

    /// Invalidates object's cached bounding box.
    pub fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Length of the bounding box diagonal, the model scale used by relative tolerances.
    pub fn diagonal(&self) -> Real {
        let bb = self.bounding_box();
        (bb.maxs - bb.mins).norm()
    }

    pub fn surface_area(&self) -> Real {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Enclosed volume by the divergence theorem.
    ///
    /// Only meaningful for closed, consistently wound meshes; negative when the
    /// mesh is inside out.
    pub fn volume(&self) -> Real {
        self.triangles.iter().map(Triangle::signed_volume).sum()
    }

    /// Invert this Mesh (flip inside vs. outside)
    pub fn inverse(&self) -> Mesh<S> {
        let mut mesh = self.clone();
        for tri in &mut mesh.triangles {
            tri.flip();
        }
        mesh
    }

    /// Translate every vertex by `offset`.
    pub fn translate(&self, offset: Vector3<Real>) -> Mesh<S> {
        let triangles = self
            .triangles
            .iter()
            .map(|t| {
                Triangle::with_normal(
                    t.positions.map(|p| p + offset),
                    t.normal,
                    t.metadata.clone(),
                )
            })
            .collect();
        Mesh::from_triangles(triangles, self.metadata.clone())
    }

    /// Convert this Mesh to a Parry `TriMesh`.\
    /// Useful for collision detection or mass properties of a cut piece.
    ///
    /// ## Errors
    /// If Parry returns a `TriMeshBuilderError`
    pub fn to_trimesh(&self) -> Result<TriMesh, CutError> {
        let vertices: Vec<Point3<Real>> = self
            .triangles
            .iter()
            .flat_map(|t| t.positions)
            .collect();
        let indices = (0..self.triangles.len())
            .map(|i| {
                let offset = i as u32 * 3;
                [offset, offset + 1, offset + 2]
            })
            .collect();
        Ok(TriMesh::new(vertices, indices)?)
    }
}
