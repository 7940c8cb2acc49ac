//! Geometry errors raised while cutting a mesh

use crate::float_types::Real;
use nalgebra::{Point3, Vector3};

/// Fatal problems that abort a cut.
///
/// Recoverable per-triangle anomalies (near-zero-area triangles) are never
/// reported here; they are logged and counted in [`crate::cut::CutStats`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CutError {
    /// (InvalidPlane) The plane normal has zero length, or a component is NaN or infinite
    #[error("(InvalidPlane) The plane normal {normal} cannot be normalized (offset {offset})")]
    InvalidPlane { normal: Vector3<Real>, offset: Real },
    /// (InvalidTolerance) The tolerance is not a strictly positive finite number
    #[error("(InvalidTolerance) Tolerance must be positive and finite, got {0}")]
    InvalidTolerance(Real),
    /// (NonManifoldCut) A boundary point is not used by exactly two cut segments
    ///
    /// Raised for open or self-touching input, and also for a manifold mesh
    /// when the plane passes through a vertex where the section pinches to a
    /// point (two loops meeting there, degree 4).
    #[error(
        "(NonManifoldCut) The cut section is not manifold: point {point} has degree {degree}"
    )]
    NonManifoldCut { point: Point3<Real>, degree: usize },
    /// (CapTriangulation) A boundary loop could not be closed by a cap
    #[error("(CapTriangulation) Could not triangulate a {points}-point boundary loop: {reason}")]
    CapTriangulation { points: usize, reason: String },
    /// Indicates an inconsistency while building a parry triangle mesh
    #[error(transparent)]
    TriMesh(#[from] crate::float_types::parry3d::shape::TriMeshBuilderError),
}
