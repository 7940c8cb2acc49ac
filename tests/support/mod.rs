//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use stlcut::{
    Plane,
    cut::{CutResult, Side},
    float_types::Real,
    mesh::{Mesh, Triangle},
};

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// for a mesh.
pub fn bounding_box(mesh: &Mesh<()>) -> [Real; 6] {
    let bb = mesh.bounding_box();
    [
        bb.mins.x, bb.mins.y, bb.mins.z, bb.maxs.x, bb.maxs.y, bb.maxs.z,
    ]
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Every edge shared by exactly two triangles, in opposite directions.
pub fn assert_closed<S: Clone + Send + Sync + std::fmt::Debug>(mesh: &Mesh<S>, what: &str) {
    assert!(
        mesh.is_manifold(),
        "{what}: {} open edges",
        mesh.open_edge_count()
    );
    assert!(
        mesh.is_consistently_oriented(),
        "{what}: inconsistent orientation"
    );
}

/// Triangles of one side that came from the input surface (caps are appended last).
pub fn surface<'a>(result: &'a CutResult<()>, side: Side) -> &'a [Triangle<()>] {
    let mesh = result.side(side);
    let caps = match side {
        Side::A => result.stats.cap_triangles_a,
        Side::B => result.stats.cap_triangles_b,
    };
    &mesh.triangles[..mesh.len() - caps]
}

/// Cap triangles of one side.
pub fn caps<'a>(result: &'a CutResult<()>, side: Side) -> &'a [Triangle<()>] {
    let mesh = result.side(side);
    &mesh.triangles[surface(result, side).len()..]
}

pub fn area(triangles: &[Triangle<()>]) -> Real {
    triangles.iter().map(Triangle::area).sum()
}

/// Largest signed distance of a vertex of `mesh` on the wrong side of `plane`.
pub fn worst_overshoot(mesh: &Mesh<()>, plane: &Plane, side: Side) -> Real {
    mesh.triangles
        .iter()
        .flat_map(|t| t.positions.iter())
        .map(|p| {
            let d = plane.signed_distance(p);
            match side {
                Side::A => -d,
                Side::B => d,
            }
        })
        .fold(0.0, Real::max)
}
