mod support;

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use stlcut::{
    CutError, Plane,
    cut::{CutConfig, CutOutcome, Side, Tolerance, cut},
    float_types::Real,
    mesh::{Mesh, Triangle},
};
use support::*;

fn default_cut(mesh: &Mesh<()>, normal: Vector3<Real>, offset: Real) -> stlcut::CutResult<()> {
    cut(mesh, normal, offset, &CutConfig::default()).unwrap()
}

// --------------------------------------------------------
//   Unit cube
// --------------------------------------------------------

#[test]
fn unit_cube_cut_in_half() {
    let cube: Mesh<()> = Mesh::cube(1.0, None);
    let result = default_cut(&cube, Vector3::y(), -0.5);

    assert_eq!(result.outcome, CutOutcome::Split);
    assert_eq!(result.stats.straddling, 8);
    assert_eq!(result.stats.degenerate_triangles, 0);

    // 14 surface triangles plus a 6 triangle cap over the 8-point section
    for side in [Side::A, Side::B] {
        let mesh = result.side(side);
        assert_eq!(mesh.len(), 20, "side {side:?}");
        assert_eq!(caps(&result, side).len(), 6);
        assert_relative_eq!(mesh.volume(), 0.5, epsilon = 1e-9);
        assert_closed(mesh, "cube half");
    }

    let a = bounding_box(&result.a);
    let b = bounding_box(&result.b);
    assert!(approx_eq(a[1], 0.5, 1e-12) && approx_eq(a[4], 1.0, 1e-12));
    assert!(approx_eq(b[1], 0.0, 1e-12) && approx_eq(b[4], 0.5, 1e-12));
}

#[test]
fn cube_section_is_one_loop_per_side() {
    let cube: Mesh<()> = Mesh::cube(1.0, None);
    let result = default_cut(&cube, Vector3::y(), -0.5);

    let stats = &result.stats;
    assert_eq!(stats.segments_a, stats.straddling);
    assert_eq!(stats.segments_b, stats.straddling);
    assert_eq!(stats.cancelled_a + stats.cancelled_b, 0);
    assert_eq!(stats.loops_a, 1);
    assert_eq!(stats.loops_b, 1);
    assert_eq!(stats.loop_points_a, 8);
    assert_eq!(stats.loop_points_b, 8);

    let a: Vec<_> = result.loops(Side::A).collect();
    let b: Vec<_> = result.loops(Side::B).collect();
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
    // both caps walk the same section in opposite directions
    let forward: Vec<_> = a[0].segments().map(|s| (s.start, s.end)).collect();
    for s in b[0].segments() {
        assert!(forward.contains(&(s.end, s.start)));
    }
    for p in &a[0].points {
        assert_relative_eq!(p.y, 0.5, epsilon = 1e-12);
    }
}

#[test]
fn cap_faces_away_from_its_half() {
    let cube: Mesh<()> = Mesh::cube(1.0, None);
    let result = default_cut(&cube, Vector3::y(), -0.5);

    for t in caps(&result, Side::A) {
        assert_eq!(t.normal, -Vector3::y());
        assert!(Triangle::<()>::winding_normal(&t.positions).dot(&-Vector3::y()) > 0.0);
    }
    for t in caps(&result, Side::B) {
        assert_eq!(t.normal, Vector3::y());
        assert!(Triangle::<()>::winding_normal(&t.positions).dot(&Vector3::y()) > 0.0);
    }
    assert_relative_eq!(area(caps(&result, Side::A)), 1.0, epsilon = 1e-12);
    assert_relative_eq!(area(caps(&result, Side::B)), 1.0, epsilon = 1e-12);
}

#[test]
fn oblique_cut_of_a_cube() {
    let cube: Mesh<()> = Mesh::cube(1.0, None);
    let plane = Plane::new(Vector3::new(0.3, 1.0, 0.2), -0.55).unwrap();
    let result = cube.cut(&plane, &CutConfig::default()).unwrap();

    assert_eq!(result.outcome, CutOutcome::Split);
    assert_closed(&result.a, "A");
    assert_closed(&result.b, "B");
    assert!(result.a.volume() > 0.0 && result.b.volume() > 0.0);
    assert_relative_eq!(result.a.volume() + result.b.volume(), 1.0, epsilon = 1e-9);
    assert!(worst_overshoot(&result.a, &plane, Side::A) < 1e-9);
    assert!(worst_overshoot(&result.b, &plane, Side::B) < 1e-9);
}

#[test]
fn diagonal_cut_through_edges_and_vertices() {
    // contains the cube's vertical edges 0-4 and 2-6 and two face diagonals
    let cube: Mesh<()> = Mesh::cube(1.0, None);
    let result = default_cut(&cube, Vector3::new(1.0, -1.0, 0.0), 0.0);

    assert_eq!(result.outcome, CutOutcome::Split);
    assert_eq!(result.stats.straddling, 0);
    assert_eq!(result.stats.loops_a, 1);
    assert_eq!(result.stats.loops_b, 1);
    assert_eq!(result.stats.loop_points_a, 4);
    assert_eq!(result.stats.cap_triangles_a, 2);
    assert_eq!(result.stats.cap_triangles_b, 2);
    for mesh in [&result.a, &result.b] {
        assert_eq!(mesh.len(), 8);
        assert_relative_eq!(mesh.volume(), 0.5, epsilon = 1e-12);
        assert_closed(mesh, "prism");
    }
    let section = 2.0 as Real;
    assert_relative_eq!(area(caps(&result, Side::A)), section.sqrt(), epsilon = 1e-12);
}

#[test]
fn loop_points_match_live_segments() {
    let cube: Mesh<()> = Mesh::cube(1.0, None);
    for (normal, offset) in [
        (Vector3::new(1.0, -1.0, 0.0), 0.0),
        (Vector3::new(0.3, 1.0, 0.2), -0.55),
        (Vector3::new(1.0, 1.0, 1.0), -1.5),
    ] {
        let stats = default_cut(&cube, normal, offset).stats;
        assert_eq!(stats.loop_points_a, stats.segments_a - stats.cancelled_a);
        assert_eq!(stats.loop_points_b, stats.segments_b - stats.cancelled_b);
    }
}

// --------------------------------------------------------
//   Planes missing the mesh
// --------------------------------------------------------

#[test]
fn plane_below_mesh_keeps_everything_on_a() {
    let cube: Mesh<()> = Mesh::cube(1.0, None);
    let result = default_cut(&cube, Vector3::y(), 5.0);

    assert_eq!(result.outcome, CutOutcome::EmptyIntersection(Side::A));
    assert_eq!(result.a.triangles, cube.triangles);
    assert!(result.b.is_empty());
    assert!(result.loops.is_empty());
}

#[test]
fn plane_above_mesh_keeps_everything_on_b() {
    let cube: Mesh<()> = Mesh::cube(1.0, None);
    let result = default_cut(&cube, Vector3::y(), -5.0);

    assert_eq!(result.outcome, CutOutcome::EmptyIntersection(Side::B));
    assert!(result.a.is_empty());
    assert_eq!(result.b.triangles, cube.triangles);
}

#[test]
fn face_lying_on_the_plane_is_not_a_cut() {
    let cube: Mesh<()> = Mesh::cube(1.0, None);

    // top face on the plane, its normal along +N: bounds the solid below
    let top = default_cut(&cube, Vector3::y(), -1.0);
    assert_eq!(top.outcome, CutOutcome::EmptyIntersection(Side::B));
    assert_eq!(top.b.len(), 12);

    // bottom face on the plane, its normal along -N
    let bottom = default_cut(&cube, Vector3::y(), 0.0);
    assert_eq!(bottom.outcome, CutOutcome::EmptyIntersection(Side::A));
    assert_eq!(bottom.a.len(), 12);
}

#[test]
fn recutting_a_half_is_idempotent() {
    let cube: Mesh<()> = Mesh::cube(1.0, None);
    let plane = Plane::new(Vector3::y(), -0.5).unwrap();
    let first = cube.cut(&plane, &CutConfig::default()).unwrap();

    let again_a = first.a.cut(&plane, &CutConfig::default()).unwrap();
    assert_eq!(again_a.outcome, CutOutcome::EmptyIntersection(Side::A));
    assert_eq!(again_a.a.triangles, first.a.triangles);

    let again_b = first.b.cut(&plane, &CutConfig::default()).unwrap();
    assert_eq!(again_b.outcome, CutOutcome::EmptyIntersection(Side::B));
    assert_eq!(again_b.b.triangles, first.b.triangles);
}

// --------------------------------------------------------
//   Torus
// --------------------------------------------------------

#[test]
fn torus_cut_through_its_hole() {
    let torus: Mesh<()> = Mesh::torus(3.0, 1.0, 32, 16, None);
    let result = default_cut(&torus, Vector3::x(), 0.0);

    assert_eq!(result.outcome, CutOutcome::Split);
    assert_eq!(result.stats.loops_a, 2);
    assert_eq!(result.stats.loops_b, 2);
    assert_eq!(result.loops(Side::A).count(), 2);
    assert_closed(&result.a, "A");
    assert_closed(&result.b, "B");
    assert_relative_eq!(result.a.volume(), torus.volume() / 2.0, max_relative = 1e-9);
    assert_relative_eq!(result.b.volume(), torus.volume() / 2.0, max_relative = 1e-9);
}

#[test]
fn torus_equator_cut_caps_an_annulus() {
    let torus: Mesh<()> = Mesh::torus(3.0, 1.0, 32, 16, None);
    let plane = Plane::new(Vector3::z(), 0.0).unwrap();
    let result = torus.cut(&plane, &CutConfig::default()).unwrap();

    assert_eq!(result.outcome, CutOutcome::Split);
    // outer rim and inner rim on each side
    assert_eq!(result.stats.loops_a, 2);
    assert_eq!(result.stats.loops_b, 2);
    assert_closed(&result.a, "upper half");
    assert_closed(&result.b, "lower half");
    assert_relative_eq!(
        result.a.volume() + result.b.volume(),
        torus.volume(),
        max_relative = 1e-9
    );

    // nothing covers the hole in the middle
    for t in caps(&result, Side::A) {
        let c = t.centroid();
        assert!((c.x * c.x + c.y * c.y).sqrt() > 1.5);
    }
    assert_relative_eq!(
        area(caps(&result, Side::A)),
        area(caps(&result, Side::B)),
        max_relative = 1e-9
    );
}

#[test]
fn surface_area_is_conserved() {
    let torus: Mesh<()> = Mesh::torus(3.0, 1.0, 24, 12, None);
    let plane = Plane::new(Vector3::new(1.0, 2.0, 3.0), -0.3).unwrap();
    let result = torus.cut(&plane, &CutConfig::default()).unwrap();

    let pieces = area(surface(&result, Side::A)) + area(surface(&result, Side::B));
    assert_relative_eq!(pieces, torus.surface_area(), max_relative = 1e-9);
    assert_closed(&result.a, "A");
    assert_closed(&result.b, "B");
}

#[test]
fn every_vertex_stays_on_its_side() {
    let torus: Mesh<()> = Mesh::torus(3.0, 1.0, 24, 12, None);
    let plane = Plane::new(Vector3::new(1.0, 2.0, 3.0), -0.3).unwrap();
    let result = torus.cut(&plane, &CutConfig::default()).unwrap();

    let eps = 1e-9;
    assert!(worst_overshoot(&result.a, &plane, Side::A) < eps);
    assert!(worst_overshoot(&result.b, &plane, Side::B) < eps);
    for side in [Side::A, Side::B] {
        for t in caps(&result, side) {
            for p in &t.positions {
                assert!(plane.signed_distance(p).abs() < eps);
            }
        }
    }
}

// --------------------------------------------------------
//   Errors and recoverable anomalies
// --------------------------------------------------------

#[test]
fn zero_normal_is_an_invalid_plane() {
    let cube: Mesh<()> = Mesh::cube(1.0, None);
    let err = cut(&cube, Vector3::zeros(), 1.0, &CutConfig::default()).unwrap_err();
    assert!(matches!(err, CutError::InvalidPlane { .. }));
    let err = cut(&cube, Vector3::y(), Real::NAN, &CutConfig::default()).unwrap_err();
    assert!(matches!(err, CutError::InvalidPlane { .. }));
}

#[test]
fn bad_tolerance_is_rejected() {
    let cube: Mesh<()> = Mesh::cube(1.0, None);
    let config = CutConfig::with_tolerance(Tolerance::Absolute(-1.0));
    let err = cut(&cube, Vector3::y(), -0.5, &config).unwrap_err();
    assert_eq!(err, CutError::InvalidTolerance(-1.0));
}

#[test]
fn open_mesh_is_not_manifold_along_the_cut() {
    let mut open: Mesh<()> = Mesh::cube(1.0, None);
    open.triangles.retain(|t| t.normal != Vector3::x());
    let err = cut(&open, Vector3::y(), -0.5, &CutConfig::default()).unwrap_err();
    assert!(matches!(err, CutError::NonManifoldCut { degree: 1, .. }));
}

#[test]
fn cubes_touching_along_an_edge_are_not_manifold() {
    let mut pair: Mesh<()> = Mesh::cube(1.0, None);
    let other = pair.translate(Vector3::new(1.0, 0.0, 1.0));
    pair.triangles.extend(other.triangles);
    let err = cut(&pair, Vector3::y(), -0.5, &CutConfig::default()).unwrap_err();
    match err {
        CutError::NonManifoldCut { point, degree } => {
            assert_eq!(degree, 4);
            assert_relative_eq!(point, Point3::new(1.0, 0.5, 1.0), epsilon = 1e-12);
        },
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn section_pinched_at_a_vertex_is_not_manifold() {
    // every edge is shared by two faces, the cubes only meet at (1, 1, 1)
    let mut pair: Mesh<()> = Mesh::cube(1.0, None);
    let other = pair.translate(Vector3::new(1.0, 1.0, 1.0));
    pair.triangles.extend(other.triangles);
    assert!(pair.is_manifold());

    // x = y runs through both diagonals, the two sections touch at the shared corner
    let err = cut(&pair, Vector3::new(1.0, -1.0, 0.0), 0.0, &CutConfig::default()).unwrap_err();
    match err {
        CutError::NonManifoldCut { point, degree } => {
            assert_eq!(degree, 4);
            assert_relative_eq!(point, Point3::new(1.0, 1.0, 1.0), epsilon = 1e-12);
        },
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn degenerate_triangle_is_kept_and_counted() {
    let mut cube: Mesh<()> = Mesh::cube(1.0, None);
    // a zero-area sliver crossing the plane next to the cube
    cube.push(Triangle::new(
        [
            Point3::new(2.0, 0.0, 2.0),
            Point3::new(2.0, 1.0, 2.0),
            Point3::new(2.0, 0.25, 2.0),
        ],
        None,
    ));
    let result = default_cut(&cube, Vector3::y(), -0.5);

    assert_eq!(result.outcome, CutOutcome::Split);
    assert_eq!(result.stats.degenerate_triangles, 1);
    // centroid at y = 5/12, below the plane
    assert_eq!(result.a.len(), 20);
    assert_eq!(result.b.len(), 21);
}

// --------------------------------------------------------
//   Metadata, determinism, interop
// --------------------------------------------------------

#[test]
fn metadata_reaches_every_output_triangle() {
    let cube: Mesh<&'static str> = Mesh::cube(1.0, Some("part"));
    let result = cut(&cube, Vector3::y(), -0.5, &CutConfig::default()).unwrap();
    for t in result.a.triangles.iter().chain(&result.b.triangles) {
        assert_eq!(t.metadata, Some("part"));
    }
    assert_eq!(result.a.metadata, Some("part"));
}

#[test]
fn cutting_twice_gives_identical_output() {
    let torus: Mesh<()> = Mesh::torus(3.0, 1.0, 24, 12, None);
    let normal = Vector3::new(0.2, 1.0, -0.4);
    let first = default_cut(&torus, normal, 0.1);
    let second = default_cut(&torus, normal, 0.1);
    assert_eq!(first.a.triangles, second.a.triangles);
    assert_eq!(first.b.triangles, second.b.triangles);
    assert_eq!(first.loops, second.loops);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn absolute_tolerance_is_used_as_is() {
    let cube: Mesh<()> = Mesh::cube(10.0, None);
    let config = CutConfig::with_tolerance(Tolerance::Absolute(1e-3));
    let result = cut(&cube, Vector3::x(), -5.0, &config).unwrap();
    assert_relative_eq!(result.a.volume(), 500.0, epsilon = 1e-9);
    assert_relative_eq!(result.b.volume(), 500.0, epsilon = 1e-9);
}

#[test]
fn halves_convert_to_parry_trimeshes() {
    let cube: Mesh<()> = Mesh::cube(1.0, None);
    let result = default_cut(&cube, Vector3::z(), -0.25);
    assert_eq!(result.a.to_trimesh().unwrap().indices().len(), result.a.len());
    assert_eq!(result.b.to_trimesh().unwrap().indices().len(), result.b.len());
}
