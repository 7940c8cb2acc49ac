//! Closed primitive solids, mostly useful as cut fixtures

use crate::float_types::{Real, TAU};
use crate::mesh::Mesh;
use nalgebra::Point3;
use std::fmt::Debug;

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    /// Axis-aligned box with one corner at the origin, 12 triangles.
    ///
    /// ```text
    ///     7-------6
    ///    /|      /|
    ///   4-------5 |
    ///   | |     | |
    ///   | 3-----|-2
    ///   |/      |/
    ///   0-------1
    /// ```
    ///
    /// Each quad face is split along the diagonal from its first vertex.
    pub fn cuboid(width: Real, length: Real, height: Real, metadata: Option<S>) -> Mesh<S> {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(width, 0.0, 0.0),
            Point3::new(width, length, 0.0),
            Point3::new(0.0, length, 0.0),
            Point3::new(0.0, 0.0, height),
            Point3::new(width, 0.0, height),
            Point3::new(width, length, height),
            Point3::new(0.0, length, height),
        ];

        // CCW seen from outside
        let quads = [
            [0, 3, 2, 1], // bottom (-Z)
            [4, 5, 6, 7], // top (+Z)
            [0, 1, 5, 4], // front (-Y)
            [3, 7, 6, 2], // back (+Y)
            [0, 4, 7, 3], // left (-X)
            [1, 2, 6, 5], // right (+X)
        ];
        let faces: Vec<[usize; 3]> = quads
            .iter()
            .flat_map(|q| [[q[0], q[1], q[2]], [q[0], q[2], q[3]]])
            .collect();

        Self::from_indexed(&points, &faces, metadata).unwrap_or_default()
    }

    pub fn cube(width: Real, metadata: Option<S>) -> Mesh<S> {
        Self::cuboid(width, width, width, metadata)
    }

    /// Torus centered at the origin in the *XY* plane, revolved around +Z.
    ///
    /// * `major_r` – distance from center to tube center (R)
    /// * `minor_r` – tube radius (r)
    /// * `segments_major` – number of segments around the donut
    /// * `segments_minor` – segments of the tube cross-section
    ///
    /// Vertices sit at half-step angles, so none lies on the XZ, YZ or XY plane.
    pub fn torus(
        major_r: Real,
        minor_r: Real,
        segments_major: usize,
        segments_minor: usize,
        metadata: Option<S>,
    ) -> Mesh<S> {
        let n = segments_major.max(3);
        let m = segments_minor.max(3);

        let mut points = Vec::with_capacity(n * m);
        for i in 0..n {
            let theta = TAU * (i as Real + 0.5) / n as Real;
            for j in 0..m {
                let phi = TAU * (j as Real + 0.5) / m as Real;
                let ring = major_r + minor_r * phi.cos();
                points.push(Point3::new(
                    ring * theta.cos(),
                    ring * theta.sin(),
                    minor_r * phi.sin(),
                ));
            }
        }

        let index = |i: usize, j: usize| (i % n) * m + (j % m);
        let mut faces = Vec::with_capacity(2 * n * m);
        for i in 0..n {
            for j in 0..m {
                let a = index(i, j);
                let b = index(i + 1, j);
                let c = index(i + 1, j + 1);
                let d = index(i, j + 1);
                faces.push([a, b, c]);
                faces.push([a, c, d]);
            }
        }

        Self::from_indexed(&points, &faces, metadata).unwrap_or_default()
    }
}
