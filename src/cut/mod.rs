//! Cutting a closed mesh with a plane into two closed meshes.
//!
//! A cut runs through the phases of [`CutPhase`]: every triangle is
//! classified against the plane, straddling triangles are split, the chords
//! left on the plane are walked into boundary loops for each side, and the
//! loops are closed with planar caps.
//!
//! ```
//! # use stlcut::{Mesh, cut::{CutConfig, CutOutcome}};
//! # use nalgebra::Vector3;
//! let cube: Mesh<()> = Mesh::cube(1.0, None);
//! let result = stlcut::cut(&cube, Vector3::y(), -0.5, &CutConfig::default()).unwrap();
//! assert_eq!(result.outcome, CutOutcome::Split);
//! assert!(result.a.is_manifold() && result.b.is_manifold());
//! ```

pub mod cap;
pub mod classify;
pub mod loops;
pub mod split;

pub use cap::CapTriangulator;
pub use classify::{PointClass, Side, TriangleClass, classify_point, classify_triangle};
pub use loops::{BoundaryLoop, LoopBuilder};
pub use split::{Segment, SplitTriangle, split_triangle};

use crate::errors::CutError;
use crate::float_types::{MIN_TOLERANCE, Real, relative_tolerance};
use crate::mesh::{Mesh, Plane, Triangle};
use nalgebra::Vector3;
use std::fmt::Debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Distance under which a point counts as lying on the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tolerance {
    /// A fixed distance in model units.
    Absolute(Real),
    /// A factor of the input's bounding box diagonal.
    Relative(Real),
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::Relative(relative_tolerance())
    }
}

impl Tolerance {
    /// The absolute tolerance to use for `mesh`.
    ///
    /// Relative tolerances never go below [`MIN_TOLERANCE`].
    ///
    /// ## Errors
    /// [`CutError::InvalidTolerance`] if the value is not strictly positive and finite.
    pub fn resolve<S: Clone + Send + Sync + Debug>(&self, mesh: &Mesh<S>) -> Result<Real, CutError> {
        let value = match *self {
            Tolerance::Absolute(value) | Tolerance::Relative(value) => value,
        };
        if !value.is_finite() || value <= 0.0 {
            return Err(CutError::InvalidTolerance(value));
        }
        Ok(match *self {
            Tolerance::Absolute(value) => value,
            Tolerance::Relative(factor) => (factor * mesh.diagonal()).max(MIN_TOLERANCE),
        })
    }
}

/// Parameters of a cut.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CutConfig {
    pub tolerance: Tolerance,
}

impl CutConfig {
    pub const fn with_tolerance(tolerance: Tolerance) -> Self {
        CutConfig { tolerance }
    }
}

/// Where a [`CutEngine`] is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutPhase {
    Init,
    Classifying,
    Splitting,
    LoopBuilding,
    Capping,
    Assembled,
    Failed,
}

/// How the plane met the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutOutcome {
    /// Both sides received part of the mesh and were capped.
    Split,
    /// The plane does not cross the mesh; the whole input is on the given side.
    EmptyIntersection(Side),
}

/// Counters collected during a cut.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CutStats {
    /// Input triangles.
    pub triangles: usize,
    pub straddling: usize,
    /// Triangles too thin to split, assigned whole to one side.
    pub degenerate_triangles: usize,
    /// Segments recorded for each side's cap.
    pub segments_a: usize,
    pub segments_b: usize,
    /// Segments removed because a reverse twin was recorded on the same side.
    pub cancelled_a: usize,
    pub cancelled_b: usize,
    pub loops_a: usize,
    pub loops_b: usize,
    /// Total number of points (and so of edges) over each side's loops.
    pub loop_points_a: usize,
    pub loop_points_b: usize,
    pub cap_triangles_a: usize,
    pub cap_triangles_b: usize,
}

/// The two halves of a cut.
#[derive(Debug, Clone)]
pub struct CutResult<S: Clone + Send + Sync + Debug> {
    /// Everything on the positive side of the plane, capped.
    pub a: Mesh<S>,
    /// Everything on the negative side of the plane, capped.
    pub b: Mesh<S>,
    pub outcome: CutOutcome,
    /// Boundary loops of both sides, A first.
    pub loops: Vec<BoundaryLoop>,
    pub stats: CutStats,
}

impl<S: Clone + Send + Sync + Debug> CutResult<S> {
    pub fn side(&self, side: Side) -> &Mesh<S> {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    pub fn loops(&self, side: Side) -> impl Iterator<Item = &BoundaryLoop> {
        self.loops.iter().filter(move |l| l.side == side)
    }
}

#[derive(Debug, Clone, Copy)]
struct Classified {
    distances: [Real; 3],
    class: TriangleClass,
    degenerate: bool,
}

/// What a single input triangle contributes to the output.
#[derive(Debug, Clone)]
enum Fragment<S: Clone> {
    Whole {
        side: Side,
        triangle: Triangle<S>,
        /// On-plane edges, in the cap order of `side`.
        segments: Vec<Segment>,
        degenerate: bool,
    },
    Split(SplitTriangle<S>),
}

/// Runs one cut of `mesh` by `plane`.
pub struct CutEngine<'a, S: Clone + Send + Sync + Debug> {
    mesh: &'a Mesh<S>,
    plane: Plane,
    tolerance: Real,
    phase: CutPhase,
}

impl<'a, S: Clone + Send + Sync + Debug> CutEngine<'a, S> {
    /// ## Errors
    /// [`CutError::InvalidTolerance`] if the configured tolerance is unusable.
    pub fn new(mesh: &'a Mesh<S>, plane: Plane, config: &CutConfig) -> Result<Self, CutError> {
        let tolerance = config.tolerance.resolve(mesh)?;
        Ok(CutEngine {
            mesh,
            plane,
            tolerance,
            phase: CutPhase::Init,
        })
    }

    pub const fn phase(&self) -> CutPhase {
        self.phase
    }

    /// The absolute tolerance in use.
    pub const fn tolerance(&self) -> Real {
        self.tolerance
    }

    pub const fn plane(&self) -> &Plane {
        &self.plane
    }

    fn enter(&mut self, phase: CutPhase) {
        log::debug!("cut: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Perform the cut. The engine ends in [`CutPhase::Assembled`] or [`CutPhase::Failed`].
    ///
    /// ## Errors
    /// [`CutError::NonManifoldCut`] if the mesh is open or self-touching along
    /// the plane, [`CutError::CapTriangulation`] if a cap cannot be built.
    pub fn run(&mut self) -> Result<CutResult<S>, CutError> {
        match self.execute() {
            Ok(result) => {
                self.enter(CutPhase::Assembled);
                Ok(result)
            },
            Err(err) => {
                log::debug!("cut failed: {err}");
                self.enter(CutPhase::Failed);
                Err(err)
            },
        }
    }

    fn classify(&self, triangle: &Triangle<S>) -> Classified {
        let distances = triangle.positions.map(|p| self.plane.signed_distance(&p));
        if triangle.height() <= self.tolerance {
            let side = Side::of_distance(self.plane.signed_distance(&triangle.centroid()));
            log::warn!(
                "degenerate triangle {:?} assigned whole to side {:?}",
                triangle.positions,
                side
            );
            let class = match side {
                Side::A => TriangleClass::EntirelyA,
                Side::B => TriangleClass::EntirelyB,
            };
            return Classified {
                distances,
                class,
                degenerate: true,
            };
        }
        Classified {
            distances,
            class: classify_triangle(&self.plane, triangle, &distances, self.tolerance),
            degenerate: false,
        }
    }

    fn fragment(&self, triangle: &Triangle<S>, classified: &Classified) -> Fragment<S> {
        let whole = |side: Side, segments: Vec<Segment>, degenerate: bool| Fragment::Whole {
            side,
            triangle: triangle.clone(),
            segments,
            degenerate,
        };

        match classified.class {
            TriangleClass::EntirelyA | TriangleClass::EntirelyB => whole(
                classified.class.side().unwrap_or(Side::A),
                Vec::new(),
                classified.degenerate,
            ),
            TriangleClass::DegenerateOnPlane(side) => {
                let on_plane = classified
                    .distances
                    .map(|d| classify_point(d, self.tolerance) == PointClass::OnPlane);
                let segments = (0..3)
                    .filter(|&i| on_plane[i] && on_plane[(i + 1) % 3])
                    .map(|i| Segment::new(triangle.positions[(i + 1) % 3], triangle.positions[i]))
                    .collect();
                whole(side, segments, false)
            },
            TriangleClass::Straddling => {
                match split_triangle(triangle, &classified.distances, self.tolerance) {
                    Some(parts) => Fragment::Split(parts),
                    None => {
                        let side = Side::of_distance(self.plane.signed_distance(&triangle.centroid()));
                        log::warn!("could not split triangle {:?}, kept on side {:?}", triangle.positions, side);
                        whole(side, Vec::new(), true)
                    },
                }
            },
        }
    }

    fn execute(&mut self) -> Result<CutResult<S>, CutError> {
        let mesh = self.mesh;
        let triangles = &mesh.triangles;
        let mut stats = CutStats {
            triangles: triangles.len(),
            ..Default::default()
        };
        log::debug!(
            "cutting {} triangles by {:?} with tolerance {}",
            triangles.len(),
            self.plane,
            self.tolerance
        );

        self.enter(CutPhase::Classifying);
        #[cfg(not(feature = "parallel"))]
        let classified: Vec<Classified> = triangles.iter().map(|t| self.classify(t)).collect();
        #[cfg(feature = "parallel")]
        let classified: Vec<Classified> = triangles.par_iter().map(|t| self.classify(t)).collect();

        self.enter(CutPhase::Splitting);
        #[cfg(not(feature = "parallel"))]
        let fragments: Vec<Fragment<S>> = triangles
            .iter()
            .zip(&classified)
            .map(|(t, c)| self.fragment(t, c))
            .collect();
        #[cfg(feature = "parallel")]
        let fragments: Vec<Fragment<S>> = triangles
            .par_iter()
            .zip(classified.par_iter())
            .map(|(t, c)| self.fragment(t, c))
            .collect();

        let mut side_a = Vec::with_capacity(triangles.len());
        let mut side_b = Vec::with_capacity(triangles.len());
        let mut builder_a = LoopBuilder::new(Side::A, self.tolerance);
        let mut builder_b = LoopBuilder::new(Side::B, self.tolerance);
        for fragment in fragments {
            match fragment {
                Fragment::Whole {
                    side,
                    triangle,
                    segments,
                    degenerate,
                } => {
                    if degenerate {
                        stats.degenerate_triangles += 1;
                    }
                    let (out, builder) = match side {
                        Side::A => (&mut side_a, &mut builder_a),
                        Side::B => (&mut side_b, &mut builder_b),
                    };
                    out.push(triangle);
                    for segment in segments {
                        builder.add(segment);
                    }
                },
                Fragment::Split(parts) => {
                    stats.straddling += 1;
                    side_a.extend(parts.a);
                    side_b.extend(parts.b);
                    builder_a.add(parts.segment);
                    builder_b.add(parts.segment.reversed());
                },
            }
        }

        stats.segments_a = builder_a.recorded();
        stats.segments_b = builder_b.recorded();
        stats.cancelled_a = builder_a.cancelled();
        stats.cancelled_b = builder_b.cancelled();

        if side_a.is_empty() || side_b.is_empty() {
            let side = if side_b.is_empty() { Side::A } else { Side::B };
            log::warn!(
                "plane does not cross the mesh, everything is on side {side:?}, side {:?} is empty",
                side.opposite()
            );
            let whole = mesh.clone();
            let empty = Mesh::from_triangles(Vec::new(), mesh.metadata.clone());
            let (a, b) = match side.opposite() {
                Side::B => (whole, empty),
                Side::A => (empty, whole),
            };
            return Ok(CutResult {
                a,
                b,
                outcome: CutOutcome::EmptyIntersection(side),
                loops: Vec::new(),
                stats,
            });
        }

        self.enter(CutPhase::LoopBuilding);
        let loops_a = builder_a.build()?;
        let loops_b = builder_b.build()?;
        stats.loops_a = loops_a.len();
        stats.loops_b = loops_b.len();
        stats.loop_points_a = loops_a.iter().map(BoundaryLoop::len).sum();
        stats.loop_points_b = loops_b.iter().map(BoundaryLoop::len).sum();

        self.enter(CutPhase::Capping);
        let caps = CapTriangulator::new(self.plane, self.tolerance);
        let cap_a = caps.triangulate(Side::A, &loops_a, self.mesh.metadata.clone())?;
        let cap_b = caps.triangulate(Side::B, &loops_b, self.mesh.metadata.clone())?;
        stats.cap_triangles_a = cap_a.len();
        stats.cap_triangles_b = cap_b.len();
        side_a.extend(cap_a);
        side_b.extend(cap_b);

        log::debug!("{stats:?}");
        Ok(CutResult {
            a: Mesh::from_triangles(side_a, self.mesh.metadata.clone()),
            b: Mesh::from_triangles(side_b, self.mesh.metadata.clone()),
            outcome: CutOutcome::Split,
            loops: loops_a.into_iter().chain(loops_b).collect(),
            stats,
        })
    }
}

/// Cut `mesh` by the plane `normal·P + offset = 0`.
///
/// Side A receives what lies where `normal·P + offset > 0`. The normal does not
/// need to be unit length.
///
/// ## Errors
/// [`CutError::InvalidPlane`] for a zero or non-finite plane, plus the errors of
/// [`CutEngine::run`].
pub fn cut<S: Clone + Send + Sync + Debug>(
    mesh: &Mesh<S>,
    normal: Vector3<Real>,
    offset: Real,
    config: &CutConfig,
) -> Result<CutResult<S>, CutError> {
    let plane = Plane::new(normal, offset)?;
    mesh.cut(&plane, config)
}

impl<S: Clone + Send + Sync + Debug> Mesh<S> {
    /// Split this mesh into the parts on either side of `plane`, each closed by a cap.
    pub fn cut(&self, plane: &Plane, config: &CutConfig) -> Result<CutResult<S>, CutError> {
        CutEngine::new(self, *plane, config)?.run()
    }
}
