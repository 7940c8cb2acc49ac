//! Stitching cut segments into closed boundary loops.

use crate::cut::classify::Side;
use crate::cut::split::Segment;
use crate::errors::CutError;
use crate::float_types::Real;
use hashbrown::HashMap;
use nalgebra::Point3;

/// A closed polygon on the cutting plane bounding the cap of one side.
///
/// The first point is not repeated at the end. Points are ordered
/// counter-clockwise when seen from outside the cap of `side`, i.e. from
/// `-N` for side A and from `+N` for side B (holes run the other way).
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryLoop {
    pub side: Side,
    pub points: Vec<Point3<Real>>,
}

impl BoundaryLoop {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The closing edges of the loop, last point back to first included.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Segment::new(self.points[i], self.points[(i + 1) % n]))
    }
}

/// Merges points closer than a tolerance into a single id.
///
/// Points are bucketed in a grid of `tolerance`-sized cells; a lookup scans
/// the 27 cells around the query point.
#[derive(Debug, Clone)]
pub struct PointWelder {
    tolerance: Real,
    cells: HashMap<(i64, i64, i64), Vec<usize>>,
    points: Vec<Point3<Real>>,
}

impl PointWelder {
    pub fn new(tolerance: Real) -> Self {
        PointWelder {
            tolerance,
            cells: HashMap::new(),
            points: Vec::new(),
        }
    }

    fn cell(&self, p: &Point3<Real>) -> (i64, i64, i64) {
        (
            (p.x / self.tolerance).floor() as i64,
            (p.y / self.tolerance).floor() as i64,
            (p.z / self.tolerance).floor() as i64,
        )
    }

    /// Id of the first recorded point within tolerance of `p`, recording `p` if there is none.
    pub fn weld(&mut self, p: Point3<Real>) -> usize {
        let (cx, cy, cz) = self.cell(&p);
        let mut best: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let key = (cx.saturating_add(dx), cy.saturating_add(dy), cz.saturating_add(dz));
                    let Some(ids) = self.cells.get(&key) else {
                        continue;
                    };
                    for &id in ids {
                        if (self.points[id] - p).norm() <= self.tolerance
                            && best.is_none_or(|b| id < b)
                        {
                            best = Some(id);
                        }
                    }
                }
            }
        }
        if let Some(id) = best {
            return id;
        }

        let id = self.points.len();
        self.points.push(p);
        self.cells.entry((cx, cy, cz)).or_default().push(id);
        id
    }

    pub fn point(&self, id: usize) -> Point3<Real> {
        self.points[id]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Collects the directed segments bounding one side's cap and walks them into loops.
///
/// A segment and its exact reverse cancel: they come from two faces of the
/// same side that meet on the plane, so that edge needs no cap.
#[derive(Debug, Clone)]
pub struct LoopBuilder {
    side: Side,
    welder: PointWelder,
    edges: Vec<Option<(usize, usize)>>,
    pending: HashMap<(usize, usize), Vec<usize>>,
    recorded: usize,
    cancelled: usize,
}

impl LoopBuilder {
    pub fn new(side: Side, tolerance: Real) -> Self {
        LoopBuilder {
            side,
            welder: PointWelder::new(tolerance),
            edges: Vec::new(),
            pending: HashMap::new(),
            recorded: 0,
            cancelled: 0,
        }
    }

    /// Record one segment, already oriented for this side's cap.
    pub fn add(&mut self, segment: Segment) {
        self.recorded += 1;
        let from = self.welder.weld(segment.start);
        let to = self.welder.weld(segment.end);
        if from == to {
            return;
        }

        if let Some(twin) = self.pending.get_mut(&(to, from)).and_then(Vec::pop) {
            self.edges[twin] = None;
            self.cancelled += 2;
            return;
        }

        self.pending
            .entry((from, to))
            .or_default()
            .push(self.edges.len());
        self.edges.push(Some((from, to)));
    }

    /// Number of segments passed to [`LoopBuilder::add`].
    pub const fn recorded(&self) -> usize {
        self.recorded
    }

    /// Number of segments removed in pairs running in opposite directions.
    pub const fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Segments still waiting to be walked.
    pub fn live_segments(&self) -> usize {
        self.edges.iter().flatten().count()
    }

    /// Walk every live segment into closed loops.
    ///
    /// ## Errors
    /// [`CutError::NonManifoldCut`] if a welded point does not have exactly
    /// one incoming and one outgoing segment.
    pub fn build(self) -> Result<Vec<BoundaryLoop>, CutError> {
        let n = self.welder.len();
        let mut next: Vec<Option<usize>> = vec![None; n];
        let mut in_degree = vec![0usize; n];
        let mut out_degree = vec![0usize; n];

        for &(from, to) in self.edges.iter().flatten() {
            next[from] = Some(to);
            out_degree[from] += 1;
            in_degree[to] += 1;
        }

        for id in 0..n {
            let degree = in_degree[id] + out_degree[id];
            if degree != 0 && (in_degree[id] != 1 || out_degree[id] != 1) {
                return Err(CutError::NonManifoldCut {
                    point: self.welder.point(id),
                    degree,
                });
            }
        }

        let mut visited = vec![false; n];
        let mut loops = Vec::new();
        for start in 0..n {
            if visited[start] || next[start].is_none() {
                continue;
            }
            let mut points = Vec::new();
            let mut current = start;
            loop {
                visited[current] = true;
                points.push(self.welder.point(current));
                match next[current] {
                    Some(following) if following == start => break,
                    Some(following) if !visited[following] => current = following,
                    _ => {
                        return Err(CutError::NonManifoldCut {
                            point: self.welder.point(current),
                            degree: in_degree[current] + out_degree[current],
                        });
                    },
                }
            }
            loops.push(BoundaryLoop {
                side: self.side,
                points,
            });
        }

        log::debug!(
            "side {:?}: {} segments ({} cancelled) walked into {} loops",
            self.side,
            self.recorded,
            self.cancelled,
            loops.len()
        );
        Ok(loops)
    }
}
