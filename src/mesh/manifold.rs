use crate::float_types::Real;
use crate::mesh::Mesh;
use hashbrown::HashMap;
use nalgebra::Point3;
use std::fmt::Debug;

const QUANTIZATION_FACTOR: Real = 1e7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct QuantizedPoint(i64, i64, i64);

fn quantize_point(p: &Point3<Real>) -> QuantizedPoint {
    QuantizedPoint(
        (p.x * QUANTIZATION_FACTOR).round() as i64,
        (p.y * QUANTIZATION_FACTOR).round() as i64,
        (p.z * QUANTIZATION_FACTOR).round() as i64,
    )
}

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    /// Count how often every directed edge `(from, to)` is used.
    fn directed_edge_counts(&self) -> HashMap<(QuantizedPoint, QuantizedPoint), u32> {
        let mut counts = HashMap::new();
        for tri in &self.triangles {
            for &(i0, i1) in &[(0, 1), (1, 2), (2, 0)] {
                let p0 = quantize_point(&tri.positions[i0]);
                let p1 = quantize_point(&tri.positions[i1]);
                *counts.entry((p0, p1)).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Checks if the Mesh is watertight
    ///
    /// ### Returns
    /// Returns `true` if every undirected edge appears exactly 2 times.
    /// An empty mesh is trivially watertight.
    ///
    /// - Uses a `QUANTIZATION_FACTOR` for `Real` coordinates
    pub fn is_manifold(&self) -> bool {
        self.open_edge_count() == 0
    }

    /// Number of undirected edges not shared by exactly two triangles.
    pub fn open_edge_count(&self) -> usize {
        let mut edge_counts: HashMap<(QuantizedPoint, QuantizedPoint), u32> = HashMap::new();
        for ((p0, p1), n) in self.directed_edge_counts() {
            // Order them so (p0, p1) and (p1, p0) become the same key
            let key = if p0 < p1 { (p0, p1) } else { (p1, p0) };
            *edge_counts.entry(key).or_insert(0) += n;
        }
        edge_counts.values().filter(|&&count| count != 2).count()
    }

    /// Checks that neighbouring triangles agree on orientation: each directed
    /// edge is used once and its reverse once.
    pub fn is_consistently_oriented(&self) -> bool {
        let counts = self.directed_edge_counts();
        counts
            .iter()
            .all(|((p0, p1), &n)| n == 1 && counts.get(&(*p1, *p0)) == Some(&1))
    }
}

#[cfg(test)]
mod tests {
    use crate::mesh::Mesh;

    #[test]
    fn closed_shapes_are_manifold() {
        let cube: Mesh<()> = Mesh::cube(1.0, None);
        assert!(cube.is_manifold());
        assert!(cube.is_consistently_oriented());

        let torus: Mesh<()> = Mesh::torus(3.0, 1.0, 12, 8, None);
        assert!(torus.is_manifold());
        assert!(torus.is_consistently_oriented());
    }

    #[test]
    fn missing_face_opens_edges() {
        let mut cube: Mesh<()> = Mesh::cube(1.0, None);
        cube.triangles.pop();
        assert!(!cube.is_manifold());
        assert_eq!(cube.open_edge_count(), 3);
    }

    #[test]
    fn flipped_face_breaks_orientation() {
        let mut cube: Mesh<()> = Mesh::cube(1.0, None);
        cube.triangles[0].flip();
        assert!(cube.is_manifold());
        assert!(!cube.is_consistently_oriented());
    }
}
