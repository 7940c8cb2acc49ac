use crate::cut::{CutConfig, CutResult};
use crate::float_types::Real;
use crate::io::IoError;
use crate::mesh::{Mesh, Plane, Triangle};
use crate::triangulated::Triangulated3D;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Encoding of a written STL file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// Read an ASCII or binary STL into a [`Mesh`].
///
/// Facets stored with a zero normal get the normal implied by their winding.
///
/// ## Errors
/// [`IoError::StdIo`] when the data cannot be read or decoded,
/// [`IoError::MalformedInput`] for out of range indices or non-finite coordinates.
pub fn read_stl<R, S>(reader: &mut R, metadata: Option<S>) -> Result<Mesh<S>, IoError>
where
    R: Read + Seek,
    S: Clone + Debug + Send + Sync,
{
    let stl = stl_io::read_stl(reader)?;

    let points = stl
        .vertices
        .iter()
        .map(|v| {
            let p = Point3::new(v[0] as Real, v[1] as Real, v[2] as Real);
            if p.coords.iter().all(|c| c.is_finite()) {
                Ok(p)
            } else {
                Err(IoError::MalformedInput(format!("non-finite vertex {p}")))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut triangles = Vec::with_capacity(stl.faces.len());
    for (i, face) in stl.faces.iter().enumerate() {
        let mut positions = [Point3::origin(); 3];
        for (slot, &index) in positions.iter_mut().zip(&face.vertices) {
            *slot = *points.get(index).ok_or_else(|| {
                IoError::MalformedInput(format!("facet {i} refers to missing vertex {index}"))
            })?;
        }

        let normal = Vector3::new(
            face.normal[0] as Real,
            face.normal[1] as Real,
            face.normal[2] as Real,
        );
        let triangle = match normal.try_normalize(Real::EPSILON) {
            Some(unit) => Triangle::with_normal(positions, unit, metadata.clone()),
            None => Triangle::new(positions, metadata.clone()),
        };
        triangles.push(triangle);
    }

    log::debug!("read {} facets over {} vertices", triangles.len(), points.len());
    Ok(Mesh::from_triangles(triangles, metadata))
}

/// Export to ASCII STL
/// Convert this Mesh to an **ASCII STL** string with the given `name`.
///
/// ```rust
/// # use stlcut::mesh::Mesh;
/// let mesh = Mesh::<()>::cube(1.0, None);
/// let text = mesh.to_stl_ascii("my_solid");
/// assert!(text.starts_with("solid my_solid"));
/// ```
pub fn to_stl_ascii<T: Triangulated3D>(shape: &T, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    shape.visit_triangles(|positions, n| {
        out.push_str(&format!("  facet normal {:.6} {:.6} {:.6}\n", n.x, n.y, n.z));
        out.push_str("    outer loop\n");
        for p in &positions {
            out.push_str(&format!("      vertex {:.6} {:.6} {:.6}\n", p.x, p.y, p.z));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    });

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// The binary header is left blank, so `_name` is not stored.
pub fn to_stl_binary<T: Triangulated3D>(shape: &T, _name: &str) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Vertex, write_stl};

    let mut triangles = Vec::<stl_io::Triangle>::with_capacity(shape.triangle_count());

    shape.visit_triangles(|positions, n| {
        #[allow(clippy::unnecessary_cast)]
        {
            triangles.push(stl_io::Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: positions.map(|p| Vertex::new([p.x as f32, p.y as f32, p.z as f32])),
            });
        }
    });

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

/// Encode `shape` as STL bytes in the given format.
pub fn to_stl_bytes<T: Triangulated3D>(
    shape: &T,
    name: &str,
    format: StlFormat,
) -> std::io::Result<Vec<u8>> {
    match format {
        StlFormat::Ascii => Ok(to_stl_ascii(shape, name).into_bytes()),
        StlFormat::Binary => to_stl_binary(shape, name),
    }
}

/// Cut the STL file at `input` by the plane `normal·P + offset = 0` and write
/// side A to `out_a` and side B to `out_b`.
///
/// Both files are written even when the plane misses the mesh; the empty side
/// then holds no facets.
///
/// ## Errors
/// Reading, writing and every [`crate::errors::CutError`], the latter wrapped
/// in [`IoError::Cut`]. Nothing is written if the cut fails.
pub fn cut_stl_file(
    input: impl AsRef<Path>,
    out_a: impl AsRef<Path>,
    out_b: impl AsRef<Path>,
    normal: Vector3<Real>,
    offset: Real,
    config: &CutConfig,
    format: StlFormat,
) -> Result<CutResult<()>, IoError> {
    let plane = Plane::new(normal, offset)?;
    let mesh = Mesh::<()>::from_stl_file(input.as_ref(), None)?;
    let result = mesh.cut(&plane, config)?;

    for (path, part) in [(out_a.as_ref(), &result.a), (out_b.as_ref(), &result.b)] {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("part");
        std::fs::write(path, to_stl_bytes(part, name, format)?)?;
        log::info!("wrote {} facets to {}", part.len(), path.display());
    }
    Ok(result)
}

impl<S: Clone + Debug + Send + Sync> Mesh<S> {
    /// Decode STL data held in memory.
    pub fn from_stl(data: &[u8], metadata: Option<S>) -> Result<Mesh<S>, IoError> {
        read_stl(&mut Cursor::new(data), metadata)
    }

    pub fn from_stl_file(path: impl AsRef<Path>, metadata: Option<S>) -> Result<Mesh<S>, IoError> {
        let mut file = std::fs::File::open(path)?;
        read_stl(&mut file, metadata)
    }

    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }

    pub fn to_stl_binary(&self, name: &str) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self, name)
    }
}
