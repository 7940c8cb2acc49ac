//! Split closed triangle meshes (typically read from **STL** files) into two
//! closed meshes along an arbitrary plane.
//!
//! The plane is `N·P + D = 0`. Everything with `N·P + D > 0` ends up in mesh
//! **A**, everything below in mesh **B**, and both are closed with planar caps
//! so they stay watertight and consistently oriented.
//!
//! ```
//! use stlcut::{Mesh, cut::CutConfig};
//! use nalgebra::Vector3;
//!
//! let cube: Mesh<()> = Mesh::cube(1.0, None);
//! let halves = stlcut::cut(&cube, Vector3::y(), -0.5, &CutConfig::default()).unwrap();
//! assert!((halves.a.volume() - 0.5).abs() < 1e-9);
//! assert!((halves.b.volume() - 0.5).abs() < 1e-9);
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` import/export
//! - **cli**: the `stlcut` binary and its `env_logger` output
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon for multithreading

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod cut;
pub mod errors;
pub mod float_types;
pub mod io;
pub mod mesh;
pub mod triangulated;

#[cfg(any(
    all(feature = "f64", feature = "f32"),
    not(any(feature = "f64", feature = "f32"))
))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use cut::{CutConfig, CutOutcome, CutResult, Side, Tolerance, cut};
pub use errors::CutError;
pub use mesh::{Mesh, Plane, Triangle};
