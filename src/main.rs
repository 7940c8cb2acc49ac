// main.rs
//
// Command line front end: cut one STL file into two along a plane.
//
//   stlcut <input> <out_a> <out_b> <nx> <ny> <nz> <offset> [options]
//
// Set RUST_LOG=debug to follow the cut phases.

use clap::Parser;
use nalgebra::Vector3;
use std::path::PathBuf;
use std::process::ExitCode;
use stlcut::cut::{CutConfig, CutOutcome, Tolerance};
use stlcut::float_types::Real;
use stlcut::io::IoError;
use stlcut::io::stl::{StlFormat, cut_stl_file};

#[derive(Parser, Debug)]
#[command(name = "stlcut")]
#[command(about = "Cut a closed STL mesh into two closed meshes along the plane N·P + D = 0", long_about = None)]
struct Args {
    /// STL file to cut
    input: PathBuf,

    /// Output for the part where N·P + D > 0
    out_a: PathBuf,

    /// Output for the part where N·P + D < 0
    out_b: PathBuf,

    /// Plane normal, need not be unit length
    #[arg(allow_negative_numbers = true)]
    nx: Real,
    #[arg(allow_negative_numbers = true)]
    ny: Real,
    #[arg(allow_negative_numbers = true)]
    nz: Real,

    /// Plane offset D
    #[arg(allow_negative_numbers = true)]
    offset: Real,

    /// Absolute on-plane tolerance in model units
    #[arg(long, conflicts_with = "relative_tolerance")]
    tolerance: Option<Real>,

    /// On-plane tolerance as a factor of the bounding box diagonal
    #[arg(long)]
    relative_tolerance: Option<Real>,

    /// Write ASCII STL instead of binary
    #[arg(long)]
    ascii: bool,
}

impl Args {
    fn config(&self) -> CutConfig {
        match (self.tolerance, self.relative_tolerance) {
            (Some(abs), _) => CutConfig::with_tolerance(Tolerance::Absolute(abs)),
            (None, Some(factor)) => CutConfig::with_tolerance(Tolerance::Relative(factor)),
            (None, None) => CutConfig::default(),
        }
    }

    const fn format(&self) -> StlFormat {
        if self.ascii { StlFormat::Ascii } else { StlFormat::Binary }
    }
}

fn run(args: &Args) -> Result<(), IoError> {
    let normal = Vector3::new(args.nx, args.ny, args.nz);
    log::info!(
        "cutting {} by {:?}·P + {} = 0",
        args.input.display(),
        normal.as_slice(),
        args.offset
    );

    let result = cut_stl_file(
        &args.input,
        &args.out_a,
        &args.out_b,
        normal,
        args.offset,
        &args.config(),
        args.format(),
    )?;

    match result.outcome {
        CutOutcome::Split => log::info!(
            "side A: {} triangles, side B: {} triangles, {} cap loops",
            result.a.len(),
            result.b.len(),
            result.loops.len()
        ),
        CutOutcome::EmptyIntersection(side) => {
            log::warn!("the plane misses the mesh, side {side:?} holds all of it")
        },
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("stlcut: {err}");
            ExitCode::FAILURE
        },
    }
}
