// Re-export parry for the appropriate float size
#[cfg(feature = "f64")]
pub use parry3d_f64 as parry3d;

#[cfg(feature = "f32")]
pub use parry3d;

// Our Real scalar type:
#[cfg(feature = "f32")]
pub type Real = f32;
#[cfg(feature = "f64")]
pub type Real = f64;

use core::str::FromStr;

/// Default tolerance factor, relative to the diagonal of the mesh bounding box.
#[inline]
const fn default_relative_tolerance() -> Real {
    #[cfg(feature = "f32")]
    {
        1e-4
    }
    #[cfg(feature = "f64")]
    {
        1e-6
    }
}

/// Returns the relative tolerance factor used when a [`crate::cut::CutConfig`]
/// is built with `Default`.
///
/// The value can be overridden at **build time** by setting `STLCUT_TOLERANCE`
/// (e.g. `STLCUT_TOLERANCE=1e-7 cargo build`). Values are clamped to at least
/// `Real::EPSILON`.
pub fn relative_tolerance() -> Real {
    if let Some(environment_variable) = option_env!("STLCUT_TOLERANCE") {
        if let Ok(value) = Real::from_str(environment_variable) {
            return value.max(Real::EPSILON);
        }
    }
    default_relative_tolerance()
}

/// Smallest absolute tolerance ever used, whatever the model scale.
pub const MIN_TOLERANCE: Real = Real::EPSILON * 16.0;

/// The full circle constant (τ)
#[cfg(feature = "f32")]
pub const TAU: Real = core::f32::consts::TAU;
/// The full circle constant (τ)
#[cfg(feature = "f64")]
pub const TAU: Real = core::f64::consts::TAU;
