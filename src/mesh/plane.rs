//! Oriented cutting planes and their local 2D frames.

use crate::errors::CutError;
use crate::float_types::Real;
use nalgebra::{Point2, Point3, Vector3};

/// An oriented plane `N·P + D = 0` with unit normal `N`.
///
/// Points with a positive signed distance lie on side **A**, points with a
/// negative one on side **B**.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Vector3<Real>,
    offset: Real,
}

impl Plane {
    /// Build a plane from a (not necessarily unit) normal and offset.
    ///
    /// Both are divided by the length of `normal`, so the plane keeps its
    /// position: `(0, 2, 0)` with offset `-1` is the plane `y = 0.5`.
    ///
    /// ## Errors
    /// [`CutError::InvalidPlane`] when the normal has (near) zero length or a
    /// component of the normal or the offset is not finite.
    pub fn new(normal: Vector3<Real>, offset: Real) -> Result<Self, CutError> {
        let len = normal.norm();
        if !len.is_finite() || !offset.is_finite() || len <= Real::EPSILON {
            return Err(CutError::InvalidPlane { normal, offset });
        }
        Ok(Plane {
            normal: normal / len,
            offset: offset / len,
        })
    }

    /// Plane through `point` with the given normal.
    pub fn from_point_normal(
        point: Point3<Real>,
        normal: Vector3<Real>,
    ) -> Result<Self, CutError> {
        let unit = Self::new(normal, 0.0)?.normal;
        Ok(Plane {
            normal: unit,
            offset: -unit.dot(&point.coords),
        })
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.offset
    }

    /// `N·P + D`, positive on side A.
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) + self.offset
    }

    /// The point of the plane closest to the origin.
    pub fn origin(&self) -> Point3<Real> {
        Point3::from(self.normal * -self.offset)
    }

    /// A right-handed 2D frame in the plane whose `+Z` is `up`.
    ///
    /// `up` is expected to be `±normal()`; it picks which way round loops
    /// look counter-clockwise.
    pub fn frame(&self, up: Vector3<Real>) -> PlaneFrame {
        PlaneFrame::new(self.origin(), up)
    }
}

/// Orthonormal basis `{u, v}` spanning a plane, with `u × v = normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneFrame {
    pub origin: Point3<Real>,
    pub u: Vector3<Real>,
    pub v: Vector3<Real>,
    pub normal: Vector3<Real>,
}

impl PlaneFrame {
    pub fn new(origin: Point3<Real>, normal: Vector3<Real>) -> Self {
        let normal = normal.normalize();
        // cross with the axis the normal is least aligned with
        let helper = if normal.x.abs() <= normal.y.abs() && normal.x.abs() <= normal.z.abs() {
            Vector3::x()
        } else if normal.y.abs() <= normal.z.abs() {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let u = helper.cross(&normal).normalize();
        let v = normal.cross(&u);
        PlaneFrame {
            origin,
            u,
            v,
            normal,
        }
    }

    /// Coordinates of `point` (assumed on the plane) in this frame.
    pub fn project(&self, point: &Point3<Real>) -> Point2<Real> {
        let d = point - self.origin;
        Point2::new(d.dot(&self.u), d.dot(&self.v))
    }

    /// Inverse of [`PlaneFrame::project`].
    pub fn unproject(&self, point: &Point2<Real>) -> Point3<Real> {
        self.origin + self.u * point.x + self.v * point.y
    }
}
