//! Infinite plane in Hessian normal form.

use nalgebra::{Point3, Unit, Vector3};

/// Plane `n . p + d = 0` with unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal
    pub normal: Unit<Vector3<f64>>,

    /// Signed offset
    pub d: f64,
}

impl Plane {
    /// Plane through three points.
    ///
    /// Returns `None` when the points are (near-)collinear.
    pub fn from_points(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Self> {
        let ab = b - a;
        let ac = c - a;
        let cross = ab.cross(&ac);
        // Degenerate sample: collinear or coincident points
        if cross.norm_squared() < 1e-12 {
            return None;
        }
        let normal = Unit::new_normalize(cross);
        let d = -normal.dot(&a.coords);
        Some(Self { normal, d })
    }

    /// Unsigned point-to-plane distance.
    pub fn distance(&self, p: &Point3<f64>) -> f64 {
        (self.normal.dot(&p.coords) + self.d).abs()
    }

    /// Angle between the normal and a reference axis, in radians.
    ///
    /// Normal orientation is ambiguous, so the angle is folded into
    /// [0, pi/2].
    pub fn normal_angle_to(&self, axis: &Unit<Vector3<f64>>) -> f64 {
        self.normal.dot(axis).abs().clamp(0.0, 1.0).acos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_from_points_horizontal() {
        let plane = Plane::from_points(
            &Point3::new(0.0, 1.0, 0.0),
            &Point3::new(1.0, 1.0, 0.0),
            &Point3::new(0.0, 1.0, 1.0),
        )
        .unwrap();

        // Horizontal plane at y = 1, normal is +-y
        assert!(plane.normal.y.abs() > 0.999);
        assert!(plane.distance(&Point3::new(5.0, 1.0, -3.0)) < 1e-9);
        assert!((plane.distance(&Point3::new(0.0, 0.0, 0.0)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_points_degenerate() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 1.0, 1.0);
        let c = Point3::new(2.0, 2.0, 2.0);
        assert!(Plane::from_points(&a, &b, &c).is_none());
        assert!(Plane::from_points(&a, &a, &b).is_none());
    }

    #[test]
    fn test_normal_angle_folding() {
        let plane = Plane::from_points(
            &Point3::new(0.0, 1.0, 0.0),
            &Point3::new(1.0, 1.0, 0.0),
            &Point3::new(0.0, 1.0, 1.0),
        )
        .unwrap();
        let y_axis = Unit::new_normalize(Vector3::new(0.0, -1.0, 0.0));
        // Whatever the winding produced, the folded angle is ~0
        assert!(plane.normal_angle_to(&y_axis) < 1e-9);

        let z_axis = Unit::new_normalize(Vector3::new(0.0, 0.0, 1.0));
        assert!((plane.normal_angle_to(&z_axis) - FRAC_PI_2).abs() < 1e-9);
    }
}
