//! 3D Math Utilities
//!
//! Vectors, rotation matrices and perspective projection for the object
//! rasterizer.

use std::ops::{Add, Mul, Neg, Sub};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit-length copy; the zero vector is returned unchanged
    #[inline]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            *self
        }
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Approximate equality check for floating point comparison
    #[inline]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

// ============================================================================
// Rotation matrix
// ============================================================================

/// Row-major 3x3 rotation matrix (the rotation block of a 4x4 transform;
/// translation is applied separately as the object position)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Rotation around the X axis
    pub fn rotation_x(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, cos, -sin], [0.0, sin, cos]],
        }
    }

    /// Rotation around the Y axis
    pub fn rotation_y(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            m: [[cos, 0.0, sin], [0.0, 1.0, 0.0], [-sin, 0.0, cos]],
        }
    }

    /// Rotation around the Z axis
    pub fn rotation_z(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            m: [[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// X, then Y, then Z applied to a column vector
    pub fn rotation_xyz(rx: f32, ry: f32, rz: f32) -> Self {
        Self::rotation_z(rz) * Self::rotation_y(ry) * Self::rotation_x(rx)
    }

    #[inline]
    pub fn transform(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3 {
            x: m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            y: m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            z: m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        }
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Mat3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut m = [[0.0; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        Self { m }
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, v: Vec3) -> Vec3 {
        self.transform(v)
    }
}

/// Pinhole projection with focal length equal to the screen height.
///
/// `depth` must already be clamped in front of the camera.
/// Returns screen (x, y) with the origin at the top-left corner.
#[inline]
pub fn project(point: Vec3, depth: f32, width: u32, height: u32) -> (f32, f32) {
    let focal = height as f32;
    (
        point.x * focal / depth + width as f32 / 2.0,
        point.y * focal / depth + height as f32 / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_dot_and_cross() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.dot(&y), 0.0);
        assert!(x.cross(&y).approx_eq(&Vec3::new(0.0, 0.0, 1.0), EPS));
    }

    #[test]
    fn test_normalize_zero_is_stable() {
        assert_eq!(Vec3::zero().normalize(), Vec3::zero());
        let n = Vec3::new(3.0, 0.0, 4.0).normalize();
        assert!((n.length() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_axis_rotations() {
        let v = Vec3::new(1.0, 0.0, 0.0);
        let r = Mat3::rotation_z(FRAC_PI_2) * v;
        assert!(r.approx_eq(&Vec3::new(0.0, 1.0, 0.0), EPS));

        let v = Vec3::new(0.0, 1.0, 0.0);
        let r = Mat3::rotation_x(FRAC_PI_2) * v;
        assert!(r.approx_eq(&Vec3::new(0.0, 0.0, 1.0), EPS));

        let v = Vec3::new(0.0, 0.0, 1.0);
        let r = Mat3::rotation_y(FRAC_PI_2) * v;
        assert!(r.approx_eq(&Vec3::new(1.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn test_compose_matches_sequential() {
        let v = Vec3::new(0.3, -1.2, 2.5);
        let composed = Mat3::rotation_xyz(0.4, 1.1, -0.7) * v;
        let sequential =
            Mat3::rotation_z(-0.7) * (Mat3::rotation_y(1.1) * (Mat3::rotation_x(0.4) * v));
        assert!(composed.approx_eq(&sequential, 1e-4));
    }

    #[test]
    fn test_rotation_preserves_length() {
        let v = Vec3::new(2.0, -3.0, 6.0);
        let r = Mat3::rotation_xyz(0.9, 2.3, 4.1) * v;
        assert!((r.length() - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_project_center_and_scale() {
        let (x, y) = project(Vec3::new(0.0, 0.0, 100.0), 100.0, 640, 480);
        assert_eq!((x, y), (320.0, 240.0));
        let (x, y) = project(Vec3::new(100.0, -50.0, 400.0), 400.0, 640, 480);
        assert_eq!((x, y), (440.0, 180.0));
    }
}
