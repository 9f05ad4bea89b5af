//! Fixed-point arithmetic for the rasterizer
//!
//! Values are plain `i32`s with an implicit binary scale of `2^FRAC`.
//! Edge walking and span filling interpolate in fixed point so results are
//! bit-exact across platforms.

use std::ops::{Add, AddAssign, Mul};

/// Signed fixed-point number with `FRAC` fractional bits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed<const FRAC: u32>(i32);

/// 16.16: screen x and texture coordinates
pub type Q16 = Fixed<16>;

/// 12.4: depth values stored in the z-buffer
pub type Q4 = Fixed<4>;

impl<const FRAC: u32> Fixed<FRAC> {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << FRAC);

    #[inline]
    pub const fn from_int(v: i32) -> Self {
        Self(v << FRAC)
    }

    /// Truncating conversion from float
    #[inline]
    pub fn from_f32(v: f32) -> Self {
        Self((v * (1u32 << FRAC) as f32) as i32)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Integer part (arithmetic shift, rounds toward negative infinity)
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRAC
    }

    /// Per-step increment to walk from `self` to `end` in `steps` steps.
    /// Returns zero for `steps <= 0`.
    #[inline]
    pub fn step_to(self, end: Self, steps: i32) -> Self {
        if steps <= 0 {
            return Self::ZERO;
        }
        Self(((end.0 as i64 - self.0 as i64) / steps as i64) as i32)
    }
}

impl<const FRAC: u32> Add for Fixed<FRAC> {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self(self.0.wrapping_add(other.0))
    }
}

impl<const FRAC: u32> AddAssign for Fixed<FRAC> {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.wrapping_add(other.0);
    }
}

/// Scale by an integer step count (used to skip clipped rows/columns)
impl<const FRAC: u32> Mul<i32> for Fixed<FRAC> {
    type Output = Self;
    #[inline]
    fn mul(self, n: i32) -> Self {
        Self(self.0.wrapping_mul(n))
    }
}
