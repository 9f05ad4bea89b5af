//! Texture and light map storage for the object rasterizer
//!
//! Both are 256x256 so fixed-point coordinates can wrap with a byte mask.

use std::path::Path;

use image::imageops::FilterType;
use tracing::{debug, warn};

use crate::display::argb;
use crate::error::{DemoError, DemoResult};

/// Side length of the texture and light map
pub const TEX_SIZE: u32 = 256;

// ============================================================================
// Texture
// ============================================================================

/// 32-bit ARGB8888 texture with an explicit pitch (in pixels)
#[derive(Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    pitch: usize,
    pixels: Vec<u32>,
}

impl Texture {
    /// Create a new opaque black texture
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pitch: width as usize,
            pixels: vec![argb(0, 0, 0); (width * height) as usize],
        }
    }

    /// Decode an image file and convert it to the rasterizer layout.
    /// Any failure is returned to the caller; there is no fallback.
    pub fn load(path: impl AsRef<Path>) -> DemoResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| DemoError::Texture {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            path = %path.display(),
            width = img.width(),
            height = img.height(),
            "decoded texture"
        );
        Ok(Self::from_image(&img))
    }

    /// Convert any decoded image to 256x256 ARGB8888
    pub fn from_image(img: &image::DynamicImage) -> Self {
        let mut rgba = img.to_rgba8();
        if rgba.width() != TEX_SIZE || rgba.height() != TEX_SIZE {
            warn!(
                width = rgba.width(),
                height = rgba.height(),
                "texture is not {TEX_SIZE}x{TEX_SIZE}, resampling"
            );
            rgba = image::imageops::resize(&rgba, TEX_SIZE, TEX_SIZE, FilterType::Triangle);
        }
        let pixels = rgba.pixels().map(|p| argb(p[0], p[1], p[2])).collect();
        Self {
            width: TEX_SIZE,
            height: TEX_SIZE,
            pitch: TEX_SIZE as usize,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: u32) {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.pitch + x as usize] = pixel;
        }
    }

    /// Nearest-neighbor texel fetch with bitmask wrapping.
    /// Only correct for power-of-2 sizes; handles negatives via two's complement.
    #[inline]
    pub fn sample_texel(&self, tx: i32, ty: i32) -> u32 {
        let x = (tx as u32) & (self.width - 1);
        let y = (ty as u32) & (self.height - 1);
        self.pixels[y as usize * self.pitch + x as usize]
    }
}

// ============================================================================
// Procedural Texture Generators
// ============================================================================

impl Texture {
    /// Generate a checkerboard pattern
    pub fn checkerboard(size: u32, tile_size: u32, c1: u32, c2: u32) -> Self {
        let mut tex = Self::new(size, size);
        for y in 0..size {
            for x in 0..size {
                let checker = ((x / tile_size) + (y / tile_size)) % 2 == 0;
                tex.set_pixel(x, y, if checker { c1 } else { c2 });
            }
        }
        tex
    }

    /// Generate an XOR pattern (classic demoscene texture)
    pub fn xor_pattern(size: u32) -> Self {
        let mut tex = Self::new(size, size);
        for y in 0..size {
            for x in 0..size {
                let v = (x ^ y) as u8;
                tex.set_pixel(x, y, argb(v, v / 2, 255 - v));
            }
        }
        tex
    }
}

// ============================================================================
// LightMap
// ============================================================================

/// Radial falloff: brightest at the centre, zero at radius 128 and beyond
pub struct LightMap {
    values: Vec<u8>,
}

impl LightMap {
    pub fn radial() -> Self {
        let half = (TEX_SIZE / 2) as i32;
        let mut values = Vec::with_capacity((TEX_SIZE * TEX_SIZE) as usize);
        for y in 0..TEX_SIZE as i32 {
            for x in 0..TEX_SIZE as i32 {
                let dx = x - half;
                let dy = y - half;
                let d2 = dx * dx + dy * dy;
                let falloff = (d2 * 255 / (half * half)).min(255);
                values.push((255 - falloff) as u8);
            }
        }
        Self { values }
    }

    /// Masked lookup, same wrapping rule as [`Texture::sample_texel`]
    #[inline]
    pub fn sample(&self, u: i32, v: i32) -> u8 {
        let x = (u as u32 & (TEX_SIZE - 1)) as usize;
        let y = (v as u32 & (TEX_SIZE - 1)) as usize;
        self.values[y * TEX_SIZE as usize + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_wraps() {
        let tex = Texture::xor_pattern(TEX_SIZE);
        assert_eq!(tex.sample_texel(3, 5), tex.sample_texel(259, 5));
        assert_eq!(tex.sample_texel(-1, 0), tex.sample_texel(255, 0));
        assert_eq!(tex.sample_texel(7, -256), tex.sample_texel(7, 0));
    }

    #[test]
    fn test_from_image_resamples_to_fixed_size() {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            40,
            20,
            image::Rgba([200, 100, 50, 0]),
        ));
        let tex = Texture::from_image(&img);
        assert_eq!((tex.width(), tex.height()), (TEX_SIZE, TEX_SIZE));
        // alpha is forced opaque
        assert_eq!(tex.sample_texel(128, 128), argb(200, 100, 50));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let err = Texture::load("definitely/not/here.png").err();
        assert!(matches!(err, Some(DemoError::Texture { .. })));
    }

    #[test]
    fn test_light_map_falloff() {
        let light = LightMap::radial();
        assert_eq!(light.sample(128, 128), 255);
        assert_eq!(light.sample(0, 128), 0);
        assert_eq!(light.sample(0, 0), 0);
        assert!(light.sample(150, 128) > light.sample(180, 128));
        assert_eq!(light.sample(128 + 256, 128), 255);
    }
}
