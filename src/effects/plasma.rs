use std::f64::consts::PI;

use super::{Effect, FrameTime};
use crate::display::{argb, PixelBuffer};
use crate::util::Rng;

/// Classic demoscene plasma: two precomputed fields, twice the screen size in
/// each direction, scrolled independently and summed through a cycling palette
pub struct Plasma {
    field1: Vec<u8>,
    field2: Vec<u8>,
    palette: [u32; 256],
    width: usize,
    height: usize,
    /// Linear start offsets into the two fields for this frame
    src1: usize,
    src2: usize,
}

impl Plasma {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);
        let (w, h) = (width as f64, height as f64);
        let mut field1 = Vec::with_capacity(4 * width * height);
        let mut field2 = Vec::with_capacity(4 * width * height);

        for j in 0..height * 2 {
            let fj = j as f64;
            for i in 0..width * 2 {
                let fi = i as f64;
                field1.push((64.0 + 63.0 * ((h - fj).hypot(w - fi) / 16.0).sin()) as u8);
                field2.push(
                    (64.0
                        + 63.0
                            * (fi / (37.0 + 15.0 * (fj / 74.0).cos())).sin()
                            * (fj / (31.0 + 11.0 * (fi / 57.0).sin())).cos())
                        as u8,
                );
            }
        }

        let mut plasma = Self {
            field1,
            field2,
            palette: [0; 256],
            width,
            height,
            src1: 0,
            src2: 0,
        };
        plasma.animate(0);
        plasma
    }

    /// Palette and window offsets for demo time `t` (ms)
    fn animate(&mut self, now_ms: u64) {
        self.palette = build_palette(now_ms);

        let t = now_ms as f64;
        let (hw, hh) = ((self.width / 2) as f64, (self.height / 2) as f64);
        let window = |half: f64, wave: f64| (half + ((half - 1.0) * wave) as i64 as f64) as usize;

        let x1 = window(hw, (t / 970.0).cos());
        let x2 = window(hw, (-t / 1140.0).sin());
        let y1 = window(hh, (t / 1230.0).sin());
        let y2 = window(hh, (-t / 750.0).cos());

        let stride = self.width * 2;
        self.src1 = y1 * stride + x1;
        self.src2 = y2 * stride + x2;
    }

    pub fn palette(&self) -> &[u32; 256] {
        &self.palette
    }

    /// Field sample offsets for the current frame
    pub fn sources(&self) -> (usize, usize) {
        (self.src1, self.src2)
    }
}

/// 256-entry palette from three phase-shifted sinusoids with distinct periods
pub fn build_palette(now_ms: u64) -> [u32; 256] {
    let t = now_ms as f64;
    let mut palette = [0; 256];
    for (i, entry) in palette.iter_mut().enumerate() {
        let phase = i as f64 * PI / 128.0;
        let r = (128.0 + 127.0 * (phase + t / 740.0).cos()) as u8;
        let g = (128.0 + 127.0 * (phase + t / 630.0).sin()) as u8;
        let b = (128.0 - 127.0 * (phase + t / 810.0).cos()) as u8;
        *entry = argb(r, g, b);
    }
    palette
}

impl Effect for Plasma {
    fn reset(&mut self, _rng: &mut Rng) {}

    fn update(&mut self, time: FrameTime, _rng: &mut Rng) {
        self.animate(time.now_ms);
    }

    fn render(&self, buffer: &mut PixelBuffer) {
        let width = (buffer.width() as usize).min(self.width);
        let height = (buffer.height() as usize).min(self.height);
        let mut lock = buffer.lock();
        let bpp = lock.bytes_per_pixel();

        let mut src1 = self.src1;
        let mut src2 = self.src2;
        for y in 0..height {
            let mut dst = lock.row_offset(y as u32);
            for _ in 0..width {
                let index = self.field1[src1].wrapping_add(self.field2[src2]);
                lock.write(dst, self.palette[usize::from(index)]);
                dst += bpp;
                src1 += 1;
                src2 += 1;
            }
            // skip the rest of the double-width field row
            src1 += 2 * self.width - width;
            src2 += 2 * self.width - width;
        }
    }

    fn name(&self) -> &str {
        "Plasma"
    }
}
