//! Transition wipe
//!
//! A handful of random seed rows grow up and down one row per frame until
//! they cover the screen.

use super::{Effect, FrameTime};
use crate::display::PixelBuffer;
use crate::util::Rng;

/// Number of seed rows per transition
pub const NUM_TRANS_LINES: usize = 5;

/// Mask value of a revealed pixel
const REVEALED: u8 = 0xFF;

/// Growth front of one seed: rows `top..=bottom` are revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Band {
    top: usize,
    bottom: usize,
}

pub struct Transition {
    mask: Vec<u8>,
    bands: [Band; NUM_TRANS_LINES],
    width: usize,
    height: usize,
}

impl Transition {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);
        Self {
            mask: vec![0; width * height],
            bands: [Band::default(); NUM_TRANS_LINES],
            width,
            height,
        }
    }

    /// True when every pixel of `row` is revealed
    pub fn row_revealed(&self, row: usize) -> bool {
        self.row(row).iter().all(|&b| b == REVEALED)
    }

    fn row(&self, row: usize) -> &[u8] {
        &self.mask[row * self.width..(row + 1) * self.width]
    }

    fn reveal_row(&mut self, row: usize) {
        if self.row_revealed(row) {
            return;
        }
        self.mask[row * self.width..(row + 1) * self.width].fill(REVEALED);
    }
}

impl Effect for Transition {
    fn reset(&mut self, rng: &mut Rng) {
        self.mask.fill(0);
        if self.height == 0 {
            return;
        }
        for n in 0..NUM_TRANS_LINES {
            let seed = rng.below(self.height as u32) as usize;
            self.bands[n] = Band {
                top: seed,
                bottom: seed,
            };
            self.reveal_row(seed);
        }
    }

    fn update(&mut self, _time: FrameTime, _rng: &mut Rng) {
        if self.height == 0 {
            return;
        }
        for n in 0..NUM_TRANS_LINES {
            let mut band = self.bands[n];
            band.top = band.top.saturating_sub(1);
            band.bottom = (band.bottom + 1).min(self.height - 1);
            self.bands[n] = band;
            self.reveal_row(band.top);
            self.reveal_row(band.bottom);
        }
    }

    /// Samples the mask at index `x * y` rather than the raster position, so
    /// the picture is a hyperbolic smear of the mask instead of the bands.
    fn render(&self, buffer: &mut PixelBuffer) {
        let len = self.mask.len();
        if len == 0 {
            return;
        }
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let idx = (x as usize * y as usize).min(len - 1);
                buffer.put_pixel(x as i32, y as i32, u32::from(self.mask[idx]));
            }
        }
    }

    fn name(&self) -> &str {
        "Transition"
    }
}
