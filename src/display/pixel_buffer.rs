use super::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// Opaque black in ARGB8888
pub const BLACK: u32 = 0xFF00_0000;

// ============================================================================
// Utility Functions
// ============================================================================

/// Pack opaque ARGB8888
#[inline]
pub const fn argb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Split ARGB8888 into (r, g, b)
#[inline]
pub const fn rgb_of(pixel: u32) -> (u8, u8, u8) {
    ((pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8)
}

/// Store `pixel` at the start of `dest` using `bpp` bytes.
/// 1 and 2 byte formats keep the low bits, 3 byte formats follow the
/// target byte order, 4 byte formats are stored native-endian.
#[inline]
fn store(dest: &mut [u8], bpp: usize, pixel: u32) {
    match bpp {
        1 => dest[0] = pixel as u8,
        2 => dest[..2].copy_from_slice(&(pixel as u16).to_ne_bytes()),
        3 => {
            if cfg!(target_endian = "big") {
                dest[..3].copy_from_slice(&pixel.to_be_bytes()[1..]);
            } else {
                dest[..3].copy_from_slice(&pixel.to_le_bytes()[..3]);
            }
        },
        _ => dest[..4].copy_from_slice(&pixel.to_ne_bytes()),
    }
}

#[inline]
fn load(src: &[u8], bpp: usize) -> u32 {
    match bpp {
        1 => src[0] as u32,
        2 => u16::from_ne_bytes([src[0], src[1]]) as u32,
        3 => {
            if cfg!(target_endian = "big") {
                u32::from_be_bytes([0, src[0], src[1], src[2]])
            } else {
                u32::from_le_bytes([src[0], src[1], src[2], 0])
            }
        },
        _ => u32::from_ne_bytes([src[0], src[1], src[2], src[3]]),
    }
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// Byte framebuffer with a host-defined pixel size and row pitch.
/// This is our canvas - every effect renders into it.
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    pitch: usize,
    bytes_per_pixel: usize,
    depth: Option<Vec<i32>>,
    locked: bool,
}

impl PixelBuffer {
    /// Create a 32-bit pixel buffer with default resolution (640x480)
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a tightly packed 32-bit pixel buffer
    pub fn with_size(width: u32, height: u32) -> Self {
        Self::with_format(width, height, 4, width as usize * 4)
    }

    /// Create a buffer matching a host surface layout.
    /// `bytes_per_pixel` is clamped to 1..=4 and `pitch` to at least one row.
    pub fn with_format(width: u32, height: u32, bytes_per_pixel: usize, pitch: usize) -> Self {
        let bytes_per_pixel = bytes_per_pixel.clamp(1, 4);
        let pitch = pitch.max(width as usize * bytes_per_pixel).max(1);
        Self {
            pixels: vec![0; pitch * height as usize],
            width,
            height,
            pitch,
            bytes_per_pixel,
            depth: None,
            locked: false,
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
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.pitch + x as usize * self.bytes_per_pixel
    }

    /// Fill every pixel with `pixel`
    pub fn clear(&mut self, pixel: u32) {
        let bpp = self.bytes_per_pixel;
        let row_bytes = self.width as usize * bpp;
        for row in self.pixels.chunks_exact_mut(self.pitch) {
            for dest in row[..row_bytes].chunks_exact_mut(bpp) {
                store(dest, bpp, pixel);
            }
        }
    }

    /// Set a single pixel. Coordinates outside the buffer are silently
    /// discarded.
    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, pixel: u32) {
        if self.in_bounds(x, y) {
            let offset = self.pixel_offset(x as u32, y as u32);
            store(&mut self.pixels[offset..], self.bytes_per_pixel, pixel);
        }
    }

    /// Read a pixel back (bounds checked)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if self.in_bounds(x, y) {
            let offset = self.pixel_offset(x as u32, y as u32);
            Some(load(&self.pixels[offset..], self.bytes_per_pixel))
        } else {
            None
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Tightly packed RGBA8 copy of the visible area, for image export.
    /// Pixels are read as ARGB8888 words; alpha is forced opaque.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity((self.width * self.height * 4) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let pixel = load(&self.pixels[self.pixel_offset(x, y)..], self.bytes_per_pixel);
                let (r, g, b) = rgb_of(pixel);
                out.extend_from_slice(&[r, g, b, 0xFF]);
            }
        }
        out
    }

    /// Acquire exclusive raw access for a full-frame pass.
    /// The lock is released when the guard drops, including on unwind.
    pub fn lock(&mut self) -> FrameLock<'_> {
        debug_assert!(!self.locked, "pixel buffer locked twice");
        self.locked = true;
        FrameLock { buffer: self }
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    // ========================================================================
    // Depth Buffer
    // ========================================================================

    /// Attach a depth buffer if none exists yet. Allocation happens once per
    /// buffer; later calls are no-ops.
    pub fn ensure_depth(&mut self) {
        if self.depth.is_none() {
            self.depth = Some(vec![i32::MAX; (self.width * self.height) as usize]);
        }
    }

    #[inline]
    pub fn has_depth(&self) -> bool {
        self.depth.is_some()
    }

    /// Reset depth to the farthest value. No-op if no depth buffer.
    pub fn clear_depth(&mut self) {
        if let Some(ref mut d) = self.depth {
            d.fill(i32::MAX);
        }
    }

    /// Raw depth at (x, y). None if out of bounds or no depth buffer.
    #[inline]
    pub fn depth_at(&self, x: i32, y: i32) -> Option<i32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.depth
            .as_ref()
            .map(|d| d[(y as u32 * self.width + x as u32) as usize])
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// FrameLock
// ============================================================================

/// Scoped exclusive access to a locked [`PixelBuffer`].
///
/// Writes go straight to byte offsets computed from the pitch; callers are
/// responsible for staying inside the row they address.
pub struct FrameLock<'a> {
    buffer: &'a mut PixelBuffer,
}

impl FrameLock<'_> {
    #[inline]
    pub fn width(&self) -> u32 {
        self.buffer.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.buffer.height
    }

    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.buffer.bytes_per_pixel
    }

    /// Byte offset of the first pixel in row `y`
    #[inline]
    pub fn row_offset(&self, y: u32) -> usize {
        y as usize * self.buffer.pitch
    }

    /// Store a pixel at a raw byte offset
    #[inline]
    pub fn write(&mut self, offset: usize, pixel: u32) {
        store(
            &mut self.buffer.pixels[offset..],
            self.buffer.bytes_per_pixel,
            pixel,
        );
    }

    /// Depth-tested write at an in-bounds (x, y): stores the pixel and its
    /// depth only when `z` is strictly nearer than the stored depth.
    /// Without a depth attachment the pixel is always written.
    #[inline]
    pub fn write_z(&mut self, x: u32, y: u32, z: i32, pixel: u32) -> bool {
        let pi = (y * self.buffer.width + x) as usize;
        if let Some(ref mut d) = self.buffer.depth {
            if z >= d[pi] {
                return false;
            }
            d[pi] = z;
        }
        let offset = self.buffer.pixel_offset(x, y);
        self.write(offset, pixel);
        true
    }

    /// Depth test without writing
    #[inline]
    pub fn depth_passes(&self, x: u32, y: u32, z: i32) -> bool {
        match self.buffer.depth {
            Some(ref d) => z < d[(y * self.buffer.width + x) as usize],
            None => true,
        }
    }
}

impl Drop for FrameLock<'_> {
    fn drop(&mut self) {
        self.buffer.locked = false;
    }
}
