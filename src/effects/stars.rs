use super::{Effect, FrameTime};
use crate::display::PixelBuffer;
use crate::util::Rng;

pub const NUM_STARS: usize = 256;

/// Horizontal speed factor applied to `elapsed_ms + plane`
const SPEED: f32 = 0.15;

/// One color per parallax plane, dimmest (slowest) first
const PLANE_COLORS: [u32; 3] = [0xFF60_6060, 0xFFC2_C2C2, 0xFFFF_FFFF];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    /// Parallax plane 0..=2: faster and brighter with higher index
    pub plane: u8,
}

/// Horizontal parallax starfield
pub struct Stars {
    stars: Vec<Star>,
    width: u32,
    height: u32,
}

impl Stars {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            stars: vec![Star::default(); NUM_STARS],
            width,
            height,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}

impl Effect for Stars {
    fn reset(&mut self, rng: &mut Rng) {
        for star in &mut self.stars {
            star.x = rng.below(self.width) as f32;
            star.y = rng.below(self.height) as f32;
            star.plane = rng.below(3) as u8;
        }
    }

    fn update(&mut self, time: FrameTime, rng: &mut Rng) {
        let right = self.width as f32;
        for star in &mut self.stars {
            star.x += (time.elapsed_ms as f32 + f32::from(star.plane)) * SPEED;
            // Gone off the right edge: come back in somewhere on the left
            if star.x > right {
                star.x = -(rng.below(self.width) as f32);
                star.y = rng.below(self.height) as f32;
            }
        }
    }

    fn render(&self, buffer: &mut PixelBuffer) {
        for star in &self.stars {
            let color = PLANE_COLORS[usize::from(star.plane).min(2)];
            buffer.put_pixel(star.x as i32, star.y as i32, color);
        }
    }

    fn name(&self) -> &str {
        "Stars"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Rng;
    use proptest::prelude::*;

    fn frame(elapsed_ms: u32) -> FrameTime {
        FrameTime {
            elapsed_ms,
            now_ms: 0,
        }
    }

    #[test]
    fn test_reset_keeps_allocation() {
        let mut stars = Stars::new(640, 480);
        let ptr = stars.stars().as_ptr();
        let mut rng = Rng::new(3);
        stars.reset(&mut rng);
        let first: Vec<Star> = stars.stars().to_vec();
        stars.reset(&mut rng);
        assert_eq!(stars.stars().as_ptr(), ptr);
        assert_eq!(stars.stars().len(), NUM_STARS);
        assert_ne!(stars.stars(), first.as_slice());
    }

    #[test]
    fn test_reset_ranges() {
        let mut stars = Stars::new(640, 480);
        stars.reset(&mut Rng::new(11));
        for s in stars.stars() {
            assert!(s.x >= 0.0 && s.x < 640.0);
            assert!(s.y >= 0.0 && s.y < 480.0);
            assert!(s.plane <= 2);
        }
    }

    #[test]
    fn test_seeded_update_golden() {
        let run = || {
            let mut stars = Stars::new(640, 480);
            let mut rng = Rng::new(0x5eed);
            stars.reset(&mut rng);
            stars.update(frame(16), &mut rng);
            stars.stars().to_vec()
        };
        let a = run();
        assert_eq!(a, run());

        // (x, y, plane) after reset with seed 0x5eed and one 16 ms step
        let golden = [
            (278.4, 371.0, 0),
            (5.4, 4.0, 0),
            (433.4, 143.0, 0),
            (597.55, 468.0, 1),
            (613.7, 366.0, 2),
            (213.55, 191.0, 1),
        ];
        for (star, &(x, y, plane)) in [0, 1, 2, 5, 6, 7].iter().map(|&i| a[i]).zip(&golden) {
            assert!((star.x - x).abs() < 1e-3, "{star:?}");
            assert_eq!(star.y, y);
            assert_eq!(star.plane, plane);
        }
    }

    #[test]
    fn test_speed_depends_on_plane() {
        let mut stars = Stars::new(640, 480);
        stars.stars[0] = Star { x: 10.0, y: 5.0, plane: 0 };
        stars.stars[1] = Star { x: 10.0, y: 5.0, plane: 2 };
        stars.update(frame(16), &mut Rng::new(1));
        assert!((stars.stars[0].x - (10.0 + 16.0 * 0.15)).abs() < 1e-4);
        assert!((stars.stars[1].x - (10.0 + 18.0 * 0.15)).abs() < 1e-4);
    }

    #[test]
    fn test_render_plane_colors() {
        let mut stars = Stars::new(8, 8);
        stars.stars.fill(Star { x: -5.0, y: 0.0, plane: 0 });
        stars.stars[0] = Star { x: 1.0, y: 1.0, plane: 0 };
        stars.stars[1] = Star { x: 2.0, y: 1.0, plane: 1 };
        stars.stars[2] = Star { x: 3.0, y: 1.0, plane: 2 };
        let mut buf = PixelBuffer::with_size(8, 8);
        stars.render(&mut buf);
        assert_eq!(buf.get_pixel(1, 1), Some(0xFF60_6060));
        assert_eq!(buf.get_pixel(2, 1), Some(0xFFC2_C2C2));
        assert_eq!(buf.get_pixel(3, 1), Some(0xFFFF_FFFF));
        assert_eq!(buf.get_pixel(0, 0), Some(0));
    }

    proptest! {
        #[test]
        fn prop_update_bounds(seed in any::<u64>(), elapsed in 0u32..2000) {
            let mut stars = Stars::new(640, 480);
            let mut rng = Rng::new(seed);
            stars.reset(&mut rng);
            let before = stars.stars().to_vec();
            stars.update(frame(elapsed), &mut rng);
            for (old, new) in before.iter().zip(stars.stars()) {
                prop_assert!(new.y >= 0.0 && new.y < 480.0);
                let advanced = old.x + (elapsed as f32 + f32::from(old.plane)) * SPEED;
                if advanced > 640.0 {
                    prop_assert!(new.x <= 0.0);
                } else {
                    prop_assert_eq!(new.x, advanced);
                    prop_assert_eq!(new.y, old.y);
                }
            }
        }
    }
}
