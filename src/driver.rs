//! Frame driver
//!
//! [`Demo`] owns everything a running demo needs: scheduler, effect modules,
//! random source and the demo clock. Each call to [`Demo::step`] produces one
//! frame. Nothing is global, so tests can run independent instances side by
//! side.

use tracing::{debug, info};

use crate::display::{PixelBuffer, BLACK};
use crate::effects::{EffectTable, FrameTime, Object3d, Plasma, Stars, Transition};
use crate::scheduler::{Scheduler, Stage};
use crate::texture::Texture;
use crate::util::Rng;

pub struct Demo {
    scheduler: Scheduler,
    effects: EffectTable,
    rng: Rng,
    now_ms: u64,
}

impl Demo {
    /// Build every module at `width` x `height` and enter the first stage
    pub fn new(width: u32, height: u32, texture: Texture, seed: u64) -> Self {
        let effects = EffectTable::new(
            Transition::new(width, height),
            Stars::new(width, height),
            Plasma::new(width, height),
            Object3d::new(width, height, texture),
        );
        let mut demo = Self {
            scheduler: Scheduler::new(),
            effects,
            rng: Rng::new(seed),
            now_ms: 0,
        };

        let stage = demo.scheduler.stage();
        demo.effects.get_mut(stage).reset(&mut demo.rng);
        info!(%stage, width, height, seed, "demo started");
        demo
    }

    /// Advance by `elapsed_ms` and render the frame into `buffer`.
    /// Returns the new stage if the scheduler switched this frame.
    pub fn step(&mut self, elapsed_ms: u32, buffer: &mut PixelBuffer) -> Option<Stage> {
        self.now_ms = self.now_ms.saturating_add(u64::from(elapsed_ms));

        let changed = self.scheduler.tick(elapsed_ms);
        let stage = self.scheduler.stage();
        if changed.is_some() {
            let effect = self.effects.get_mut(stage);
            effect.reset(&mut self.rng);
            debug!(effect = effect.name(), "module reset");
        }

        let time = FrameTime {
            elapsed_ms,
            now_ms: self.now_ms,
        };
        self.effects.get_mut(stage).update(time, &mut self.rng);

        buffer.clear(BLACK);
        self.effects.get(stage).render(buffer);
        changed
    }

    pub fn stage(&self) -> Stage {
        self.scheduler.stage()
    }

    /// Milliseconds of demo time simulated so far
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::EffectId;
    use crate::util::TARGET_FRAME_MS;

    const W: u32 = 64;
    const H: u32 = 48;

    fn demo(seed: u64) -> Demo {
        Demo::new(W, H, Texture::xor_pattern(256), seed)
    }

    fn count_not(buf: &PixelBuffer, color: u32) -> usize {
        let mut n = 0;
        for y in 0..H as i32 {
            for x in 0..W as i32 {
                if buf.get_pixel(x, y) != Some(color) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_first_frame_shows_stars() {
        let mut d = demo(7);
        let mut buf = PixelBuffer::with_size(W, H);
        assert_eq!(d.step(TARGET_FRAME_MS, &mut buf), None);
        assert_eq!(d.stage(), Stage::Effect(EffectId::Stars));
        assert_eq!(d.now_ms(), u64::from(TARGET_FRAME_MS));
        // black background with some stars on it
        let stars = count_not(&buf, BLACK);
        assert!(stars > 0 && stars <= 256, "{stars} star pixels");
    }

    #[test]
    fn test_stage_changes_follow_scheduler() {
        let mut d = demo(7);
        let mut buf = PixelBuffer::with_size(W, H);
        assert_eq!(d.step(4_999, &mut buf), None);
        assert_eq!(d.step(1, &mut buf), Some(Stage::Transition));
        assert_eq!(d.step(500, &mut buf), Some(Stage::Effect(EffectId::Plasma)));
        // plasma covers every pixel
        assert_eq!(count_not(&buf, BLACK), (W * H) as usize);
        assert_eq!(d.step(5_000, &mut buf), Some(Stage::Transition));
        assert_eq!(
            d.step(500, &mut buf),
            Some(Stage::Effect(EffectId::Object3d))
        );
        assert!(buf.has_depth());
    }

    #[test]
    fn test_same_seed_same_frames() {
        let mut a = demo(1234);
        let mut b = demo(1234);
        let mut buf_a = PixelBuffer::with_size(W, H);
        let mut buf_b = PixelBuffer::with_size(W, H);
        // long enough to visit every stage once and wrap
        for frame in 0..2_000 {
            let ca = a.step(TARGET_FRAME_MS, &mut buf_a);
            let cb = b.step(TARGET_FRAME_MS, &mut buf_b);
            assert_eq!(ca, cb);
            if frame % 50 == 0 {
                assert_eq!(buf_a.as_bytes(), buf_b.as_bytes(), "frame {frame}");
            }
        }
        assert_eq!(a.now_ms(), 32_000);
    }

    #[test]
    fn test_seeds_diverge() {
        let mut a = demo(1);
        let mut b = demo(2);
        let mut buf_a = PixelBuffer::with_size(W, H);
        let mut buf_b = PixelBuffer::with_size(W, H);
        a.step(TARGET_FRAME_MS, &mut buf_a);
        b.step(TARGET_FRAME_MS, &mut buf_b);
        assert_ne!(buf_a.as_bytes(), buf_b.as_bytes());
    }

    #[test]
    fn test_extreme_elapsed_does_not_panic() {
        let mut d = demo(3);
        let mut buf = PixelBuffer::with_size(W, H);
        d.step(0, &mut buf);
        for _ in 0..10 {
            d.step(u32::MAX, &mut buf);
        }
        assert_eq!(d.now_ms(), 10 * u64::from(u32::MAX));
        assert!(!buf.is_locked());
    }
}
