mod object3d;
mod plasma;
mod stars;
mod transition;

pub use object3d::Object3d;
pub use plasma::Plasma;
pub use stars::Stars;
pub use transition::Transition;

use crate::display::PixelBuffer;
use crate::scheduler::Stage;
use crate::util::Rng;

/// Timing handed to every update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTime {
    /// Milliseconds since the previous frame
    pub elapsed_ms: u32,
    /// Monotonic demo clock in milliseconds, used for phase calculations
    pub now_ms: u64,
}

/// Trait for all effects, including the transition between them.
///
/// Buffers are allocated by the constructor; `reset` only reseeds them and
/// may be called any number of times.
pub trait Effect {
    /// Re-randomize state on (re-)entry
    fn reset(&mut self, rng: &mut Rng);

    /// Advance effect state (called each frame while active)
    fn update(&mut self, time: FrameTime, rng: &mut Rng);

    /// Render effect to the pixel buffer without touching effect state
    fn render(&self, buffer: &mut PixelBuffer);

    /// Effect name for logs
    fn name(&self) -> &str;
}

/// One handler per [`Stage`], looked up by the stage's slot
pub struct EffectTable {
    handlers: Vec<Box<dyn Effect>>,
}

impl EffectTable {
    /// Register the transition and every effect in slot order
    pub fn new(
        transition: Transition,
        stars: Stars,
        plasma: Plasma,
        object: Object3d,
    ) -> Self {
        let handlers: Vec<Box<dyn Effect>> = vec![
            Box::new(transition),
            Box::new(stars),
            Box::new(plasma),
            Box::new(object),
        ];
        debug_assert_eq!(handlers.len(), Stage::ALL.len());
        Self { handlers }
    }

    pub fn get(&self, stage: Stage) -> &dyn Effect {
        self.handlers[stage.slot()].as_ref()
    }

    pub fn get_mut(&mut self, stage: Stage) -> &mut dyn Effect {
        self.handlers[stage.slot()].as_mut()
    }
}
