//! Demo scheduler
//!
//! Effects play in a fixed order, each for its own duration, with a
//! transition wipe between every pair. After the last effect the sequence
//! wraps back to the first.

use tracing::info;

/// Length of the wipe between two effects
pub const TRANSITION_MS: i64 = 500;

/// Registered effects in play order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectId {
    Stars,
    Plasma,
    Object3d,
}

impl EffectId {
    pub const ALL: [EffectId; 3] = [EffectId::Stars, EffectId::Plasma, EffectId::Object3d];

    /// 1-based position in the play order; 0 belongs to the transition
    pub const fn ordinal(self) -> usize {
        match self {
            EffectId::Stars => 1,
            EffectId::Plasma => 2,
            EffectId::Object3d => 3,
        }
    }

    /// How long this effect stays on screen
    pub const fn duration_ms(self) -> i64 {
        match self {
            EffectId::Stars => 5_000,
            EffectId::Plasma => 5_000,
            EffectId::Object3d => 20_000,
        }
    }

    /// The effect after this one, wrapping from the last to the first
    pub fn next(self) -> EffectId {
        let ordinal = self.ordinal();
        if ordinal == Self::ALL.len() {
            Self::ALL[0]
        } else {
            Self::ALL[ordinal]
        }
    }
}

/// What is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Transition,
    Effect(EffectId),
}

impl Stage {
    /// Every stage in slot order
    pub const ALL: [Stage; 4] = [
        Stage::Transition,
        Stage::Effect(EffectId::Stars),
        Stage::Effect(EffectId::Plasma),
        Stage::Effect(EffectId::Object3d),
    ];

    /// Index into the effect table
    pub const fn slot(self) -> usize {
        match self {
            Stage::Transition => 0,
            Stage::Effect(id) => id.ordinal(),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Transition => f.write_str("Transition"),
            Stage::Effect(id) => write!(f, "{id:?}"),
        }
    }
}

/// Countdown state machine over [`Stage`]s
#[derive(Debug, Clone)]
pub struct Scheduler {
    stage: Stage,
    /// Effect that was playing before the current transition
    previous: Option<EffectId>,
    remaining_ms: i64,
}

impl Scheduler {
    /// Start in the first effect with its full duration
    pub fn new() -> Self {
        let first = EffectId::ALL[0];
        Self {
            stage: Stage::Effect(first),
            previous: None,
            remaining_ms: first.duration_ms(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn remaining_ms(&self) -> i64 {
        self.remaining_ms
    }

    /// Advance the countdown. Returns the new stage when it changed; the
    /// caller must reset that stage's module before its next update.
    ///
    /// At most one change happens per tick, however large `elapsed_ms` is.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<Stage> {
        self.remaining_ms -= i64::from(elapsed_ms);
        if self.remaining_ms > 0 {
            return None;
        }

        self.stage = match self.stage {
            Stage::Transition => {
                let next = self
                    .previous
                    .take()
                    .map_or(EffectId::ALL[0], EffectId::next);
                self.remaining_ms = next.duration_ms();
                Stage::Effect(next)
            },
            Stage::Effect(current) => {
                self.previous = Some(current);
                self.remaining_ms = TRANSITION_MS;
                Stage::Transition
            },
        };
        info!(stage = %self.stage, duration_ms = self.remaining_ms, "stage change");
        Some(self.stage)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_in_first_effect() {
        let s = Scheduler::new();
        assert_eq!(s.stage(), Stage::Effect(EffectId::Stars));
        assert_eq!(s.remaining_ms(), 5_000);
    }

    #[test]
    fn test_effect_then_transition_then_next() {
        let mut s = Scheduler::new();
        assert_eq!(s.tick(4_999), None);
        assert_eq!(s.tick(1), Some(Stage::Transition));
        assert_eq!(s.remaining_ms(), TRANSITION_MS);
        assert_eq!(s.tick(499), None);
        assert_eq!(s.tick(1), Some(Stage::Effect(EffectId::Plasma)));
        assert_eq!(s.remaining_ms(), 5_000);
    }

    #[test]
    fn test_wraps_after_last_effect() {
        let mut s = Scheduler::new();
        let mut seen = Vec::new();
        for _ in 0..8 {
            let d = s.remaining_ms() as u32;
            seen.push(s.tick(d).unwrap());
        }
        assert_eq!(
            seen,
            vec![
                Stage::Transition,
                Stage::Effect(EffectId::Plasma),
                Stage::Transition,
                Stage::Effect(EffectId::Object3d),
                Stage::Transition,
                Stage::Effect(EffectId::Stars),
                Stage::Transition,
                Stage::Effect(EffectId::Plasma),
            ]
        );
    }

    #[test]
    fn test_one_change_per_tick() {
        let mut s = Scheduler::new();
        // enough time for several stages, but only one step is taken
        assert_eq!(s.tick(u32::MAX), Some(Stage::Transition));
        assert_eq!(s.remaining_ms(), TRANSITION_MS);
        assert_eq!(s.tick(0), None);
    }

    #[test]
    fn test_zero_elapsed_never_changes() {
        let mut s = Scheduler::new();
        for _ in 0..1000 {
            assert_eq!(s.tick(0), None);
        }
    }

    #[test]
    fn test_slots_match_table_order() {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.slot(), i);
        }
        assert_eq!(EffectId::Object3d.next(), EffectId::Stars);
    }

    proptest! {
        #[test]
        fn prop_alternates_and_cycles(steps in proptest::collection::vec(1u32..3_000, 1..400)) {
            let mut s = Scheduler::new();
            let mut last_effect = EffectId::Stars;
            for elapsed in steps {
                let before = s.stage();
                match s.tick(elapsed) {
                    None => prop_assert_eq!(s.stage(), before),
                    Some(Stage::Transition) => {
                        prop_assert_eq!(before, Stage::Effect(last_effect));
                    },
                    Some(Stage::Effect(id)) => {
                        prop_assert_eq!(before, Stage::Transition);
                        prop_assert_eq!(id, last_effect.next());
                        last_effect = id;
                    },
                }
                prop_assert!(s.remaining_ms() <= 20_000);
            }
        }
    }
}
