//! Audio sink
//!
//! The simulation only raises one-shot triggers; playback belongs to the
//! host. [`LogAudio`] is the headless implementation used by the native
//! runner and tests.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player volley fired
    Gunshot,
    /// Enemy or asteroid destroyed
    EnemyDestroyed,
    /// Low-health warning loop begins
    LowHealthLoopStart,
}

/// Receiver of fire-and-forget sound triggers
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Audio sink that logs triggers instead of playing them
#[derive(Debug, Clone, Default)]
pub struct LogAudio {
    /// Low-health loop currently running
    low_health_loop: bool,
    /// Every trigger received, in order
    pub played: Vec<SoundEffect>,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn low_health_loop(&self) -> bool {
        self.low_health_loop
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::debug!("Sound {:?}", effect);
        self.played.push(effect);
        if effect == SoundEffect::LowHealthLoopStart {
            self.low_health_loop = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_triggers() {
        let mut audio = LogAudio::new();
        audio.play(SoundEffect::Gunshot);
        audio.play(SoundEffect::LowHealthLoopStart);
        assert_eq!(
            audio.played,
            vec![SoundEffect::Gunshot, SoundEffect::LowHealthLoopStart]
        );
        assert!(audio.low_health_loop());
    }
}
