//! Notifications raised by the simulation
//!
//! The simulation queues [`GameEvent`]s; the host drains them once per frame
//! and forwards them with [`dispatch`]. A sink that is not configured is
//! skipped and the simulation carries on.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::{AudioSink, SoundEffect};
use crate::hud::PresentationSink;

/// Outbound notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScorePopup {
        amount: u64,
        pos: Vec2,
    },
    StatusMessage {
        text: String,
        duration: f32,
        permanent: bool,
        blinking: bool,
    },
    WaveDisplay {
        wave: u32,
    },
    StarsDisplay {
        count: u32,
    },
    HealthDisplay {
        current: u32,
        max: u32,
    },
    ScoreDisplay {
        score: u64,
    },
    MultiplierDisplay {
        multiplier: f32,
    },
    Sound(SoundEffect),
    /// The run is over
    PlayerDied {
        score: u64,
        wave: u32,
    },
}

/// Optional collaborators receiving dispatched events
#[derive(Default)]
pub struct Sinks<'a> {
    pub presentation: Option<&'a mut dyn PresentationSink>,
    pub audio: Option<&'a mut dyn AudioSink>,
    warned_presentation: bool,
    warned_audio: bool,
}

impl<'a> Sinks<'a> {
    pub fn new(
        presentation: Option<&'a mut dyn PresentationSink>,
        audio: Option<&'a mut dyn AudioSink>,
    ) -> Self {
        Self {
            presentation,
            audio,
            warned_presentation: false,
            warned_audio: false,
        }
    }

    fn presentation(&mut self) -> Option<&mut (dyn PresentationSink + 'a)> {
        if self.presentation.is_none() && !self.warned_presentation {
            log::warn!("No presentation sink configured, display updates skipped");
            self.warned_presentation = true;
        }
        self.presentation.as_deref_mut()
    }

    fn audio(&mut self) -> Option<&mut (dyn AudioSink + 'a)> {
        if self.audio.is_none() && !self.warned_audio {
            log::warn!("No audio sink configured, sounds skipped");
            self.warned_audio = true;
        }
        self.audio.as_deref_mut()
    }
}

/// Forward events to whichever sinks are configured
pub fn dispatch(events: impl IntoIterator<Item = GameEvent>, sinks: &mut Sinks<'_>) {
    for event in events {
        match event {
            GameEvent::Sound(effect) => {
                if let Some(audio) = sinks.audio() {
                    audio.play(effect);
                }
            }
            GameEvent::PlayerDied { score, wave } => {
                log::info!("Run over: score {} on wave {}", score, wave + 1);
            }
            other => {
                if let Some(presentation) = sinks.presentation() {
                    present(presentation, other);
                }
            }
        }
    }
}

fn present<S: PresentationSink + ?Sized>(sink: &mut S, event: GameEvent) {
    match event {
        GameEvent::ScorePopup { amount, pos } => sink.on_score_popup(amount, pos),
        GameEvent::StatusMessage {
            text,
            duration,
            permanent,
            blinking,
        } => sink.on_status_message(&text, duration, permanent, blinking),
        GameEvent::WaveDisplay { wave } => sink.on_wave_display(wave),
        GameEvent::StarsDisplay { count } => sink.on_stars_display(count),
        GameEvent::HealthDisplay { current, max } => sink.on_health_display(current, max),
        GameEvent::ScoreDisplay { score } => sink.on_score_display(score),
        GameEvent::MultiplierDisplay { multiplier } => sink.on_multiplier_display(multiplier),
        GameEvent::Sound(_) | GameEvent::PlayerDied { .. } => {}
    }
}
