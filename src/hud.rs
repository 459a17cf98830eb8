//! Presentation sink and HUD text formatting
//!
//! Rendering lives outside the crate. The simulation's notifications arrive
//! here through [`PresentationSink`]; [`TextHud`] keeps the text a HUD would
//! draw so a headless host (or a test) can inspect it.

use glam::Vec2;

/// Seconds a regular status message stays up
pub const STATUS_DURATION: f32 = 2.0;

/// Receiver of fire-and-forget display notifications
pub trait PresentationSink {
    fn on_score_popup(&mut self, amount: u64, pos: Vec2);
    fn on_status_message(&mut self, text: &str, duration: f32, permanent: bool, blinking: bool);
    fn on_wave_display(&mut self, wave: u32);
    fn on_stars_display(&mut self, count: u32);
    fn on_health_display(&mut self, current: u32, max: u32);
    fn on_score_display(&mut self, _score: u64) {}
    fn on_multiplier_display(&mut self, _multiplier: f32) {}
}

/// Score as eight zero-padded digits
pub fn format_score(score: u64) -> String {
    format!("{:08}", score)
}

/// Star count as three zero-padded digits
pub fn format_stars(stars: u32) -> String {
    format!("{:03}", stars)
}

/// Wave label, 1-based for players
pub fn format_wave(wave: u32) -> String {
    format!("WAVE - {}", wave + 1)
}

/// Multiplier with one decimal, e.g. `1.1X`
pub fn format_multiplier(multiplier: f32) -> String {
    format!("{:.1}X", multiplier)
}

/// Health bar with one glyph per pip
pub fn format_health(current: u32, max: u32) -> String {
    let current = current.min(max) as usize;
    let mut bar = "■".repeat(current);
    bar.push_str(&"□".repeat(max as usize - current));
    bar
}

/// A status line on screen
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub text: String,
    /// Seconds left (ignored when permanent)
    pub remaining: f32,
    pub permanent: bool,
    pub blinking: bool,
}

/// A floating score number
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub text: String,
    pub pos: Vec2,
    pub remaining: f32,
}

/// Headless HUD model
#[derive(Debug, Clone)]
pub struct TextHud {
    pub score: String,
    pub multiplier: String,
    pub wave: String,
    pub stars: String,
    pub health: String,
    pub status: Vec<StatusLine>,
    pub popups: Vec<Popup>,
}

impl Default for TextHud {
    fn default() -> Self {
        Self::new()
    }
}

impl TextHud {
    const POPUP_DURATION: f32 = 1.0;

    pub fn new() -> Self {
        Self {
            score: format_score(0),
            multiplier: format_multiplier(1.0),
            wave: format_wave(0),
            stars: format_stars(0),
            health: String::new(),
            status: Vec::new(),
            popups: Vec::new(),
        }
    }

    /// Expire timed status lines and popups
    pub fn update(&mut self, dt: f32) {
        for line in self.status.iter_mut().filter(|l| !l.permanent) {
            line.remaining -= dt;
        }
        self.status.retain(|l| l.permanent || l.remaining > 0.0);
        for popup in self.popups.iter_mut() {
            popup.remaining -= dt;
        }
        self.popups.retain(|p| p.remaining > 0.0);
    }
}

impl PresentationSink for TextHud {
    fn on_score_popup(&mut self, amount: u64, pos: Vec2) {
        self.popups.push(Popup {
            text: format!("+{}", amount),
            pos,
            remaining: Self::POPUP_DURATION,
        });
    }

    fn on_status_message(&mut self, text: &str, duration: f32, permanent: bool, blinking: bool) {
        log::info!("{}", text);
        self.status.push(StatusLine {
            text: text.to_string(),
            remaining: duration,
            permanent,
            blinking,
        });
    }

    fn on_wave_display(&mut self, wave: u32) {
        self.wave = format_wave(wave);
    }

    fn on_stars_display(&mut self, count: u32) {
        self.stars = format_stars(count);
    }

    fn on_health_display(&mut self, current: u32, max: u32) {
        self.health = format_health(current, max);
    }

    fn on_score_display(&mut self, score: u64) {
        self.score = format_score(score);
    }

    fn on_multiplier_display(&mut self, multiplier: f32) {
        self.multiplier = format_multiplier(multiplier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting() {
        assert_eq!(format_score(130), "00000130");
        assert_eq!(format_stars(7), "007");
        assert_eq!(format_wave(0), "WAVE - 1");
        assert_eq!(format_multiplier(1.1), "1.1X");
        assert_eq!(format_health(3, 5), "■■■□□");
        assert_eq!(format_health(9, 2), "■■");
    }

    #[test]
    fn test_status_expiry() {
        let mut hud = TextHud::new();
        hud.on_status_message("Multiplier increased to 1.1X!", STATUS_DURATION, false, false);
        hud.on_status_message("LOW HEALTH!", 0.0, true, true);
        hud.on_score_popup(75, Vec2::new(4.0, 5.0));
        hud.update(1.5);
        assert_eq!(hud.status.len(), 2);
        assert!(hud.popups.is_empty());
        hud.update(1.0);
        assert_eq!(hud.status.len(), 1);
        assert_eq!(hud.status[0].text, "LOW HEALTH!");
        assert!(hud.status[0].blinking);
    }
}
