//! Health models
//!
//! - [`PlayerHealth`]: a bar of discrete pips, removed rightmost-first
//! - [`Hull`]: a single counter for enemies and asteroids

use serde::{Deserialize, Serialize};

/// What a single `take_damage` call did to the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerDamage {
    /// Pips actually removed (less than requested when the bar runs out)
    pub pips_removed: u32,
    /// Low-health band entered for the first time this session
    pub low_health_warning: bool,
    /// Health reached zero on this call
    pub died: bool,
}

/// Player health bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerHealth {
    /// One entry per pip, `true` while present
    pips: Vec<bool>,
    current: u32,
    low_threshold: u32,
    low_warning_shown: bool,
    dead: bool,
}

impl PlayerHealth {
    pub fn new(max_health: u32, low_threshold: u32) -> Self {
        Self {
            pips: vec![true; max_health as usize],
            current: max_health,
            low_threshold,
            low_warning_shown: false,
            dead: max_health == 0,
        }
    }

    /// Remove `amount` pips from the highest surviving index downward
    pub fn take_damage(&mut self, amount: u32) -> PlayerDamage {
        let mut report = PlayerDamage::default();
        if self.dead {
            return report;
        }

        for _ in 0..amount {
            if self.current == 0 {
                break;
            }
            let index = (self.current - 1) as usize;
            self.pips[index] = false;
            self.current -= 1;
            report.pips_removed += 1;
        }

        if self.current > 0 && self.current <= self.low_threshold && !self.low_warning_shown {
            self.low_warning_shown = true;
            report.low_health_warning = true;
        }

        if self.current == 0 {
            self.dead = true;
            report.died = true;
        }

        report
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.pips.len() as u32
    }

    /// Pip states in display order (left to right)
    pub fn pips(&self) -> &[bool] {
        &self.pips
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn low_warning_shown(&self) -> bool {
        self.low_warning_shown
    }
}

/// Health counter of a destructible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hull {
    current: u32,
    max: u32,
    score_value: u32,
    destroyed: bool,
}

impl Hull {
    pub fn new(max_health: u32, score_value: u32) -> Self {
        Self {
            current: max_health,
            max: max_health,
            score_value,
            destroyed: false,
        }
    }

    /// Apply damage. Returns the score to award on the call that destroys
    /// the hull, `None` otherwise (including every call after destruction).
    pub fn take_damage(&mut self, amount: u32) -> Option<u32> {
        if self.destroyed {
            return None;
        }
        self.current = self.current.saturating_sub(amount);
        if self.current == 0 {
            self.destroyed = true;
            Some(self.score_value)
        } else {
            None
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max_health(&self) -> u32 {
        self.max
    }

    pub fn score_value(&self) -> u32 {
        self.score_value
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
