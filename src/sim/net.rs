//! Net cast gesture
//!
//! A tick-driven swing: Idle -> Launching -> Returning -> Idle. Purely
//! presentational; capture resolution never reads the swing offset.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use crate::settings::NetTuning;

/// Phase of the net swing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetPhase {
    #[default]
    Idle,
    /// Swinging out over `duration` ticks
    Launching,
    /// Swinging back over `duration` ticks
    Returning,
}

/// The net gesture state machine
#[derive(Debug, Clone, PartialEq)]
pub struct NetCast {
    pub phase: NetPhase,
    /// Viewport-space point the gesture was triggered at
    pub anchor: Vec2,
    /// Ticks spent in the current non-idle phase
    pub elapsed: u32,
    /// Horizontal swing offset (px, negative = left)
    pub offset_x: f32,
    duration: u32,
    reach: f32,
}

impl NetCast {
    pub fn new(tuning: &NetTuning) -> Self {
        Self {
            phase: NetPhase::Idle,
            anchor: Vec2::ZERO,
            elapsed: 0,
            offset_x: 0.0,
            duration: tuning.duration_ticks.max(1),
            reach: tuning.reach,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == NetPhase::Idle
    }

    /// Ticks per phase
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Start a swing at `anchor`. Ignored (returns false) unless idle.
    pub fn trigger(&mut self, anchor: Vec2) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.phase = NetPhase::Launching;
        self.elapsed = 0;
        self.anchor = anchor;
        true
    }

    /// Advance the swing by one tick
    pub fn advance(&mut self) {
        if self.is_idle() {
            self.offset_x = 0.0;
            return;
        }

        self.elapsed += 1;
        let progress = self.elapsed as f32 / self.duration as f32;
        let ease = (progress * FRAC_PI_2).sin();

        match self.phase {
            NetPhase::Launching => {
                self.offset_x = -self.reach * ease;
                if self.elapsed >= self.duration {
                    self.phase = NetPhase::Returning;
                    self.elapsed = 0;
                }
            }
            NetPhase::Returning => {
                self.offset_x = -self.reach * (1.0 - ease);
                if self.elapsed >= self.duration {
                    self.phase = NetPhase::Idle;
                    self.elapsed = 0;
                    self.offset_x = 0.0;
                }
            }
            NetPhase::Idle => {}
        }
    }

    /// Drop any swing in flight (new session)
    pub fn reset(&mut self) {
        self.phase = NetPhase::Idle;
        self.elapsed = 0;
        self.offset_x = 0.0;
    }
}
