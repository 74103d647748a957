//! Session state
//!
//! Everything that changes while the minigame runs lives here and is
//! mutated only by the engine.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::firefly::Firefly;
use super::net::NetCast;
use super::respawn::RespawnQueue;
use crate::settings::GameConfig;

/// Complete minigame state (deterministic for a given seed)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Fixed-size batch for the session, in creation order
    pub fireflies: Vec<Firefly>,
    /// Captures this session
    pub captured_count: u32,
    /// Whether the frame loop is running
    pub active: bool,
    /// Bumped on every start; stale respawns compare against it
    pub session: u32,
    /// Frames run this session
    pub time_ticks: u64,
    /// Document extent from the latest measurement
    pub bounds: Vec2,
    pub net: NetCast,
    pub respawns: RespawnQueue,
}

impl GameState {
    /// Create an inactive state with no fireflies
    pub fn new(seed: u64, config: &GameConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fireflies: Vec::new(),
            captured_count: 0,
            active: false,
            session: 0,
            time_ticks: 0,
            bounds: Vec2::ZERO,
            net: NetCast::new(&config.net),
            respawns: RespawnQueue::new(),
        }
    }

    /// Begin a new session: fresh batch, zeroed counters
    pub fn begin_session(&mut self, bounds: Vec2, config: &GameConfig) {
        self.session = self.session.wrapping_add(1);
        self.bounds = bounds;
        self.captured_count = 0;
        self.time_ticks = 0;
        self.net.reset();
        self.fireflies = (0..config.firefly_count)
            .map(|id| Firefly::spawn(id as u32, bounds, &config.firefly, &mut self.rng))
            .collect();
        self.active = true;
    }

    /// End the session. Fireflies stay in memory, dormant.
    pub fn end_session(&mut self) {
        self.active = false;
    }

    /// Fireflies currently in play
    pub fn free_count(&self) -> usize {
        self.fireflies.iter().filter(|f| !f.captured).count()
    }

    /// Reset every captured firefly whose respawn is due.
    ///
    /// Safe at any time, including after `end_session`: it only touches
    /// dormant state and never changes `active`. Returns the ids reset.
    pub fn apply_due_respawns(&mut self, now_ms: f64, config: &GameConfig) -> Vec<u32> {
        let mut reset = Vec::new();
        for task in self.respawns.take_due(now_ms) {
            if task.session != self.session {
                log::debug!("Dropping respawn from session {}", task.session);
                continue;
            }
            let Some(fly) = self.fireflies.get_mut(task.index) else {
                continue;
            };
            if fly.captured {
                fly.reset(self.bounds, &config.firefly, &mut self.rng);
                reset.push(fly.id);
            }
        }
        reset
    }
}
