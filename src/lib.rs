//! Firefly Catch - a "catch the firefly" minigame over a scrolling page
//!
//! Core modules:
//! - `sim`: Deterministic simulation (fireflies, net gesture, respawn queue)
//! - `engine`: Session lifecycle, per-frame loop, click resolution
//! - `renderer`: 2D drawing onto a `Surface` (canvas or recording)
//! - `assets` / `audio`: Best-effort images and fire-and-forget sound cues
//! - `controller`: On/off toggle that owns the engine
//! - `platform`: Page geometry and clock abstraction
//! - `settings`: Data-driven configuration

pub mod assets;
pub mod audio;
pub mod controller;
pub mod engine;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use controller::{ActivationController, ActivationPhase, ToggleCommand};
pub use engine::FireflyGame;
pub use settings::GameConfig;

use glam::Vec2;

/// Game configuration defaults
pub mod consts {
    /// Fireflies per session
    pub const FIREFLY_COUNT: usize = 25;
    /// Upper bound accepted from config (keeps per-frame work small)
    pub const MAX_FIREFLIES: usize = 200;
    pub const FIREFLY_RADIUS: f32 = 30.0;
    pub const FIREFLY_SIZE: f32 = 60.0;
    pub const FIREFLY_SPEED: f32 = 1.5;

    /// Flicker rate range (radians per tick)
    pub const FLICKER_RATE_MIN: f32 = 0.01;
    pub const FLICKER_RATE_SPAN: f32 = 0.05;
    /// Opacity = BASE + AMPLITUDE * sin(phase)
    pub const FLICKER_BASE: f32 = 0.65;
    pub const FLICKER_AMPLITUDE: f32 = 0.35;

    /// Extra click reach beyond a firefly's radius
    pub const CAPTURE_RADIUS: f32 = 50.0;
    pub const RESPAWN_DELAY_MS: f64 = 500.0;

    /// Net gesture
    pub const NET_DURATION_TICKS: u32 = 10;
    pub const NET_REACH: f32 = 150.0;
    pub const NET_SIZE: f32 = 500.0;

    /// Cue volumes
    pub const AMBIENT_VOLUME: f32 = 0.8;
    pub const ACTION_VOLUME: f32 = 1.0;
    pub const REWARD_VOLUME: f32 = 0.1;

    /// Asset locations relative to the page
    pub const IMAGE_DIR: &str = "./Assets/Imagenes/";
    pub const AUDIO_DIR: &str = "./Assets/Audios/";
}

/// Clamp a coordinate so a circle of `radius` stays inside `[0, extent]`.
/// An extent too small to hold the circle pins it to the middle.
#[inline]
pub fn clamp_inside(value: f32, radius: f32, extent: f32) -> f32 {
    if extent <= radius * 2.0 {
        extent / 2.0
    } else {
        value.clamp(radius, extent - radius)
    }
}

/// Convert a viewport point to document space
#[inline]
pub fn viewport_to_document(point: Vec2, scroll_y: f32) -> Vec2 {
    Vec2::new(point.x, point.y + scroll_y)
}

/// Convert a document point to viewport space
#[inline]
pub fn document_to_viewport(point: Vec2, scroll_y: f32) -> Vec2 {
    Vec2::new(point.x, point.y - scroll_y)
}
