//! Per-frame simulation step and click resolution
//!
//! Pure functions over `GameState`. Sound and drawing are the caller's job;
//! these only report what happened.

use glam::Vec2;

use super::state::GameState;
use crate::settings::GameConfig;
use crate::viewport_to_document;

/// External signals for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Clock time (ms)
    pub now_ms: f64,
    /// Document extent measured this frame
    pub bounds: Vec2,
}

/// What a frame changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Fireflies that came back into play
    pub respawned: Vec<u32>,
}

/// What a click did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickOutcome {
    /// A new net swing started (false if one was already in flight)
    pub net_cast: bool,
    /// Id of the firefly caught, if any
    pub captured: Option<u32>,
}

/// Advance the state by one frame
pub fn tick(state: &mut GameState, input: &FrameInput, config: &GameConfig) -> FrameReport {
    if !state.active {
        return FrameReport::default();
    }

    state.time_ticks += 1;
    state.bounds = input.bounds;
    state.net.advance();

    let respawned = state.apply_due_respawns(input.now_ms, config);

    for fly in &mut state.fireflies {
        fly.update(input.bounds);
    }

    FrameReport { respawned }
}

/// Capture the first free firefly within reach of a document-space point.
///
/// At most one firefly is caught; creation order breaks ties.
pub fn resolve_capture(state: &mut GameState, point: Vec2, capture_radius: f32) -> Option<usize> {
    let index = state
        .fireflies
        .iter()
        .position(|f| !f.captured && f.within_reach(point, capture_radius))?;
    state.fireflies[index].capture();
    state.captured_count += 1;
    Some(index)
}

/// Handle a click at viewport coordinates
pub fn click(
    state: &mut GameState,
    client: Vec2,
    scroll_y: f32,
    now_ms: f64,
    config: &GameConfig,
) -> ClickOutcome {
    if !state.active {
        return ClickOutcome::default();
    }

    // The net is drawn over the fixed viewport, so it keeps client coords
    let net_cast = state.net.trigger(client);

    let point = viewport_to_document(client, scroll_y);
    let captured = resolve_capture(state, point, config.capture_radius).map(|index| {
        let due = now_ms + config.respawn_delay_ms;
        state.respawns.schedule(due, index, state.session);
        state.fireflies[index].id
    });

    ClickOutcome { net_cast, captured }
}
