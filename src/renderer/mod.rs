//! 2D rendering module
//!
//! Draws one frame of the minigame onto any `Surface`. Fireflies are
//! converted from document to viewport space here; the net and the score
//! are already in viewport space.

pub mod recording;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use recording::{DrawCommand, RecordingSurface, StubSprite};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use glam::Vec2;

use crate::assets::{AssetLibrary, ImageKey, Sprite};
use crate::settings::GameConfig;
use crate::sim::{Firefly, GameState, NetCast};

/// Straight RGBA color, components 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba(pub f32, pub f32, pub f32, pub f32);

impl Rgba {
    pub fn with_alpha(self, alpha: f32) -> Self {
        Rgba(self.0, self.1, self.2, alpha)
    }

    /// CSS `rgba(...)` string
    pub fn to_css(self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            (self.0 * 255.0).round() as u8,
            (self.1 * 255.0).round() as u8,
            (self.2 * 255.0).round() as u8,
            self.3
        )
    }
}

/// Firefly body when the sprite is unavailable
pub const FIREFLY_COLOR: Rgba = Rgba(1.0, 1.0, 100.0 / 255.0, 1.0);
/// Glow around fireflies
pub const GLOW_COLOR: Rgba = Rgba(1.0, 1.0, 150.0 / 255.0, 1.0);
/// Net outline when the net sprite is unavailable
pub const NET_FALLBACK_COLOR: Rgba = Rgba(1.0, 1.0, 1.0, 0.7);
pub const SCORE_COLOR: Rgba = Rgba(1.0, 1.0, 1.0, 0.9);
pub const SCORE_SHADOW: Rgba = Rgba(0.0, 0.0, 0.0, 1.0);
pub const SCORE_FONT: &str = "24px Inter";
/// Score baseline from the top of the viewport
pub const SCORE_TOP: f32 = 40.0;
/// Score gap from the right edge of the viewport
pub const SCORE_RIGHT_MARGIN: f32 = 30.0;

/// A 2D drawing target sized to the viewport
pub trait Surface {
    type Image: Sprite;

    /// Resize the backing store (viewport px)
    fn resize(&mut self, width: f32, height: f32);
    fn size(&self) -> Vec2;
    fn clear(&mut self);

    /// Shadow glow and global alpha for following draws
    fn set_glow(&mut self, blur: f32, color: Rgba, alpha: f32);
    fn reset_glow(&mut self);

    /// Draw `image` with its top-left corner at `pos`
    fn draw_image(&mut self, image: &Self::Image, pos: Vec2, size: Vec2);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);

    fn measure_text(&mut self, text: &str, font: &str) -> f32;
    fn fill_text(&mut self, text: &str, pos: Vec2, font: &str, color: Rgba);
}

/// Draw one firefly. Captured or off-screen fireflies draw nothing.
pub fn draw_firefly<S: Surface>(
    surface: &mut S,
    fly: &Firefly,
    sprite: Option<&S::Image>,
    scroll_y: f32,
) {
    if fly.captured {
        return;
    }
    let viewport_height = surface.size().y;
    if !fly.is_visible(scroll_y, viewport_height) {
        return;
    }

    let center = Vec2::new(fly.pos.x, fly.viewport_y(scroll_y));
    let flicker = fly.opacity();
    surface.set_glow(flicker * 10.0 + 5.0, GLOW_COLOR.with_alpha(flicker), flicker);

    match sprite.filter(|s| s.is_ready()) {
        Some(image) => {
            let size = Vec2::splat(fly.size);
            surface.draw_image(image, center - size / 2.0, size);
        }
        None => surface.fill_circle(center, fly.radius, FIREFLY_COLOR),
    }

    surface.reset_glow();
}

/// Draw the net swing over the viewport. Idle nets draw nothing.
pub fn draw_net<S: Surface>(
    surface: &mut S,
    net: &NetCast,
    sprite: Option<&S::Image>,
    config: &GameConfig,
) {
    if net.is_idle() {
        return;
    }
    let center = net.anchor + Vec2::new(net.offset_x, 0.0);

    match sprite.filter(|s| s.is_ready()) {
        Some(image) => {
            let size = Vec2::splat(config.net.size);
            surface.draw_image(image, center - size / 2.0, size);
        }
        None => surface.stroke_circle(center, config.capture_radius, 3.0, NET_FALLBACK_COLOR),
    }
}

/// Draw the running capture count in the top-right corner
pub fn draw_score<S: Surface>(surface: &mut S, captured: u32, label: &str) {
    let text = format!("{label}: {captured}");
    let width = surface.measure_text(&text, SCORE_FONT);
    let x = surface.size().x - width - SCORE_RIGHT_MARGIN;

    surface.set_glow(4.0, SCORE_SHADOW, 1.0);
    surface.fill_text(&text, Vec2::new(x, SCORE_TOP), SCORE_FONT, SCORE_COLOR);
    surface.reset_glow();
}

/// Draw a whole frame
pub fn draw_frame<S: Surface>(
    surface: &mut S,
    state: &GameState,
    assets: &AssetLibrary<S::Image>,
    scroll_y: f32,
    config: &GameConfig,
) {
    surface.clear();

    let firefly = assets.get(ImageKey::Firefly);
    for fly in &state.fireflies {
        draw_firefly(surface, fly, firefly, scroll_y);
    }

    draw_net(surface, &state.net, assets.get(ImageKey::Net), config);
    draw_score(surface, state.captured_count, &config.score_label);
}
