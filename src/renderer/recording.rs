//! Headless surface that records draw calls
//!
//! Used by the native binary and by tests to inspect what a frame drew.

use glam::Vec2;

use super::{Rgba, Surface};
use crate::assets::Sprite;

/// Image stand-in with a fixed decode state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubSprite {
    pub decoded: bool,
}

impl StubSprite {
    pub fn ready() -> Self {
        Self { decoded: true }
    }

    pub fn loading() -> Self {
        Self { decoded: false }
    }
}

impl Sprite for StubSprite {
    fn is_ready(&self) -> bool {
        self.decoded
    }
}

/// One recorded draw call (colors and fonts omitted)
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Glow { blur: f32, alpha: f32 },
    ResetGlow,
    Image { pos: Vec2, size: Vec2 },
    FillCircle { center: Vec2, radius: f32 },
    StrokeCircle { center: Vec2, radius: f32 },
    Text { text: String, pos: Vec2 },
}

/// Surface that keeps the commands of the current frame
#[derive(Debug, Default)]
pub struct RecordingSurface {
    size: Vec2,
    commands: Vec<DrawCommand>,
    /// Frames cleared so far
    pub clears: u32,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed-pitch text metric: 12px per char
    pub fn text_width(text: &str) -> f32 {
        text.chars().count() as f32 * 12.0
    }

    /// Commands since the last clear
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn count_circles(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count()
    }

    pub fn count_images(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Image { .. }))
            .count()
    }

    /// Text of the last text command
    pub fn last_text(&self) -> Option<&str> {
        self.commands.iter().rev().find_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for RecordingSurface {
    type Image = StubSprite;

    fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width.max(0.0), height.max(0.0));
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn set_glow(&mut self, blur: f32, _color: Rgba, alpha: f32) {
        self.commands.push(DrawCommand::Glow { blur, alpha });
    }

    fn reset_glow(&mut self) {
        self.commands.push(DrawCommand::ResetGlow);
    }

    fn draw_image(&mut self, _image: &StubSprite, pos: Vec2, size: Vec2) {
        self.commands.push(DrawCommand::Image { pos, size });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, _color: Rgba) {
        self.commands.push(DrawCommand::FillCircle { center, radius });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, _width: f32, _color: Rgba) {
        self.commands.push(DrawCommand::StrokeCircle { center, radius });
    }

    fn measure_text(&mut self, text: &str, _font: &str) -> f32 {
        Self::text_width(text)
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, _font: &str, _color: Rgba) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
        });
    }
}
