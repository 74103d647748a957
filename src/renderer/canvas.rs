//! Canvas 2D surface

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Rgba, Surface};
use crate::error::EngineError;

/// A fixed, viewport-sized `<canvas>` with its 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up the canvas by id and grab its 2D context
    pub fn from_element_id(id: &str) -> Result<Self, EngineError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(EngineError::NoWindow)?;
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| EngineError::MissingCanvas(id.to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| EngineError::NotACanvas(id.to_string()))?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(EngineError::ContextUnavailable)?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn resize(&mut self, width: f32, height: f32) {
        self.canvas.set_width(width.max(1.0) as u32);
        self.canvas.set_height(height.max(1.0) as u32);
    }

    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn set_glow(&mut self, blur: f32, color: Rgba, alpha: f32) {
        self.ctx.set_shadow_blur(blur as f64);
        self.ctx.set_shadow_color(&color.to_css());
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn reset_glow(&mut self) {
        self.ctx.set_global_alpha(1.0);
        self.ctx.set_shadow_blur(0.0);
    }

    fn draw_image(&mut self, image: &HtmlImageElement, pos: Vec2, size: Vec2) {
        let _ = self
            .ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                image,
                pos.x as f64,
                pos.y as f64,
                size.x as f64,
                size.y as f64,
            );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.stroke();
    }

    fn measure_text(&mut self, text: &str, font: &str) -> f32 {
        self.ctx.set_font(font);
        self.ctx
            .measure_text(text)
            .map(|m| m.width() as f32)
            .unwrap_or(0.0)
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, font: &str, color: Rgba) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(&color.to_css());
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }
}
