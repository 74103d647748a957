//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Page geometry (viewport, scroll offset, document extent)
//! - Time (virtual clock for respawn scheduling)

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// One measurement of the page, taken once per frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageMetrics {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Vertical scroll offset of the viewport into the document
    pub scroll_y: f32,
    pub document_width: f32,
    pub document_height: f32,
}

impl PageMetrics {
    /// Document extent, the bounds fireflies live in
    pub fn document_bounds(&self) -> Vec2 {
        Vec2::new(self.document_width, self.document_height)
    }
}

/// Source of page geometry
pub trait Page {
    fn metrics(&self) -> PageMetrics;
}

/// Monotonic millisecond clock
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Page with geometry set by hand (headless runs and tests).
/// Clones share the same metrics.
#[derive(Debug, Clone, Default)]
pub struct FixedPage {
    metrics: Rc<Cell<PageMetrics>>,
}

impl FixedPage {
    pub fn new(metrics: PageMetrics) -> Self {
        Self {
            metrics: Rc::new(Cell::new(metrics)),
        }
    }

    /// A page whose document is as wide as the viewport
    pub fn sized(viewport: Vec2, document_height: f32) -> Self {
        Self::new(PageMetrics {
            viewport_width: viewport.x,
            viewport_height: viewport.y,
            scroll_y: 0.0,
            document_width: viewport.x,
            document_height,
        })
    }

    pub fn set(&self, metrics: PageMetrics) {
        self.metrics.set(metrics);
    }

    pub fn scroll_to(&self, scroll_y: f32) {
        let mut m = self.metrics.get();
        m.scroll_y = scroll_y;
        self.metrics.set(m);
    }
}

impl Page for FixedPage {
    fn metrics(&self) -> PageMetrics {
        self.metrics.get()
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_page_clones_share_state() {
        let page = FixedPage::sized(Vec2::new(800.0, 600.0), 2400.0);
        let handle = page.clone();
        handle.scroll_to(300.0);
        assert_eq!(page.metrics().scroll_y, 300.0);
        assert_eq!(page.metrics().document_bounds(), Vec2::new(800.0, 2400.0));
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new();
        let shared = clock.clone();
        clock.advance(16.0);
        clock.advance(16.0);
        assert_eq!(shared.now_ms(), 32.0);
        shared.set(1000.0);
        assert_eq!(clock.now_ms(), 1000.0);
    }
}
