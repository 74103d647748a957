//! Browser page geometry and clock

use wasm_bindgen::JsCast;

use super::{Clock, Page, PageMetrics};

/// Reads geometry from `window` and `document` on every call
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserPage;

impl BrowserPage {
    /// Full scrollable height of the document
    fn document_height(document: &web_sys::Document) -> f64 {
        let mut height = 0i32;
        if let Some(body) = document.body() {
            height = height.max(body.scroll_height()).max(body.offset_height());
        }
        if let Some(html) = document.document_element() {
            height = height.max(html.client_height()).max(html.scroll_height());
            if let Ok(el) = html.dyn_into::<web_sys::HtmlElement>() {
                height = height.max(el.offset_height());
            }
        }
        height as f64
    }
}

impl Page for BrowserPage {
    fn metrics(&self) -> PageMetrics {
        let Some(window) = web_sys::window() else {
            return PageMetrics::default();
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let scroll_y = window.scroll_y().unwrap_or(0.0);
        let document_height = window
            .document()
            .map(|d| Self::document_height(&d))
            .unwrap_or(height);

        PageMetrics {
            viewport_width: width as f32,
            viewport_height: height as f32,
            scroll_y: scroll_y as f32,
            document_width: width as f32,
            document_height: document_height.max(height) as f32,
        }
    }
}

/// `performance.now()`
#[derive(Debug, Default, Clone, Copy)]
pub struct PerformanceClock;

impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }
}
