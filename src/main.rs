//! Firefly Catch entry point
//!
//! In the browser this wires the toggle button, the overlay canvas and the
//! frame loop. Natively it plays a short headless session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlImageElement, MouseEvent};

    use firefly_catch::assets::{AssetLibrary, HtmlImageLoader};
    use firefly_catch::audio::{AudioCues, HtmlAudioBackend};
    use firefly_catch::consts::IMAGE_DIR;
    use firefly_catch::error::EngineError;
    use firefly_catch::platform::web::{BrowserPage, PerformanceClock};
    use firefly_catch::renderer::CanvasSurface;
    use firefly_catch::{ActivationController, ActivationPhase, FireflyGame, GameConfig, ToggleCommand};

    const CANVAS_ID: &str = "firefly-game-canvas";
    const TOGGLE_ID: &str = "firefly-toggle-btn";
    const ICON_START_ID: &str = "btn-icon-start";
    const ICON_CLOSE_ID: &str = "btn-icon-close";
    const TOOLTIP_ID: &str = "tooltip-text";

    const TOOLTIP_START: &str = "Start active break";
    const TOOLTIP_STOP: &str = "Stop active break";
    const ICON_HOVER: &str = "Button_SiInteractua.png";
    const ICON_IDLE: &str = "Button_NoInteractua.png";

    struct App {
        controller: ActivationController<CanvasSurface>,
        /// Pending requestAnimationFrame handle
        frame_id: Option<i32>,
    }

    type SharedApp = Rc<RefCell<App>>;

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Firefly Catch starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("Firefly game disabled: {}", EngineError::NoWindow);
            return;
        };

        let surface = match CanvasSurface::from_element_id(CANVAS_ID) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Firefly game disabled: {e}");
                return;
            }
        };
        for id in [TOGGLE_ID, ICON_START_ID, ICON_CLOSE_ID] {
            if document.get_element_by_id(id).is_none() {
                log::error!("Firefly game disabled: missing #{id}");
                return;
            }
        }

        let config = GameConfig::load();
        let audio = AudioCues::new(
            Box::new(HtmlAudioBackend::new(&config.assets)),
            config.volumes,
        );
        let seed = js_sys::Date::now() as u64;
        let engine = FireflyGame::new(
            config,
            surface,
            audio,
            Box::new(BrowserPage),
            Box::new(PerformanceClock),
            seed,
        );
        let canvas = engine.surface().canvas().clone();

        let app = Rc::new(RefCell::new(App {
            controller: ActivationController::new(engine),
            frame_id: None,
        }));

        // Size the overlay once up front
        app.borrow_mut().controller.engine_mut().on_resize();

        setup_toggle_button(&document, app.clone());
        setup_hover_icon(&document, app.clone());
        setup_canvas_click(&canvas, app.clone());
        setup_resize(app);

        log::info!("Firefly Catch ready (seed {seed})");
    }

    fn setup_toggle_button(document: &Document, app: SharedApp) {
        let Some(btn) = document.get_element_by_id(TOGGLE_ID) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let command = app.borrow_mut().controller.toggle();
            match command {
                ToggleCommand::Start => {
                    set_ui_active(true);
                    let manifest = app.borrow().controller.engine().config().assets.clone();
                    let app = app.clone();
                    // Load outside any borrow so clicks stay responsive
                    wasm_bindgen_futures::spawn_local(async move {
                        let assets = AssetLibrary::load(&HtmlImageLoader, &manifest).await;
                        let started = app.borrow_mut().controller.finish_start(assets);
                        if started {
                            request_frame(app);
                        }
                    });
                }
                ToggleCommand::Stopped => {
                    cancel_frame(&app);
                    set_ui_active(false);
                }
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_hover_icon(document: &Document, app: SharedApp) {
        let Some(btn) = document.get_element_by_id(TOGGLE_ID) else {
            return;
        };
        let Some(icon) = document
            .get_element_by_id(ICON_START_ID)
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
        else {
            return;
        };

        {
            let app = app.clone();
            let icon = icon.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if app.borrow().controller.phase() == ActivationPhase::Inactive {
                    icon.set_src(&format!("{IMAGE_DIR}{ICON_HOVER}"));
                    set_tooltip(TOOLTIP_START);
                }
            });
            let _ = btn.add_event_listener_with_callback("mouseenter", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if app.borrow().controller.phase() == ActivationPhase::Inactive {
                    icon.set_src(&format!("{IMAGE_DIR}{ICON_IDLE}"));
                }
            });
            let _ = btn.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_canvas_click(canvas: &HtmlCanvasElement, app: SharedApp) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let mut app = app.borrow_mut();
            if app.controller.is_active() {
                app.controller
                    .engine_mut()
                    .on_pointer_click(event.client_x() as f32, event.client_y() as f32);
            }
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(app: SharedApp) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().controller.engine_mut().on_resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_frame(app: SharedApp) {
        let Some(window) = web_sys::window() else {
            return;
        };
        // One loop at a time
        if app.borrow().frame_id.is_some() {
            return;
        }
        let next = app.clone();
        let closure = Closure::once(move |_time: f64| {
            frame_loop(next);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => app.borrow_mut().frame_id = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
        }
        closure.forget();
    }

    fn cancel_frame(app: &SharedApp) {
        let Some(id) = app.borrow_mut().frame_id.take() else {
            return;
        };
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(id);
        }
    }

    fn frame_loop(app: SharedApp) {
        let running = {
            let mut app = app.borrow_mut();
            app.frame_id = None;
            app.controller.engine_mut().frame()
        };
        if running {
            request_frame(app);
        }
    }

    /// Reflect the toggle state in the page chrome
    fn set_ui_active(active: bool) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        set_class(&document, CANVAS_ID, "active", active);
        set_class(&document, TOGGLE_ID, "active", active);
        set_class(&document, ICON_START_ID, "hidden", active);
        set_class(&document, ICON_CLOSE_ID, "hidden", !active);
        if let Some(body) = document.body() {
            let _ = body.class_list().toggle_with_force("crosshair-cursor", active);
        }
        set_tooltip(if active { TOOLTIP_STOP } else { TOOLTIP_START });
    }

    fn set_class(document: &Document, id: &str, class: &str, on: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }

    fn set_tooltip(text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(TOOLTIP_ID))
        {
            el.set_text_content(Some(text));
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Firefly Catch (native) starting...");
    log::info!("Native mode runs a headless session - build for wasm32 to play in the browser");

    run_headless_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a scripted session against a recording surface: scroll to a free
/// firefly, click it, let the respawn timer run.
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_session() {
    use firefly_catch::assets::AssetLibrary;
    use firefly_catch::audio::AudioCues;
    use firefly_catch::platform::{FixedPage, ManualClock, Page};
    use firefly_catch::renderer::RecordingSurface;
    use firefly_catch::{ActivationController, FireflyGame, GameConfig};
    use glam::Vec2;

    const FRAMES: u32 = 180;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const CLICK_EVERY: u32 = 15;

    let page = FixedPage::sized(Vec2::new(1280.0, 720.0), 2400.0);
    let clock = ManualClock::new();
    let engine = FireflyGame::new(
        GameConfig::default(),
        RecordingSurface::new(),
        AudioCues::disabled(),
        Box::new(page.clone()),
        Box::new(clock.clone()),
        42,
    );
    let mut controller = ActivationController::new(engine);
    controller.toggle();
    controller.finish_start(AssetLibrary::empty());

    let mut clicks = 0;
    for frame in 0..FRAMES {
        clock.advance(FRAME_MS);

        if frame % CLICK_EVERY == 0 {
            let target = controller
                .engine()
                .state()
                .fireflies
                .iter()
                .find(|f| !f.captured)
                .map(|f| f.pos);
            if let Some(pos) = target {
                let metrics = page.metrics();
                let max_scroll = (metrics.document_height - metrics.viewport_height).max(0.0);
                let scroll = (pos.y - metrics.viewport_height / 2.0).clamp(0.0, max_scroll);
                page.scroll_to(scroll);

                let caught = controller.engine_mut().on_pointer_click(pos.x, pos.y - scroll);
                clicks += 1;
                log::info!(
                    "Frame {frame}: click ({:.0}, {:.0}) at scroll {scroll:.0} -> {caught:?}",
                    pos.x,
                    pos.y - scroll
                );
            }
        }

        controller.engine_mut().frame();
    }

    let engine = controller.engine();
    println!(
        "\nHeadless session: {} clicks, {} caught, {} fireflies free, score {:?}",
        clicks,
        engine.captured_count(),
        engine.state().free_count(),
        engine.surface().last_text().unwrap_or("")
    );

    controller.toggle();
    println!("✓ Session stopped cleanly");
}
