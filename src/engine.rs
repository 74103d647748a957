//! Minigame engine
//!
//! Owns the session state and every collaborator, and exposes the
//! lifecycle the page drives: start, stop, resize, click and one call per
//! animation frame.

use glam::Vec2;

use crate::assets::{AssetLibrary, ImageLoader};
use crate::audio::AudioCues;
use crate::platform::{Clock, Page};
use crate::renderer::{Surface, draw_frame};
use crate::settings::GameConfig;
use crate::sim::{FrameInput, GameState, click, tick};

/// The firefly minigame
pub struct FireflyGame<S: Surface> {
    config: GameConfig,
    state: GameState,
    assets: AssetLibrary<S::Image>,
    audio: AudioCues,
    surface: S,
    page: Box<dyn Page>,
    clock: Box<dyn Clock>,
}

impl<S: Surface> FireflyGame<S> {
    pub fn new(
        config: GameConfig,
        surface: S,
        mut audio: AudioCues,
        page: Box<dyn Page>,
        clock: Box<dyn Clock>,
        seed: u64,
    ) -> Self {
        audio.set_volumes(config.volumes);
        audio.set_muted(config.muted);
        Self {
            state: GameState::new(seed, &config),
            config,
            assets: AssetLibrary::empty(),
            audio,
            surface,
            page,
            clock,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn assets(&self) -> &AssetLibrary<S::Image> {
        &self.assets
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn captured_count(&self) -> u32 {
        self.state.captured_count
    }

    /// Preload assets, then start a session. No-op while active.
    pub async fn start<L>(&mut self, loader: &L)
    where
        L: ImageLoader<Image = S::Image>,
    {
        if self.state.active {
            return;
        }
        let assets = AssetLibrary::load(loader, &self.config.assets).await;
        self.start_with_assets(assets);
    }

    /// Start a session with already-settled assets. No-op while active.
    pub fn start_with_assets(&mut self, assets: AssetLibrary<S::Image>) {
        if self.state.active {
            return;
        }
        self.assets = assets;

        let metrics = self.page.metrics();
        self.surface
            .resize(metrics.viewport_width, metrics.viewport_height);
        self.state
            .begin_session(metrics.document_bounds(), &self.config);
        self.audio.play_ambient_loop();

        log::info!(
            "Firefly session {} started with {} fireflies (seed {})",
            self.state.session,
            self.state.fireflies.len(),
            self.state.seed
        );
    }

    /// End the session. No-op while inactive.
    pub fn stop(&mut self) {
        if !self.state.active {
            return;
        }
        self.state.end_session();
        self.audio.stop_ambient_loop();
        self.surface.clear();
        log::info!(
            "Firefly session {} stopped after {} captures",
            self.state.session,
            self.state.captured_count
        );
    }

    /// Follow a viewport resize. Firefly positions are left alone.
    pub fn on_resize(&mut self) {
        let metrics = self.page.metrics();
        self.surface
            .resize(metrics.viewport_width, metrics.viewport_height);
        self.state.bounds = metrics.document_bounds();
    }

    /// Handle a click at viewport (client) coordinates. Returns the id of
    /// the firefly caught, if any.
    pub fn on_pointer_click(&mut self, client_x: f32, client_y: f32) -> Option<u32> {
        if !self.state.active {
            return None;
        }
        let scroll_y = self.page.metrics().scroll_y;
        let now = self.clock.now_ms();
        let outcome = click(
            &mut self.state,
            Vec2::new(client_x, client_y),
            scroll_y,
            now,
            &self.config,
        );

        if outcome.net_cast {
            self.audio.play_action();
        }
        if let Some(id) = outcome.captured {
            self.audio.play_reward();
            log::debug!("Caught firefly {id} ({} total)", self.state.captured_count);
        }
        outcome.captured
    }

    /// Respawn captured fireflies whose delay has passed. Safe to call at
    /// any time; after `stop` it only updates dormant state.
    pub fn apply_due_respawns(&mut self) -> Vec<u32> {
        let now = self.clock.now_ms();
        self.state.apply_due_respawns(now, &self.config)
    }

    /// Run one animation frame. Returns whether another frame is wanted.
    pub fn frame(&mut self) -> bool {
        if !self.state.active {
            return false;
        }

        let metrics = self.page.metrics();
        let viewport = self.surface.size();
        if viewport != Vec2::new(metrics.viewport_width, metrics.viewport_height) {
            self.surface
                .resize(metrics.viewport_width, metrics.viewport_height);
        }

        let input = FrameInput {
            now_ms: self.clock.now_ms(),
            bounds: metrics.document_bounds(),
        };
        tick(&mut self.state, &input, &self.config);

        draw_frame(
            &mut self.surface,
            &self.state,
            &self.assets,
            metrics.scroll_y,
            &self.config,
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageKey;
    use crate::assets::tests::FakeLoader;
    use crate::audio::Cue;
    use crate::audio::tests::RecordingBackend;
    use crate::platform::{FixedPage, ManualClock};
    use crate::renderer::{DrawCommand, RecordingSurface, StubSprite};

    struct Harness {
        game: FireflyGame<RecordingSurface>,
        page: FixedPage,
        clock: ManualClock,
        audio: RecordingBackend,
    }

    fn harness(count: usize) -> Harness {
        let page = FixedPage::sized(Vec2::new(800.0, 600.0), 3000.0);
        let clock = ManualClock::new();
        let audio = RecordingBackend::default();
        let config = GameConfig {
            firefly_count: count,
            ..GameConfig::default()
        };
        let game = FireflyGame::new(
            config,
            RecordingSurface::new(),
            AudioCues::new(Box::new(audio.clone()), Default::default()),
            Box::new(page.clone()),
            Box::new(clock.clone()),
            1234,
        );
        Harness {
            game,
            page,
            clock,
            audio,
        }
    }

    fn played(h: &Harness, cue: Cue) -> usize {
        h.audio.played.borrow().iter().filter(|(c, _)| *c == cue).count()
    }

    #[test]
    fn test_start_preloads_and_activates() {
        let mut h = harness(10);
        let loader = FakeLoader::default();
        pollster::block_on(h.game.start(&loader));

        assert!(h.game.is_active());
        assert_eq!(h.game.state().fireflies.len(), 10);
        assert_eq!(h.game.surface().size(), Vec2::new(800.0, 600.0));
        assert!(h.game.assets().get(ImageKey::Firefly).is_some());
        assert_eq!(played(&h, Cue::Ambient), 1);
    }

    #[test]
    fn test_start_while_active_is_noop() {
        let mut h = harness(4);
        let loader = FakeLoader::default();
        pollster::block_on(h.game.start(&loader));
        let batch = h.game.state().fireflies.clone();

        pollster::block_on(h.game.start(&loader));
        assert_eq!(loader.begun.borrow().len(), 2);
        assert_eq!(h.game.state().fireflies, batch);
        assert_eq!(h.game.state().session, 1);
    }

    #[test]
    fn test_stop_clears_and_silences() {
        let mut h = harness(4);
        h.game.start_with_assets(AssetLibrary::empty());
        assert!(h.game.frame());

        assert_eq!(h.game.surface().clears, 1);

        h.game.stop();
        assert!(!h.game.is_active());
        assert!(h.game.surface().commands().is_empty());
        assert_eq!(h.game.surface().clears, 2);
        assert_eq!(*h.audio.halted.borrow(), vec![Cue::Ambient]);
        assert!(!h.game.frame());

        // Second stop does nothing
        h.game.stop();
        assert_eq!(h.audio.halted.borrow().len(), 1);
        assert_eq!(h.game.surface().clears, 2);
    }

    #[test]
    fn test_click_plays_cues() {
        let mut h = harness(1);
        h.game.start_with_assets(AssetLibrary::empty());
        let target = h.game.state().fireflies[0].pos;

        assert_eq!(h.game.on_pointer_click(target.x, target.y), Some(0));
        assert_eq!(played(&h, Cue::Action), 1);
        assert_eq!(played(&h, Cue::Reward), 1);

        // Net still swinging: no action cue, nothing left to catch
        assert_eq!(h.game.on_pointer_click(target.x, target.y), None);
        assert_eq!(played(&h, Cue::Action), 1);
        assert_eq!(played(&h, Cue::Reward), 1);
    }

    #[test]
    fn test_click_converts_scroll() {
        let mut h = harness(1);
        h.game.start_with_assets(AssetLibrary::empty());
        let target = h.game.state().fireflies[0].pos;
        h.page.scroll_to(target.y - 100.0);

        assert_eq!(h.game.on_pointer_click(target.x, 100.0), Some(0));
        assert_eq!(h.game.captured_count(), 1);
    }

    #[test]
    fn test_click_while_inactive_is_ignored() {
        let mut h = harness(1);
        assert_eq!(h.game.on_pointer_click(10.0, 10.0), None);
        assert!(h.audio.played.borrow().is_empty());
    }

    #[test]
    fn test_frame_respawns_on_clock() {
        let mut h = harness(1);
        h.game.start_with_assets(AssetLibrary::empty());
        let target = h.game.state().fireflies[0].pos;
        h.game.on_pointer_click(target.x, target.y);

        h.clock.advance(499.0);
        h.game.frame();
        assert!(h.game.state().fireflies[0].captured);

        h.clock.advance(1.0);
        h.game.frame();
        assert!(!h.game.state().fireflies[0].captured);
    }

    #[test]
    fn test_frame_draws_sprites_and_score() {
        let mut h = harness(3);
        let mut assets = AssetLibrary::empty();
        assets.insert(ImageKey::Firefly, StubSprite::ready());
        h.game.start_with_assets(assets);
        // Keep everything on screen
        h.page.set(crate::platform::PageMetrics {
            viewport_width: 800.0,
            viewport_height: 600.0,
            scroll_y: 0.0,
            document_width: 800.0,
            document_height: 600.0,
        });
        h.game.on_resize();
        for _ in 0..3 {
            h.game.frame();
        }

        let surface = h.game.surface();
        assert_eq!(surface.count_images(), 3);
        assert_eq!(surface.last_text(), Some("Fireflies caught: 0"));
    }

    fn filled_circles(surface: &RecordingSurface) -> Vec<(Vec2, f32)> {
        surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillCircle { center, radius } => Some((*center, *radius)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_frame_draws_with_scroll_offset() {
        let mut h = harness(2);
        h.game.start_with_assets(AssetLibrary::empty());
        for (fly, y) in h.game.state.fireflies.iter_mut().zip([250.0, 450.0]) {
            fly.pos = Vec2::new(100.0, y);
            fly.vel = Vec2::ZERO;
        }
        h.page.scroll_to(300.0);

        assert!(h.game.frame());

        // y=250 is above the viewport; y=450 lands at 150
        assert_eq!(
            filled_circles(h.game.surface()),
            vec![(Vec2::new(100.0, 150.0), 30.0)]
        );
        let ys: Vec<f32> = h.game.state().fireflies.iter().map(|f| f.pos.y).collect();
        assert_eq!(ys, vec![250.0, 450.0]);
    }

    #[test]
    fn test_frame_follows_viewport_changes() {
        let mut h = harness(2);
        h.game.start_with_assets(AssetLibrary::empty());
        h.page.set(crate::platform::PageMetrics {
            viewport_width: 1024.0,
            viewport_height: 700.0,
            scroll_y: 0.0,
            document_width: 1024.0,
            document_height: 1200.0,
        });
        h.game.frame();
        assert_eq!(h.game.surface().size(), Vec2::new(1024.0, 700.0));
        assert_eq!(h.game.state().bounds, Vec2::new(1024.0, 1200.0));
    }

    #[test]
    fn test_resize_keeps_positions() {
        let mut h = harness(5);
        h.game.start_with_assets(AssetLibrary::empty());
        let before: Vec<Vec2> = h.game.state().fireflies.iter().map(|f| f.pos).collect();
        h.page.set(crate::platform::PageMetrics {
            viewport_width: 400.0,
            viewport_height: 300.0,
            scroll_y: 0.0,
            document_width: 800.0,
            document_height: 3000.0,
        });
        h.game.on_resize();
        let after: Vec<Vec2> = h.game.state().fireflies.iter().map(|f| f.pos).collect();
        assert_eq!(before, after);
        assert_eq!(h.game.surface().size(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_muted_config_silences_session() {
        let page = FixedPage::sized(Vec2::new(800.0, 600.0), 3000.0);
        let audio = RecordingBackend::default();
        let config = GameConfig {
            muted: true,
            ..GameConfig::default()
        };
        let mut game = FireflyGame::new(
            config,
            RecordingSurface::new(),
            AudioCues::new(Box::new(audio.clone()), Default::default()),
            Box::new(page),
            Box::new(ManualClock::new()),
            1,
        );
        game.start_with_assets(AssetLibrary::empty());
        assert!(audio.played.borrow().is_empty());
    }
}
