//! On/off toggle for the minigame
//!
//! The controller is the only owner of the engine. Starting is split in two
//! so the browser glue can preload images without holding a borrow across
//! the await: `toggle` moves to `Starting`, the caller loads, then
//! `finish_start` hands the assets over.

use crate::assets::{AssetLibrary, ImageLoader};
use crate::engine::FireflyGame;
use crate::renderer::Surface;

/// Where the toggle is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationPhase {
    #[default]
    Inactive,
    /// Assets are loading
    Starting,
    Active,
}

/// What the caller should do after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleCommand {
    /// Preload assets, then call `finish_start`
    Start,
    /// The game is (now) off; cancel any pending frame
    Stopped,
}

pub struct ActivationController<S: Surface> {
    phase: ActivationPhase,
    engine: FireflyGame<S>,
}

impl<S: Surface> ActivationController<S> {
    pub fn new(engine: FireflyGame<S>) -> Self {
        Self {
            phase: ActivationPhase::Inactive,
            engine,
        }
    }

    pub fn phase(&self) -> ActivationPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == ActivationPhase::Active
    }

    pub fn engine(&self) -> &FireflyGame<S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut FireflyGame<S> {
        &mut self.engine
    }

    /// Flip the toggle
    pub fn toggle(&mut self) -> ToggleCommand {
        match self.phase {
            ActivationPhase::Inactive => {
                self.phase = ActivationPhase::Starting;
                ToggleCommand::Start
            }
            ActivationPhase::Starting => {
                log::info!("Start cancelled while loading");
                self.phase = ActivationPhase::Inactive;
                ToggleCommand::Stopped
            }
            ActivationPhase::Active => {
                self.engine.stop();
                self.phase = ActivationPhase::Inactive;
                ToggleCommand::Stopped
            }
        }
    }

    /// Complete a start once assets have settled. Returns false if the
    /// toggle was switched off in the meantime.
    pub fn finish_start(&mut self, assets: AssetLibrary<S::Image>) -> bool {
        if self.phase != ActivationPhase::Starting {
            return false;
        }
        self.engine.start_with_assets(assets);
        self.phase = ActivationPhase::Active;
        true
    }

    /// Toggle, loading assets inline when starting. Returns whether the
    /// game is running afterwards.
    pub async fn toggle_and_load<L>(&mut self, loader: &L) -> bool
    where
        L: ImageLoader<Image = S::Image>,
    {
        match self.toggle() {
            ToggleCommand::Start => {
                let manifest = self.engine.config().assets.clone();
                let assets = AssetLibrary::load(loader, &manifest).await;
                self.finish_start(assets)
            }
            ToggleCommand::Stopped => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::FakeLoader;
    use crate::audio::AudioCues;
    use crate::platform::{FixedPage, ManualClock};
    use crate::renderer::RecordingSurface;
    use crate::settings::GameConfig;
    use glam::Vec2;

    fn controller() -> ActivationController<RecordingSurface> {
        let engine = FireflyGame::new(
            GameConfig::default(),
            RecordingSurface::new(),
            AudioCues::disabled(),
            Box::new(FixedPage::sized(Vec2::new(800.0, 600.0), 2000.0)),
            Box::new(ManualClock::new()),
            7,
        );
        ActivationController::new(engine)
    }

    #[test]
    fn test_toggle_cycle() {
        let mut c = controller();
        assert_eq!(c.phase(), ActivationPhase::Inactive);

        assert_eq!(c.toggle(), ToggleCommand::Start);
        assert_eq!(c.phase(), ActivationPhase::Starting);
        assert!(!c.engine().is_active());

        assert!(c.finish_start(AssetLibrary::empty()));
        assert!(c.is_active());
        assert!(c.engine().is_active());

        assert_eq!(c.toggle(), ToggleCommand::Stopped);
        assert_eq!(c.phase(), ActivationPhase::Inactive);
        assert!(!c.engine().is_active());
    }

    #[test]
    fn test_cancel_while_loading() {
        let mut c = controller();
        c.toggle();
        assert_eq!(c.toggle(), ToggleCommand::Stopped);

        // Late completion of the cancelled preload is ignored
        assert!(!c.finish_start(AssetLibrary::empty()));
        assert!(!c.engine().is_active());
        assert_eq!(c.phase(), ActivationPhase::Inactive);
    }

    #[test]
    fn test_finish_start_requires_toggle() {
        let mut c = controller();
        assert!(!c.finish_start(AssetLibrary::empty()));
        assert!(!c.engine().is_active());
    }

    #[test]
    fn test_toggle_and_load() {
        let mut c = controller();
        let loader = FakeLoader::default();

        assert!(pollster::block_on(c.toggle_and_load(&loader)));
        assert_eq!(c.engine().assets().len(), 2);
        assert_eq!(c.engine().state().fireflies.len(), 25);

        assert!(!pollster::block_on(c.toggle_and_load(&loader)));
        assert!(!c.engine().is_active());
        assert_eq!(loader.begun.borrow().len(), 2);
    }

    #[test]
    fn test_restart_gives_fresh_session() {
        let mut c = controller();
        c.toggle();
        c.finish_start(AssetLibrary::empty());
        let target = c.engine().state().fireflies[0].pos;
        c.engine_mut().on_pointer_click(target.x, target.y);
        assert!(c.engine().captured_count() >= 1);

        c.toggle();
        c.toggle();
        c.finish_start(AssetLibrary::empty());
        assert_eq!(c.engine().captured_count(), 0);
        assert_eq!(c.engine().state().session, 2);
        assert!(c.engine().state().fireflies.iter().all(|f| !f.captured));
    }
}
