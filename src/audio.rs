//! Audio cues
//!
//! Three clips: a looping ambient bed, a net-swing cue and a capture cue.
//! Playback is fire-and-forget. Rejections (usually the browser autoplay
//! policy) are logged and swallowed, never returned to the game.

use crate::error::AudioError;
use crate::settings::CueVolumes;

/// Named sound clips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Background loop while the game runs
    Ambient,
    /// Net swing
    Action,
    /// Firefly caught
    Reward,
}

impl Cue {
    pub const ALL: [Cue; 3] = [Cue::Ambient, Cue::Action, Cue::Reward];

    pub fn looping(&self) -> bool {
        matches!(self, Cue::Ambient)
    }
}

/// Platform playback for the three clips
pub trait CueBackend {
    /// Rewind `cue` to time zero and play it at `volume`
    fn play_from_start(&mut self, cue: Cue, volume: f32) -> Result<(), AudioError>;
    /// Pause `cue` and rewind it
    fn halt(&mut self, cue: Cue);
}

/// Audio front-end for the engine
pub struct AudioCues {
    backend: Option<Box<dyn CueBackend>>,
    volumes: CueVolumes,
    muted: bool,
}

impl AudioCues {
    pub fn new(backend: Box<dyn CueBackend>, volumes: CueVolumes) -> Self {
        Self {
            backend: Some(backend),
            volumes,
            muted: false,
        }
    }

    /// No backend: every cue is a no-op
    pub fn disabled() -> Self {
        Self {
            backend: None,
            volumes: CueVolumes::default(),
            muted: false,
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.stop_ambient_loop();
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_volumes(&mut self, volumes: CueVolumes) {
        self.volumes = volumes;
    }

    pub fn play_ambient_loop(&mut self) {
        self.play(Cue::Ambient);
    }

    pub fn stop_ambient_loop(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.halt(Cue::Ambient);
        }
    }

    pub fn play_action(&mut self) {
        self.play(Cue::Action);
    }

    pub fn play_reward(&mut self) {
        self.play(Cue::Reward);
    }

    fn play(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        let volume = self.volumes.get(cue);
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        if let Err(e) = backend.play_from_start(cue, volume) {
            log_rejection(cue, &e);
        }
    }
}

/// Log a rejected play request at a level matching how surprising it is
pub fn log_rejection(cue: Cue, err: &AudioError) {
    if err.is_expected() {
        log::debug!("{cue:?} cue not played: {err}");
    } else {
        log::warn!("{cue:?} cue failed: {err}");
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::HtmlAudioBackend;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::{DomException, HtmlAudioElement};

    use super::{Cue, CueBackend, log_rejection};
    use crate::error::AudioError;
    use crate::settings::AssetManifest;

    /// One `<audio>` element per cue
    pub struct HtmlAudioBackend {
        ambient: Option<HtmlAudioElement>,
        action: Option<HtmlAudioElement>,
        reward: Option<HtmlAudioElement>,
    }

    impl HtmlAudioBackend {
        pub fn new(assets: &AssetManifest) -> Self {
            let make = |cue: Cue| {
                let url = assets.audio_url(cue);
                match HtmlAudioElement::new_with_src(url) {
                    Ok(el) => {
                        el.set_loop(cue.looping());
                        el.set_preload("auto");
                        Some(el)
                    }
                    Err(e) => {
                        log::warn!("Failed to create {cue:?} audio from {url}: {e:?}");
                        None
                    }
                }
            };
            Self {
                ambient: make(Cue::Ambient),
                action: make(Cue::Action),
                reward: make(Cue::Reward),
            }
        }

        fn element(&self, cue: Cue) -> Option<&HtmlAudioElement> {
            match cue {
                Cue::Ambient => self.ambient.as_ref(),
                Cue::Action => self.action.as_ref(),
                Cue::Reward => self.reward.as_ref(),
            }
        }
    }

    fn classify(value: &wasm_bindgen::JsValue) -> AudioError {
        match value.dyn_ref::<DomException>() {
            Some(ex) => AudioError::from_dom(&ex.name(), &ex.message()),
            None => AudioError::Playback(format!("{value:?}")),
        }
    }

    impl CueBackend for HtmlAudioBackend {
        fn play_from_start(&mut self, cue: Cue, volume: f32) -> Result<(), AudioError> {
            let el = self.element(cue).ok_or(AudioError::Unavailable)?;
            el.set_volume(volume as f64);
            el.set_current_time(0.0);
            let promise = el.play().map_err(|e| classify(&e))?;
            // Rejections arrive asynchronously; swallow them there
            spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log_rejection(cue, &classify(&e));
                }
            });
            Ok(())
        }

        fn halt(&mut self, cue: Cue) {
            if let Some(el) = self.element(cue) {
                let _ = el.pause();
                el.set_current_time(0.0);
            }
        }
    }
}
