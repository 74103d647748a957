//! Game configuration
//!
//! Read from LocalStorage as JSON. Missing fields fall back to the
//! defaults in `consts`, so a partial config is always valid.

use serde::Deserialize;

use crate::assets::ImageKey;
use crate::audio::Cue;
use crate::consts::*;
use crate::error::ConfigError;

/// Where the engine fetches its images and clips from
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub firefly_image: String,
    pub net_image: String,
    pub ambient_audio: String,
    pub action_audio: String,
    pub reward_audio: String,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            firefly_image: format!("{IMAGE_DIR}firefly-image.png"),
            net_image: format!("{IMAGE_DIR}Red_.png"),
            ambient_audio: format!("{AUDIO_DIR}Audiofondojuego.mp3"),
            action_audio: format!("{AUDIO_DIR}old-men-arm-move-97741.mp3"),
            reward_audio: format!("{AUDIO_DIR}notification-bell-sound-376888.mp3"),
        }
    }
}

impl AssetManifest {
    /// Image url, or None if left blank
    pub fn image_url(&self, key: ImageKey) -> Option<&str> {
        let url = match key {
            ImageKey::Firefly => &self.firefly_image,
            ImageKey::Net => &self.net_image,
        };
        (!url.trim().is_empty()).then_some(url.as_str())
    }

    pub fn audio_url(&self, cue: Cue) -> &str {
        match cue {
            Cue::Ambient => &self.ambient_audio,
            Cue::Action => &self.action_audio,
            Cue::Reward => &self.reward_audio,
        }
    }
}

/// Per-cue volume levels (0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CueVolumes {
    pub ambient: f32,
    pub action: f32,
    pub reward: f32,
}

impl Default for CueVolumes {
    fn default() -> Self {
        Self {
            ambient: AMBIENT_VOLUME,
            action: ACTION_VOLUME,
            reward: REWARD_VOLUME,
        }
    }
}

impl CueVolumes {
    pub fn get(&self, cue: Cue) -> f32 {
        match cue {
            Cue::Ambient => self.ambient,
            Cue::Action => self.action,
            Cue::Reward => self.reward,
        }
    }
}

/// Firefly movement and size tuning
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FireflyTuning {
    /// Collision radius (px)
    pub radius: f32,
    /// Sprite width/height (px)
    pub size: f32,
    /// Velocity spread per axis; components are drawn from ±speed/2
    pub speed: f32,
}

impl Default for FireflyTuning {
    fn default() -> Self {
        Self {
            radius: FIREFLY_RADIUS,
            size: FIREFLY_SIZE,
            speed: FIREFLY_SPEED,
        }
    }
}

/// Net cast gesture tuning
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct NetTuning {
    /// Ticks per gesture phase (launch, then return)
    pub duration_ticks: u32,
    /// Horizontal swing distance at full extension (px)
    pub reach: f32,
    /// Sprite width/height (px)
    pub size: f32,
}

impl Default for NetTuning {
    fn default() -> Self {
        Self {
            duration_ticks: NET_DURATION_TICKS,
            reach: NET_REACH,
            size: NET_SIZE,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fireflies per session
    pub firefly_count: usize,
    pub firefly: FireflyTuning,
    /// Extra reach added to a firefly's radius when resolving a click
    pub capture_radius: f32,
    /// Delay before a captured firefly reappears
    pub respawn_delay_ms: f64,
    pub net: NetTuning,
    pub volumes: CueVolumes,
    pub muted: bool,
    /// Text shown before the running capture count
    pub score_label: String,
    pub assets: AssetManifest,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            firefly_count: FIREFLY_COUNT,
            firefly: FireflyTuning::default(),
            capture_radius: CAPTURE_RADIUS,
            respawn_delay_ms: RESPAWN_DELAY_MS,
            net: NetTuning::default(),
            volumes: CueVolumes::default(),
            muted: false,
            score_label: "Fireflies caught".to_string(),
            assets: AssetManifest::default(),
        }
    }
}

impl GameConfig {
    /// Parse a JSON config; unknown fields are ignored, missing ones defaulted
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config.sanitized())
    }

    /// Reject values that cannot be clamped into something sensible
    pub fn validate(&self) -> Result<(), ConfigError> {
        let numbers = [
            ("firefly.radius", self.firefly.radius as f64),
            ("firefly.size", self.firefly.size as f64),
            ("firefly.speed", self.firefly.speed as f64),
            ("capture_radius", self.capture_radius as f64),
            ("respawn_delay_ms", self.respawn_delay_ms),
            ("net.reach", self.net.reach as f64),
            ("net.size", self.net.size as f64),
        ];
        for (field, value) in numbers {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{field} must be finite")));
            }
        }
        Ok(())
    }

    /// Clamp every field into its valid range
    pub fn sanitized(mut self) -> Self {
        self.firefly_count = self.firefly_count.clamp(1, MAX_FIREFLIES);
        self.firefly.radius = self.firefly.radius.max(1.0);
        self.firefly.size = self.firefly.size.max(1.0);
        self.firefly.speed = self.firefly.speed.max(0.0);
        self.capture_radius = self.capture_radius.max(0.0);
        self.respawn_delay_ms = self.respawn_delay_ms.max(0.0);
        self.net.duration_ticks = self.net.duration_ticks.max(1);
        self.net.reach = self.net.reach.max(0.0);
        self.net.size = self.net.size.max(1.0);
        self.volumes.ambient = self.volumes.ambient.clamp(0.0, 1.0);
        self.volumes.action = self.volumes.action.clamp(0.0, 1.0);
        self.volumes.reward = self.volumes.reward.clamp(0.0, 1.0);
        self
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "firefly_catch_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {e}"),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
