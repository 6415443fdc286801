//! Individual configuration sections

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::validation::CharsetPolicy;

/// Signup form behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Quiet period after the last keystroke before an error is disclosed
    pub debounce_ms: u64,
    pub charset: CharsetPolicy,
}

impl FormConfig {
    pub const DEFAULT_DEBOUNCE_MS: u64 = 800;

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            debounce_ms: Self::DEFAULT_DEBOUNCE_MS,
            charset: CharsetPolicy::default(),
        }
    }
}

/// Target platform, decides whether the track loops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    #[default]
    Android,
}

impl Platform {
    pub fn loops_audio(self) -> bool {
        match self {
            Platform::Ios => true,
            Platform::Android => false,
        }
    }
}

/// Main screen playback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// One left-to-right banner pass
    pub pass_duration_ms: u64,
    pub song_uri: String,
    pub platform: Platform,
    /// Overrides the platform default when set
    pub looping: Option<bool>,
}

impl PlaybackConfig {
    pub const DEFAULT_PASS_MS: u64 = 7000;

    pub fn pass_duration(&self) -> Duration {
        Duration::from_millis(self.pass_duration_ms.max(1))
    }

    pub fn looping(&self) -> bool {
        self.looping.unwrap_or_else(|| self.platform.loops_audio())
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            pass_duration_ms: Self::DEFAULT_PASS_MS,
            song_uri: "https://www.dropbox.com/s/zrl1jsdk29qdv5r/Pink%20Fluffy%20Unicorns%20Dancing%20on%20Rainbows%20-%20Fluffle%20Puff%20.mp3?dl=1".to_owned(),
            platform: Platform::default(),
            looping: None,
        }
    }
}

/// Simulated audio engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub track_length_ms: u64,
}

impl AudioConfig {
    pub fn track_length(&self) -> Duration {
        Duration::from_millis(self.track_length_ms)
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            track_length_ms: 151_000,
        }
    }
}

/// Rendering surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Width of the unicorn banner that crosses the screen
    pub banner_width: u32,
    /// TrueType/OpenType font used for labels; placeholders without one
    pub font_path: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            viewport_width: 390,
            viewport_height: 844,
            banner_width: 200,
            font_path: None,
        }
    }
}
