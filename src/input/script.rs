//! Timestamped session scripts
//!
//! A script is a TOML list of UI events with the time they happen at:
//!
//! ```toml
//! [[steps]]
//! at_ms = 0
//! event = { action = "type", field = "email", text = "ann@x.co" }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::form::FieldId;
use crate::input::events::UiEvent;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid script: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("step {index} at {at_ms}ms goes back in time")]
    OutOfOrder { index: usize, at_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub at_ms: u64,
    pub event: UiEvent,
}

impl ScriptStep {
    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Script {
    /// Keeps the clock running after the last step
    #[serde(default)]
    pub tail_ms: u64,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ScriptError> {
        let script: Script = toml::from_str(content)?;
        script.check_order()?;
        Ok(script)
    }

    fn check_order(&self) -> Result<(), ScriptError> {
        let mut last = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if step.at_ms < last {
                return Err(ScriptError::OutOfOrder {
                    index,
                    at_ms: step.at_ms,
                });
            }
            last = step.at_ms;
        }
        Ok(())
    }

    /// Time of the last step plus the tail
    pub fn end(&self) -> Duration {
        let last = self.steps.last().map_or(0, |step| step.at_ms);
        Duration::from_millis(last + self.tail_ms)
    }

    /// Built-in session: a typo, a registration, a play/pause/resume cycle
    /// and a logout
    pub fn demo() -> Self {
        let typing = |at_ms: u64, field: FieldId, text: &str| ScriptStep {
            at_ms,
            event: UiEvent::Type {
                field,
                text: text.to_owned(),
            },
        };
        let press = |at_ms: u64, event: UiEvent| ScriptStep { at_ms, event };

        Self {
            tail_ms: 1_000,
            steps: vec![
                typing(0, FieldId::Email, "ann@x"),
                typing(1_500, FieldId::Email, "ann@x.co"),
                typing(2_000, FieldId::Password, "secret1"),
                typing(2_500, FieldId::Name, "Ann"),
                press(3_500, UiEvent::Submit),
                press(4_000, UiEvent::TogglePlay),
                press(7_500, UiEvent::TogglePlay),
                press(9_000, UiEvent::TogglePlay),
                press(16_000, UiEvent::Stop),
                press(17_000, UiEvent::TogglePlay),
                press(19_000, UiEvent::Logout),
            ],
        }
    }
}
