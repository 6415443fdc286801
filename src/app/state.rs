//! Application state snapshots
//!
//! Read-only, serializable views of the mounted screen. The controller owns
//! the live state; a snapshot is what gets dumped or rendered.

use serde::Serialize;

use crate::app::navigation::Route;
use crate::domain::form::FormState;
use crate::domain::playback::PlaybackState;

/// What the mounted screen looks like at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum ScreenSnapshot {
    Signup {
        form: FormState,
        can_submit: bool,
        /// Debounce checks still waiting to fire
        pending_checks: usize,
    },
    Main {
        name: String,
        playback: PlaybackState,
        /// Banner progress in `[0, 1)`
        progress: f64,
    },
}

/// Whole-app view at `at_ms`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppSnapshot {
    pub at_ms: u64,
    pub route: Route,
    pub screen: ScreenSnapshot,
}

impl AppSnapshot {
    pub fn is_signup(&self) -> bool {
        matches!(self.screen, ScreenSnapshot::Signup { .. })
    }

    /// Playback state, if the main screen is mounted
    pub fn playback(&self) -> Option<PlaybackState> {
        match &self.screen {
            ScreenSnapshot::Main { playback, .. } => Some(*playback),
            ScreenSnapshot::Signup { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::Validator;

    #[test]
    fn signup_snapshot_serializes_with_screen_tag() {
        let snapshot = AppSnapshot {
            at_ms: 1200,
            route: Route::Signup,
            screen: ScreenSnapshot::Signup {
                form: FormState::new(&Validator::default()),
                can_submit: false,
                pending_checks: 0,
            },
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["at_ms"], 1200);
        assert_eq!(json["route"], "Signup");
        assert_eq!(json["screen"]["screen"], "signup");
        assert_eq!(json["screen"]["form"]["mode"], "register");
        assert!(snapshot.is_signup());
        assert_eq!(snapshot.playback(), None);
    }

    #[test]
    fn main_snapshot_exposes_playback() {
        let snapshot = AppSnapshot {
            at_ms: 0,
            route: Route::Main { name: "Ann".to_owned() },
            screen: ScreenSnapshot::Main {
                name: "Ann".to_owned(),
                playback: PlaybackState::Paused,
                progress: 0.5,
            },
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["route"]["Main"]["name"], "Ann");
        assert_eq!(json["screen"]["progress"], 0.5);
        assert_eq!(snapshot.playback(), Some(PlaybackState::Paused));
    }
}
