//! UI events delivered to the app controller

use serde::{Deserialize, Serialize};

use crate::domain::form::{FieldId, Mode};

/// Discrete user interactions
///
/// Serialized with an `action` tag so session scripts read naturally:
/// `{ action = "type", field = "email", text = "ann@x.co" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UiEvent {
    /// Text of a form field changed
    Type { field: FieldId, text: String },
    /// Login / register switch buttons
    SelectMode { mode: Mode },
    /// Register or login button, depending on mode
    Submit,
    /// Play/pause button
    TogglePlay,
    /// Stop button
    Stop,
    /// Logout button
    Logout,
}

impl UiEvent {
    /// Whether the event belongs to the signup screen
    pub fn targets_signup(&self) -> bool {
        matches!(self, UiEvent::Type { .. } | UiEvent::SelectMode { .. } | UiEvent::Submit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_action() {
        let event = UiEvent::Type {
            field: FieldId::Email,
            text: "ann@x.co".to_owned(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "type");
        assert_eq!(json["field"], "email");

        let parsed: UiEvent = serde_json::from_str(r#"{"action":"select_mode","mode":"login"}"#).unwrap();
        assert_eq!(parsed, UiEvent::SelectMode { mode: Mode::Login });
    }

    #[test]
    fn screen_targets() {
        assert!(UiEvent::Submit.targets_signup());
        assert!(!UiEvent::TogglePlay.targets_signup());
        assert!(!UiEvent::Logout.targets_signup());
    }
}
