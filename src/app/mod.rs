//! Application orchestration layer
//!
//! This module coordinates between input, domain, UI, and platform layers.
//! It owns the mounted screen, its timers and its playback session.

pub mod controller;
pub mod coordinator;
pub mod form_controller;
pub mod navigation;
pub mod state;
pub mod timers;

pub use controller::{AppController, AppError, AudioFactory, Screen};
pub use coordinator::{LOGOUT_MESSAGE, PlaybackCoordinator};
pub use form_controller::{FormController, SubmitError};
pub use navigation::{NavigationStack, Navigator, Route};
pub use state::{AppSnapshot, ScreenSnapshot};
