//! Platform collaborators
//!
//! Audio playback, credential storage and user notifications. The traits
//! are the seams the app layer depends on; the concrete types here are the
//! in-process implementations used by the demo binary and the tests.

pub mod audio;
pub mod keychain;
pub mod notifier;

pub use audio::{AudioEngine, AudioError, AudioEvent, PlayerRemote, SimulatedPlayer};
pub use keychain::InMemoryKeychain;
pub use notifier::{LogNotifier, Notifier, RecordingNotifier};
