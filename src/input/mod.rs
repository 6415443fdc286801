//! User input
//!
//! Discrete UI events and the scripted sessions that replay them.

pub mod events;
pub mod script;

pub use events::UiEvent;
pub use script::{Script, ScriptError, ScriptStep};
