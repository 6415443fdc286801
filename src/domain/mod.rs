//! Domain logic and core data structures
//!
//! Pure state and transition rules for the two screens. Nothing in here
//! touches audio, storage, navigation or rendering.

pub mod animation;
pub mod auth;
pub mod core;
pub mod form;
pub mod playback;
pub mod validation;
