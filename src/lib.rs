//! Unicorn paradise
//!
//! Headless model of a two-screen app: a signup/login form with debounced
//! validation, and a main screen whose banner animation is kept in sync
//! with a streamed audio track.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod platform;
pub mod ui;
