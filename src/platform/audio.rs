//! Audio engine seam and a simulated player
//!
//! The coordinator talks to audio through `AudioEngine`. `SimulatedPlayer`
//! models a streaming player with a fixed track length: it advances only
//! while playing, loops or ends depending on its looping flag, and can be
//! told to fail through its `PlayerRemote`.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::domain::playback::AudioStatus;

/// Audio engine failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("failed to open stream {uri}: {reason}")]
    Open { uri: String, reason: String },
    #[error("playback failed: {0}")]
    Playback(String),
    #[error("player has been destroyed")]
    Destroyed,
}

/// Signals the engine raises on its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// Track reached its natural end (non-looping players only)
    Ended,
    /// Stream broke while playing
    Error(AudioError),
}

/// Playback handle owned by exactly one coordinator
pub trait AudioEngine {
    /// Opens the stream ahead of the first play
    fn prepare(&mut self) -> Result<(), AudioError>;

    fn set_looping(&mut self, looping: bool);

    /// Toggles between playing and paused, reporting where it ended up
    fn play_pause(&mut self) -> Result<AudioStatus, AudioError>;

    fn stop(&mut self) -> Result<(), AudioError>;

    /// Drains the next pending signal as of `now`
    fn poll(&mut self, now: Duration) -> Option<AudioEvent>;

    /// Releases the stream; the engine is unusable afterwards
    fn destroy(&mut self);
}

#[derive(Debug, Default)]
struct PlayerCore {
    uri: String,
    track_length: Duration,
    looping: bool,
    prepared: bool,
    playing: bool,
    position: Duration,
    last_poll: Option<Duration>,
    destroyed: bool,
    fail_next_toggle: bool,
    pending_error: Option<AudioError>,
    toggles: usize,
}

/// Simulated streaming player
#[derive(Debug)]
pub struct SimulatedPlayer {
    core: Rc<RefCell<PlayerCore>>,
}

impl SimulatedPlayer {
    pub fn new(uri: impl Into<String>, track_length: Duration) -> Self {
        let core = PlayerCore {
            uri: uri.into(),
            track_length,
            ..PlayerCore::default()
        };
        Self {
            core: Rc::new(RefCell::new(core)),
        }
    }

    /// Remote control that outlives the player, for inspection and fault
    /// injection
    pub fn remote(&self) -> PlayerRemote {
        PlayerRemote {
            core: Rc::clone(&self.core),
        }
    }
}

impl AudioEngine for SimulatedPlayer {
    fn prepare(&mut self) -> Result<(), AudioError> {
        let mut core = self.core.borrow_mut();
        if core.destroyed {
            return Err(AudioError::Destroyed);
        }
        if core.uri.is_empty() {
            return Err(AudioError::Open {
                uri: String::new(),
                reason: "empty uri".to_owned(),
            });
        }
        core.prepared = true;
        debug!(uri = %core.uri, "audio prepared");
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) {
        self.core.borrow_mut().looping = looping;
    }

    fn play_pause(&mut self) -> Result<AudioStatus, AudioError> {
        {
            let core = self.core.borrow();
            if core.destroyed {
                return Err(AudioError::Destroyed);
            }
            if !core.prepared {
                drop(core);
                self.prepare()?;
            }
        }

        let mut core = self.core.borrow_mut();
        core.toggles += 1;
        if std::mem::take(&mut core.fail_next_toggle) {
            core.playing = false;
            return Err(AudioError::Playback("stream could not be resumed".to_owned()));
        }

        core.playing = !core.playing;
        Ok(if core.playing {
            AudioStatus::Playing
        } else {
            AudioStatus::Paused
        })
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        let mut core = self.core.borrow_mut();
        if core.destroyed {
            return Err(AudioError::Destroyed);
        }
        core.playing = false;
        core.position = Duration::ZERO;
        Ok(())
    }

    fn poll(&mut self, now: Duration) -> Option<AudioEvent> {
        let mut core = self.core.borrow_mut();
        if core.destroyed {
            return None;
        }

        if core.playing {
            if let Some(last) = core.last_poll {
                core.position += now.saturating_sub(last);
            }
        }
        core.last_poll = Some(now);

        if let Some(error) = core.pending_error.take() {
            core.playing = false;
            return Some(AudioEvent::Error(error));
        }

        if core.playing && !core.track_length.is_zero() && core.position >= core.track_length {
            if core.looping {
                let length = core.track_length.as_nanos();
                core.position = Duration::from_nanos((core.position.as_nanos() % length) as u64);
            } else {
                core.playing = false;
                core.position = Duration::ZERO;
                return Some(AudioEvent::Ended);
            }
        }

        None
    }

    fn destroy(&mut self) {
        let mut core = self.core.borrow_mut();
        core.playing = false;
        core.destroyed = true;
        debug!(uri = %core.uri, "audio destroyed");
    }
}

/// Shared view onto a `SimulatedPlayer`
#[derive(Debug, Clone)]
pub struct PlayerRemote {
    core: Rc<RefCell<PlayerCore>>,
}

impl PlayerRemote {
    pub fn is_playing(&self) -> bool {
        self.core.borrow().playing
    }

    pub fn is_prepared(&self) -> bool {
        self.core.borrow().prepared
    }

    pub fn is_destroyed(&self) -> bool {
        self.core.borrow().destroyed
    }

    pub fn is_looping(&self) -> bool {
        self.core.borrow().looping
    }

    pub fn position(&self) -> Duration {
        self.core.borrow().position
    }

    pub fn toggle_count(&self) -> usize {
        self.core.borrow().toggles
    }

    /// Next play/pause request fails
    pub fn fail_next_toggle(&self) {
        self.core.borrow_mut().fail_next_toggle = true;
    }

    /// Raises an error on the next poll
    pub fn raise_error(&self, reason: &str) {
        self.core.borrow_mut().pending_error = Some(AudioError::Playback(reason.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn toggle_alternates_and_prepares_lazily() {
        let mut player = SimulatedPlayer::new("song.mp3", ms(10_000));
        let remote = player.remote();
        assert!(!remote.is_prepared());

        assert_eq!(player.play_pause().unwrap(), AudioStatus::Playing);
        assert!(remote.is_prepared());
        assert_eq!(player.play_pause().unwrap(), AudioStatus::Paused);
        assert_eq!(remote.toggle_count(), 2);
    }

    #[test]
    fn position_advances_only_while_playing() {
        let mut player = SimulatedPlayer::new("song.mp3", ms(10_000));
        let remote = player.remote();
        player.poll(ms(0));
        player.play_pause().unwrap();
        player.poll(ms(1000));
        assert_eq!(remote.position(), ms(1000));

        player.play_pause().unwrap();
        player.poll(ms(5000));
        assert_eq!(remote.position(), ms(1000));
    }

    #[test]
    fn non_looping_track_ends() {
        let mut player = SimulatedPlayer::new("song.mp3", ms(3000));
        player.poll(ms(0));
        player.play_pause().unwrap();
        assert_eq!(player.poll(ms(2000)), None);
        assert_eq!(player.poll(ms(3000)), Some(AudioEvent::Ended));
        assert!(!player.remote().is_playing());
    }

    #[test]
    fn looping_track_wraps() {
        let mut player = SimulatedPlayer::new("song.mp3", ms(3000));
        player.set_looping(true);
        player.poll(ms(0));
        player.play_pause().unwrap();
        assert_eq!(player.poll(ms(4000)), None);
        assert_eq!(player.remote().position(), ms(1000));
        assert!(player.remote().is_playing());
    }

    #[test]
    fn injected_faults() {
        let mut player = SimulatedPlayer::new("song.mp3", ms(3000));
        let remote = player.remote();
        remote.fail_next_toggle();
        assert!(player.play_pause().is_err());
        assert_eq!(player.play_pause().unwrap(), AudioStatus::Playing);

        remote.raise_error("network dropped");
        assert!(matches!(player.poll(ms(10)), Some(AudioEvent::Error(_))));
        assert!(!remote.is_playing());
    }

    #[test]
    fn empty_uri_cannot_prepare() {
        let mut player = SimulatedPlayer::new("", ms(3000));
        assert!(matches!(player.prepare(), Err(AudioError::Open { .. })));
        assert!(player.play_pause().is_err());
    }

    #[test]
    fn destroyed_player_rejects_commands() {
        let mut player = SimulatedPlayer::new("song.mp3", ms(3000));
        let remote = player.remote();
        player.destroy();
        assert!(remote.is_destroyed());
        assert_eq!(player.play_pause(), Err(AudioError::Destroyed));
        assert_eq!(player.stop(), Err(AudioError::Destroyed));
        assert_eq!(player.poll(ms(100)), None);
    }
}
