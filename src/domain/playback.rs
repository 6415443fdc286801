//! Playback state machine
//!
//! Tri-state machine for the main screen. Each transition also says what the
//! banner animation has to do so the two never drift apart.

use serde::{Deserialize, Serialize};

/// Audio/animation playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Initial state, progress at 0 and no audio
    #[default]
    Stopped,
    /// Audio running, animation looping
    Playing,
    /// Audio paused, animation frozen in place
    Paused,
}

/// What the audio engine reported after a play/pause request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioStatus {
    Playing,
    Paused,
}

/// Events that drive the playback state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Play/pause completed; `None` means the engine failed to open or resume
    Toggled(Option<AudioStatus>),
    /// Explicit stop button
    StopRequested,
    /// Track reached its natural end
    Ended,
    /// Audio engine reported an error outside a toggle
    Failed,
}

/// Instruction for the animation that accompanies a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationCommand {
    /// Start a fresh full-length pass from 0
    Restart,
    /// Finish the interrupted pass, then loop
    Resume,
    /// Hold the current progress
    Freeze,
    /// Back to 0 and halt
    Reset,
    /// Leave the animation alone
    Keep,
}

/// Result of processing one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: PlaybackState,
    pub animation: AnimationCommand,
}

/// Playback transition table
pub struct PlaybackStateMachine;

impl PlaybackStateMachine {
    /// Processes a playback event and returns the new state with its
    /// animation command
    pub fn process_event(current: PlaybackState, event: PlaybackEvent) -> Transition {
        use AnimationCommand as Anim;
        use PlaybackState as State;

        let (next, animation) = match (current, event) {
            // The engine is authoritative about what a toggle did
            (State::Stopped, PlaybackEvent::Toggled(Some(AudioStatus::Playing))) => {
                (State::Playing, Anim::Restart)
            }
            (State::Paused, PlaybackEvent::Toggled(Some(AudioStatus::Playing))) => {
                (State::Playing, Anim::Resume)
            }
            (State::Playing, PlaybackEvent::Toggled(Some(AudioStatus::Playing))) => {
                (State::Playing, Anim::Keep)
            }
            (State::Stopped, PlaybackEvent::Toggled(Some(AudioStatus::Paused))) => {
                // Nothing has advanced yet, progress is already 0
                (State::Paused, Anim::Keep)
            }
            (_, PlaybackEvent::Toggled(Some(AudioStatus::Paused))) => (State::Paused, Anim::Freeze),

            (State::Stopped, PlaybackEvent::Toggled(None))
            | (State::Stopped, PlaybackEvent::StopRequested)
            | (State::Stopped, PlaybackEvent::Ended)
            | (State::Stopped, PlaybackEvent::Failed) => (State::Stopped, Anim::Keep),

            (_, PlaybackEvent::Toggled(None))
            | (_, PlaybackEvent::StopRequested)
            | (_, PlaybackEvent::Ended)
            | (_, PlaybackEvent::Failed) => (State::Stopped, Anim::Reset),
        };

        Transition { next, animation }
    }
}
