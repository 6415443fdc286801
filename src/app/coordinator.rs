//! Playback/animation coordinator for the main screen
//!
//! Keeps the banner animation in lock-step with the audio session. The
//! playback state only changes through `PlaybackStateMachine`, and every
//! transition carries the matching animation command, so the banner can
//! never move while audio is not playing.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::app::navigation::{Navigator, Route};
use crate::config::PlaybackConfig;
use crate::domain::animation::{LoopAnimation, ProgressSamples};
use crate::domain::playback::{AnimationCommand, PlaybackEvent, PlaybackState, PlaybackStateMachine};
use crate::platform::audio::{AudioEngine, AudioEvent};
use crate::platform::notifier::Notifier;

pub const LOGOUT_MESSAGE: &str = "You got logged out!";

/// RAII wrapper for the audio engine
///
/// Destroys the engine when dropped, so releasing the stream does not depend
/// on every exit path remembering to do it.
struct AudioHandle {
    engine: Box<dyn AudioEngine>,
}

impl AudioHandle {
    fn new(engine: Box<dyn AudioEngine>) -> Self {
        Self { engine }
    }
}

impl Drop for AudioHandle {
    fn drop(&mut self) {
        self.engine.destroy();
    }
}

/// Owns the audio handle, the playback state and the banner animation
pub struct PlaybackCoordinator {
    state: PlaybackState,
    animation: LoopAnimation,
    audio: AudioHandle,
}

impl std::fmt::Debug for PlaybackCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackCoordinator")
            .field("state", &self.state)
            .field("animation", &self.animation)
            .finish_non_exhaustive()
    }
}

impl PlaybackCoordinator {
    /// Takes ownership of `engine` and readies it for playback
    ///
    /// A failed prepare is not fatal: the first toggle will retry and fall
    /// back to Stopped if the stream still cannot be opened.
    pub fn mount(mut engine: Box<dyn AudioEngine>, config: &PlaybackConfig) -> Self {
        engine.set_looping(config.looping());
        if let Err(err) = engine.prepare() {
            warn!(%err, "audio prepare failed");
        }

        Self {
            state: PlaybackState::Stopped,
            animation: LoopAnimation::new(config.pass_duration()),
            audio: AudioHandle::new(engine),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Banner progress in `[0, 1)` at `now`
    pub fn progress(&self, now: Duration) -> f64 {
        self.animation.sample(now)
    }

    pub fn animation(&self) -> &LoopAnimation {
        &self.animation
    }

    /// Frame-by-frame progress from `from`, detached from later transitions
    pub fn samples(&self, from: Duration, interval: Duration) -> ProgressSamples {
        self.animation.samples(from, interval)
    }

    /// Play/pause button
    ///
    /// The next state is whatever the audio engine reports; an engine error
    /// forces Stopped.
    pub fn toggle_play(&mut self, now: Duration) -> PlaybackState {
        self.poll(now);

        let outcome = match self.audio.engine.play_pause() {
            Ok(status) => Some(status),
            Err(err) => {
                warn!(%err, "play/pause failed, stopping");
                None
            }
        };
        self.apply(PlaybackEvent::Toggled(outcome), now)
    }

    /// Stop button
    pub fn stop(&mut self, now: Duration) -> PlaybackState {
        if let Err(err) = self.audio.engine.stop() {
            warn!(%err, "audio stop failed");
        }
        self.apply(PlaybackEvent::StopRequested, now)
    }

    /// Picks up `ended`/`error` signals raised by the engine since the last
    /// poll
    pub fn poll(&mut self, now: Duration) -> PlaybackState {
        match self.audio.engine.poll(now) {
            Some(AudioEvent::Ended) => self.apply(PlaybackEvent::Ended, now),
            Some(AudioEvent::Error(err)) => {
                warn!(%err, "audio error, stopping");
                self.apply(PlaybackEvent::Failed, now)
            }
            None => self.state,
        }
    }

    /// Logout button
    ///
    /// Stops playback, sends the user back to signup with a toast, and
    /// consumes the coordinator so the audio handle is released.
    pub fn logout(mut self, now: Duration, navigator: &mut dyn Navigator, notifier: &mut dyn Notifier) {
        self.stop(now);
        navigator.reset_to(Route::Signup);
        notifier.notify(LOGOUT_MESSAGE);
        info!("logged out");
    }

    fn apply(&mut self, event: PlaybackEvent, now: Duration) -> PlaybackState {
        let transition = PlaybackStateMachine::process_event(self.state, event);

        match transition.animation {
            AnimationCommand::Restart => self.animation.restart(now),
            AnimationCommand::Resume => {
                debug!(remaining_ms = self.animation.remaining().as_millis() as u64, "resuming pass");
                self.animation.resume(now);
            }
            AnimationCommand::Freeze => {
                let held = self.animation.freeze(now);
                debug!(progress = held, "animation frozen");
            }
            AnimationCommand::Reset => self.animation.reset(),
            AnimationCommand::Keep => {}
        }

        if transition.next != self.state {
            info!(from = ?self.state, to = ?transition.next, ?event, "playback transition");
        }
        self.state = transition.next;
        self.state
    }
}

impl Drop for PlaybackCoordinator {
    fn drop(&mut self) {
        // Audio is released by AudioHandle right after this
        self.animation.cancel();
        debug!("playback coordinator torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::navigation::NavigationStack;
    use crate::config::Platform;
    use crate::platform::audio::{PlayerRemote, SimulatedPlayer};
    use crate::platform::notifier::RecordingNotifier;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn mount_with(config: &PlaybackConfig, track_ms: u64) -> (PlaybackCoordinator, PlayerRemote) {
        let player = SimulatedPlayer::new("song.mp3", ms(track_ms));
        let remote = player.remote();
        (PlaybackCoordinator::mount(Box::new(player), config), remote)
    }

    fn mount() -> (PlaybackCoordinator, PlayerRemote) {
        mount_with(&PlaybackConfig::default(), 600_000)
    }

    #[test]
    fn mount_prepares_audio_with_platform_looping() {
        let (coordinator, remote) = mount();
        assert_eq!(coordinator.state(), PlaybackState::Stopped);
        assert!(remote.is_prepared());
        assert!(!remote.is_looping());

        let ios = PlaybackConfig {
            platform: Platform::Ios,
            ..PlaybackConfig::default()
        };
        let (_coordinator, remote) = mount_with(&ios, 600_000);
        assert!(remote.is_looping());
    }

    #[test]
    fn toggle_cycle_and_stop() {
        let (mut c, remote) = mount();
        assert_eq!(c.toggle_play(ms(0)), PlaybackState::Playing);
        assert!(remote.is_playing());
        assert_eq!(c.toggle_play(ms(1000)), PlaybackState::Paused);
        assert!(!remote.is_playing());
        assert_eq!(c.toggle_play(ms(2000)), PlaybackState::Playing);
        assert_eq!(c.stop(ms(3000)), PlaybackState::Stopped);
        assert_eq!(c.progress(ms(3000)), 0.0);
        assert!(!remote.is_playing());
    }

    #[test]
    fn progress_frozen_while_paused_and_reset_only_on_stop() {
        let (mut c, _remote) = mount();
        c.toggle_play(ms(0));
        c.toggle_play(ms(1400));
        assert!(approx(c.progress(ms(1400)), 0.2));
        assert!(approx(c.progress(ms(99_000)), 0.2), "no advance while paused");

        c.toggle_play(ms(5000));
        assert!(approx(c.progress(ms(5000)), 0.2), "resume does not reset");
        c.stop(ms(6000));
        assert_eq!(c.progress(ms(6000)), 0.0);
    }

    #[test]
    fn resume_from_half_reaches_end_after_half_pass() {
        let (mut c, _remote) = mount();
        c.toggle_play(ms(0));
        c.toggle_play(ms(3500));
        assert!(approx(c.progress(ms(3500)), 0.5));

        c.toggle_play(ms(20_000));
        let segment = c.animation().segment().unwrap();
        assert_eq!(segment.duration, ms(3500));
        assert!(c.progress(ms(23_499)) > 0.99);
        assert!(approx(c.progress(ms(23_500)), 0.0));
        assert!(approx(c.progress(ms(23_500 + 7000 / 4)), 0.25));
    }

    #[test]
    fn toggle_error_forces_stopped() {
        let (mut c, remote) = mount();
        c.toggle_play(ms(0));
        remote.fail_next_toggle();
        assert_eq!(c.toggle_play(ms(1000)), PlaybackState::Stopped);
        assert_eq!(c.progress(ms(1000)), 0.0);
    }

    #[test]
    fn track_end_stops_non_looping_playback() {
        let (mut c, _remote) = mount_with(&PlaybackConfig::default(), 5000);
        c.poll(ms(0));
        c.toggle_play(ms(0));
        assert_eq!(c.poll(ms(4000)), PlaybackState::Playing);
        assert_eq!(c.poll(ms(5000)), PlaybackState::Stopped);
        assert_eq!(c.progress(ms(5000)), 0.0);
    }

    #[test]
    fn stream_error_stops_playback() {
        let (mut c, remote) = mount();
        c.toggle_play(ms(0));
        remote.raise_error("network dropped");
        assert_eq!(c.poll(ms(100)), PlaybackState::Stopped);
    }

    #[test]
    fn logout_stops_navigates_notifies_and_releases_audio() {
        let (mut c, remote) = mount();
        let mut nav = NavigationStack::new(Route::Main { name: "Ann".to_owned() });
        let notifier = RecordingNotifier::new();
        let mut sink = notifier.clone();

        c.toggle_play(ms(0));
        c.logout(ms(1000), &mut nav, &mut sink);

        assert_eq!(nav.current(), &Route::Signup);
        assert_eq!(notifier.messages(), vec![LOGOUT_MESSAGE.to_owned()]);
        assert!(!remote.is_playing());
        assert!(remote.is_destroyed());
    }

    #[test]
    fn dropping_coordinator_releases_audio() {
        let (mut c, remote) = mount();
        c.toggle_play(ms(0));
        drop(c);
        assert!(remote.is_destroyed());
        assert!(!remote.is_playing());
    }

    #[test]
    fn samples_follow_current_segment() {
        let (mut c, _remote) = mount();
        c.toggle_play(ms(0));
        let progress: Vec<f64> = c.samples(ms(0), ms(3500)).take(3).map(|(_, p)| p).collect();
        assert!(approx(progress[0], 0.0));
        assert!(approx(progress[1], 0.5));
        assert!(approx(progress[2], 0.0));
    }
}
