//! Application controller and coordination layer
//!
//! The controller owns the navigation stack and the mounted screen, routes
//! UI events to it and keeps the two in agreement: whenever the stack's top
//! route changes, the old screen is dropped (releasing its resources) and a
//! fresh one is mounted.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::app::coordinator::PlaybackCoordinator;
use crate::app::form_controller::{FormController, SubmitError};
use crate::app::navigation::{NavigationStack, Route};
use crate::app::state::{AppSnapshot, ScreenSnapshot};
use crate::config::{AppConfig, ConfigError};
use crate::domain::auth::{AuthService, CredentialStore};
use crate::input::{ScriptError, UiEvent};
use crate::platform::{AudioEngine, InMemoryKeychain, LogNotifier, Notifier, SimulatedPlayer};
use crate::ui::layout::SceneLayout;
use crate::ui::renderer::RendererError;

/// Application errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Render(#[from] RendererError),

    #[error("failed to serialize snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("clock went backwards: {now_ms}ms is before {last_ms}ms")]
    ClockWentBackwards { now_ms: u64, last_ms: u64 },
}

/// Builds the audio engine for each main-screen mount
pub type AudioFactory = Box<dyn FnMut(&AppConfig) -> Box<dyn AudioEngine>>;

/// Main screen: the greeting name and the playback session it owns
#[derive(Debug)]
pub struct MainScreen {
    name: String,
    coordinator: PlaybackCoordinator,
}

impl MainScreen {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coordinator(&self) -> &PlaybackCoordinator {
        &self.coordinator
    }
}

/// The mounted screen
#[derive(Debug)]
pub enum Screen {
    Signup(FormController),
    Main(MainScreen),
}

impl Screen {
    /// Route this screen was mounted for
    pub fn route(&self) -> Route {
        match self {
            Screen::Signup(_) => Route::Signup,
            Screen::Main(main) => Route::Main {
                name: main.name.clone(),
            },
        }
    }
}

/// Main application controller
///
/// Single-threaded: every call carries the current time, which must never
/// go backwards between calls.
pub struct AppController {
    config: AppConfig,
    auth: AuthService<Box<dyn CredentialStore>>,
    navigation: NavigationStack,
    screen: Screen,
    audio_factory: AudioFactory,
    notifier: Box<dyn Notifier>,
    now: Duration,
}

impl AppController {
    /// Creates a controller on the signup screen
    pub fn new(
        config: AppConfig,
        store: Box<dyn CredentialStore>,
        audio_factory: AudioFactory,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let screen = Screen::Signup(FormController::new(&config.form));
        info!(platform = ?config.playback.platform, "app controller started");
        Self {
            config,
            auth: AuthService::new(store),
            navigation: NavigationStack::default(),
            screen,
            audio_factory,
            notifier,
            now: Duration::ZERO,
        }
    }

    /// Controller backed by the in-memory keychain, the simulated player
    /// and log notifications
    pub fn simulated(config: AppConfig) -> Self {
        let factory: AudioFactory = Box::new(|config: &AppConfig| {
            let player = SimulatedPlayer::new(config.playback.song_uri.clone(), config.audio.track_length());
            Box::new(player) as Box<dyn AudioEngine>
        });
        Self::new(
            config,
            Box::new(InMemoryKeychain::new()),
            factory,
            Box::new(LogNotifier),
        )
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn route(&self) -> &Route {
        self.navigation.current()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Moves the clock to `now`: fires due debounce checks and picks up
    /// audio `ended`/`error` signals
    pub fn advance(&mut self, now: Duration) -> Result<(), AppError> {
        if now < self.now {
            return Err(AppError::ClockWentBackwards {
                now_ms: now.as_millis() as u64,
                last_ms: self.now.as_millis() as u64,
            });
        }
        self.now = now;

        match &mut self.screen {
            Screen::Signup(form) => {
                form.advance(now);
            }
            Screen::Main(main) => {
                main.coordinator.poll(now);
            }
        }
        Ok(())
    }

    /// Delivers one UI event at `now`
    ///
    /// Events meant for the other screen are ignored, as are submits while
    /// the button is disabled. A failed login/register is not an error
    /// here; the message is shown on the form.
    pub fn handle_event(&mut self, event: UiEvent, now: Duration) -> Result<(), AppError> {
        self.advance(now)?;

        if matches!((&self.screen, &event), (Screen::Main(_), UiEvent::Logout)) {
            self.logout(now);
            self.sync_screen();
            return Ok(());
        }

        match (&mut self.screen, event) {
            (Screen::Signup(form), UiEvent::Type { field, text }) => {
                form.on_field_change(field, &text, now);
            }
            (Screen::Signup(form), UiEvent::SelectMode { mode }) => {
                form.set_mode(mode);
            }
            (Screen::Signup(form), UiEvent::Submit) => {
                match form.submit(&mut self.auth, &mut self.navigation) {
                    Ok(route) => debug!(?route, "submit accepted"),
                    Err(SubmitError::Disabled) => debug!("submit ignored while disabled"),
                    Err(SubmitError::Auth(err)) => debug!(%err, "submit rejected"),
                }
            }
            (Screen::Main(main), UiEvent::TogglePlay) => {
                main.coordinator.toggle_play(now);
            }
            (Screen::Main(main), UiEvent::Stop) => {
                main.coordinator.stop(now);
            }
            (screen, event) => {
                debug!(screen = ?screen.route(), ?event, "event ignored on this screen");
            }
        }

        self.sync_screen();
        Ok(())
    }

    /// Tears down the main screen through the coordinator's logout flow
    fn logout(&mut self, now: Duration) {
        let signup = Screen::Signup(FormController::new(&self.config.form));
        if let Screen::Main(main) = std::mem::replace(&mut self.screen, signup) {
            main.coordinator
                .logout(now, &mut self.navigation, self.notifier.as_mut());
        }
    }

    /// Mounts the screen for the current route if it changed
    fn sync_screen(&mut self) {
        let route = self.navigation.current().clone();
        if self.screen.route() == route {
            return;
        }

        let next = match &route {
            Route::Signup => Screen::Signup(FormController::new(&self.config.form)),
            Route::Main { name } => {
                let engine = (self.audio_factory)(&self.config);
                Screen::Main(MainScreen {
                    name: name.clone(),
                    coordinator: PlaybackCoordinator::mount(engine, &self.config.playback),
                })
            }
        };
        info!(?route, "screen mounted");
        // Dropping the previous screen releases whatever it held
        self.screen = next;
    }

    /// Serializable view of the mounted screen at the current time
    pub fn snapshot(&self) -> AppSnapshot {
        let screen = match &self.screen {
            Screen::Signup(form) => ScreenSnapshot::Signup {
                form: form.state().clone(),
                can_submit: form.can_submit(),
                pending_checks: form.pending_checks(),
            },
            Screen::Main(main) => ScreenSnapshot::Main {
                name: main.name.clone(),
                playback: main.coordinator.state(),
                progress: main.coordinator.progress(self.now),
            },
        };
        AppSnapshot {
            at_ms: self.now.as_millis() as u64,
            route: self.navigation.current().clone(),
            screen,
        }
    }

    /// Layout of the mounted screen at the current time
    pub fn layout(&self) -> SceneLayout {
        match &self.screen {
            Screen::Signup(form) => SceneLayout::signup(form.state(), form.can_submit(), &self.config.ui),
            Screen::Main(main) => SceneLayout::main(
                &main.name,
                main.coordinator.state(),
                main.coordinator.progress(self.now),
                &self.config.ui,
            ),
        }
    }
}

impl Drop for AppController {
    fn drop(&mut self) {
        debug!(route = ?self.navigation.current(), "app controller shutting down");
    }
}
