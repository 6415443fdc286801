//! Signup screen controller
//!
//! Owns the form state, one debounce timer per field and the submit flow.
//! Errors are never shown while the user is still typing: every keystroke
//! hides the field's error and re-arms its timer, and only an expired timer
//! can make the error visible again.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::app::navigation::{Navigator, Route};
use crate::app::timers::TimerQueue;
use crate::config::FormConfig;
use crate::domain::auth::{AuthError, AuthService, CredentialStore};
use crate::domain::form::{FieldId, FormState, Mode};
use crate::domain::validation::Validator;

/// Why a submit did not navigate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("submit is disabled until the required fields are valid")]
    Disabled,
    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[derive(Debug, Clone)]
pub struct FormController {
    state: FormState,
    validator: Validator,
    debounce: Duration,
    timers: TimerQueue<FieldId>,
}

impl FormController {
    pub fn new(config: &FormConfig) -> Self {
        let validator = Validator::new(config.charset);
        Self {
            state: FormState::new(&validator),
            validator,
            debounce: config.debounce(),
            timers: TimerQueue::new(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Keystroke in `field`
    ///
    /// Value, validity and the hidden error apply immediately; the error
    /// check is (re)scheduled one debounce period after this edit.
    pub fn on_field_change(&mut self, field: FieldId, value: &str, now: Duration) {
        self.state.edit(field, value, &self.validator);
        self.timers.schedule(field, now + self.debounce);
        debug!(?field, valid = self.state.field(field).format_valid, "field edited");
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.state.mode != mode {
            debug!(?mode, "form mode switched");
        }
        self.state.set_mode(mode);
    }

    /// Fires every debounce timer due at `now`, returning the fields touched
    pub fn advance(&mut self, now: Duration) -> Vec<FieldId> {
        let fired = self.timers.drain_due(now);
        for field in &fired {
            self.state.reveal_error(*field);
            debug!(?field, visible = self.state.field(*field).error_visible, "debounce fired");
        }
        fired
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn pending_checks(&self) -> usize {
        self.timers.pending()
    }

    pub fn can_submit(&self) -> bool {
        self.state.can_submit()
    }

    /// Runs the register or login action for the active mode
    ///
    /// On success the navigator is reset to the main screen with the display
    /// name. On failure the auth error is kept for display until the next
    /// edit.
    pub fn submit<S: CredentialStore>(
        &mut self,
        auth: &mut AuthService<S>,
        navigator: &mut dyn Navigator,
    ) -> Result<Route, SubmitError> {
        if !self.can_submit() {
            return Err(SubmitError::Disabled);
        }

        let email = self.state.email.raw_value.clone();
        let password = self.state.password.raw_value.clone();
        let outcome = match self.state.mode {
            Mode::Register => {
                let name = self.state.name.raw_value.clone();
                auth.register(&name, &email, &password).map(|()| name)
            }
            Mode::Login => auth.login(&email, &password),
        };

        match outcome {
            Ok(name) => {
                info!(mode = ?self.state.mode, "signup form submitted");
                self.timers.cancel_all();
                let route = Route::Main { name };
                navigator.reset_to(route.clone());
                Ok(route)
            }
            Err(err) => {
                info!(%err, "authentication failed");
                self.state.auth_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::navigation::NavigationStack;
    use crate::platform::keychain::InMemoryKeychain;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn controller() -> FormController {
        FormController::new(&FormConfig::default())
    }

    fn auth() -> AuthService<InMemoryKeychain> {
        AuthService::new(InMemoryKeychain::new())
    }

    fn fill_register(form: &mut FormController, now: Duration) {
        form.on_field_change(FieldId::Name, "Ann", now);
        form.on_field_change(FieldId::Email, "ann@x.co", now);
        form.on_field_change(FieldId::Password, "secret1", now);
    }

    #[test]
    fn error_appears_only_after_quiet_period() {
        let mut form = controller();
        form.on_field_change(FieldId::Email, "ann@", ms(0));
        assert!(!form.state().email.error_visible);

        assert!(form.advance(ms(799)).is_empty());
        assert!(!form.state().email.error_visible);

        assert_eq!(form.advance(ms(800)), vec![FieldId::Email]);
        assert!(form.state().email.error_visible);
    }

    #[test]
    fn editing_hides_error_synchronously() {
        let mut form = controller();
        form.on_field_change(FieldId::Email, "ann@", ms(0));
        form.advance(ms(800));
        assert!(form.state().email.error_visible);

        form.on_field_change(FieldId::Email, "ann@x", ms(900));
        assert!(!form.state().email.error_visible);
    }

    #[test]
    fn rapid_edits_fire_once_from_last_edit() {
        let mut form = controller();
        for (i, text) in ["a", "an", "ann", "ann@"].iter().enumerate() {
            form.on_field_change(FieldId::Email, text, ms(i as u64 * 100));
        }
        assert_eq!(form.pending_checks(), 1);
        assert_eq!(form.next_deadline(), Some(ms(300 + 800)));

        assert!(form.advance(ms(1099)).is_empty());
        assert_eq!(form.advance(ms(1100)), vec![FieldId::Email]);
        assert!(form.advance(ms(10_000)).is_empty());
        assert!(form.state().email.error_visible);
    }

    #[test]
    fn becoming_valid_before_fire_suppresses_error() {
        let mut form = controller();
        form.on_field_change(FieldId::Email, "ann@x", ms(0));
        form.on_field_change(FieldId::Email, "ann@x.co", ms(500));
        form.advance(ms(2000));
        assert!(!form.state().email.error_visible);
    }

    #[test]
    fn field_timers_are_independent() {
        let mut form = controller();
        form.on_field_change(FieldId::Email, "bad", ms(0));
        form.on_field_change(FieldId::Name, "N4me", ms(600));
        // Editing the name does not push back the email check
        assert_eq!(form.advance(ms(800)), vec![FieldId::Email]);
        assert!(form.state().email.error_visible);
        assert!(!form.state().name.error_visible);
        assert_eq!(form.advance(ms(1400)), vec![FieldId::Name]);
        assert!(form.state().name.error_visible);
    }

    #[test]
    fn custom_debounce_is_honoured() {
        let mut form = FormController::new(&FormConfig {
            debounce_ms: 500,
            ..FormConfig::default()
        });
        form.on_field_change(FieldId::Name, "1", ms(0));
        assert_eq!(form.advance(ms(500)), vec![FieldId::Name]);
    }

    #[test]
    fn disabled_submit_never_touches_store() {
        let mut form = controller();
        let mut auth = auth();
        let mut nav = NavigationStack::default();
        form.on_field_change(FieldId::Email, "ann@x.co", ms(0));
        assert_eq!(form.submit(&mut auth, &mut nav), Err(SubmitError::Disabled));
        assert!(auth.store().is_empty());
        assert_eq!(nav.current(), &Route::Signup);
    }

    #[test]
    fn register_navigates_with_entered_name() {
        let mut form = controller();
        let mut auth = auth();
        let mut nav = NavigationStack::default();
        fill_register(&mut form, ms(0));

        let route = form.submit(&mut auth, &mut nav).unwrap();
        assert_eq!(route, Route::Main { name: "Ann".to_owned() });
        assert_eq!(nav.current(), &route);
        assert_eq!(form.pending_checks(), 0);
    }

    #[test]
    fn login_navigates_with_stored_name() {
        let mut auth = auth();
        auth.register("Ann", "ann@x.co", "secret1").unwrap();

        let mut form = controller();
        let mut nav = NavigationStack::default();
        form.set_mode(Mode::Login);
        form.on_field_change(FieldId::Email, "ann@x.co", ms(0));
        form.on_field_change(FieldId::Password, "secret1", ms(0));

        let route = form.submit(&mut auth, &mut nav).unwrap();
        assert_eq!(route, Route::Main { name: "Ann".to_owned() });
    }

    #[test]
    fn auth_failure_is_surfaced_then_cleared_by_next_edit() {
        let mut auth = auth();
        let mut form = controller();
        let mut nav = NavigationStack::default();
        form.set_mode(Mode::Login);
        form.on_field_change(FieldId::Email, "ann@x.co", ms(0));
        form.on_field_change(FieldId::Password, "secret1", ms(0));

        let err = form.submit(&mut auth, &mut nav).unwrap_err();
        assert_eq!(err, SubmitError::Auth(AuthError::UserNotFound));
        assert_eq!(form.state().auth_error.as_deref(), Some("User not found"));
        assert_eq!(nav.current(), &Route::Signup);

        form.on_field_change(FieldId::Password, "secret", ms(100));
        assert_eq!(form.state().auth_error, None);
    }

    #[test]
    fn existing_user_cannot_register_again() {
        let mut auth = auth();
        auth.register("Ann", "ann@x.co", "secret1").unwrap();
        let mut form = controller();
        let mut nav = NavigationStack::default();
        fill_register(&mut form, ms(0));

        assert_eq!(
            form.submit(&mut auth, &mut nav),
            Err(SubmitError::Auth(AuthError::UserExists))
        );
        assert_eq!(
            form.state().auth_error.as_deref(),
            Some("Such user already exists, please log in instead")
        );
    }

    #[test]
    fn mode_switch_keeps_credentials() {
        let mut form = controller();
        fill_register(&mut form, ms(0));
        form.set_mode(Mode::Login);
        assert_eq!(form.state().email.raw_value, "ann@x.co");
        assert_eq!(form.state().password.raw_value, "secret1");
        assert!(form.can_submit());
    }
}
