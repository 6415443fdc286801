//! Signup/login form state
//!
//! The form is an explicit value: every keystroke, debounce expiry and mode
//! switch is a pure transition on `FormState`. Timer bookkeeping lives in the
//! app layer, this module only knows what a fired timer means.

use serde::{Deserialize, Serialize};

use crate::domain::validation::{self, Validator};

/// Identifies one input of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldId {
    Email,
    Password,
    Name,
}

impl FieldId {
    pub const ALL: [FieldId; 3] = [FieldId::Email, FieldId::Password, FieldId::Name];
}

/// Which action the form is wired to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Login,
    #[default]
    Register,
}

impl Mode {
    /// Fields rendered in this mode, in display order
    pub fn fields(self) -> &'static [FieldId] {
        match self {
            Mode::Login => &[FieldId::Email, FieldId::Password],
            Mode::Register => &[FieldId::Email, FieldId::Password, FieldId::Name],
        }
    }
}

/// State of a single input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub raw_value: String,
    pub format_valid: bool,
    pub error_visible: bool,
}

impl FormField {
    fn untouched(field: FieldId, validator: &Validator) -> Self {
        Self {
            raw_value: String::new(),
            format_valid: validator.is_valid(field, ""),
            error_visible: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.raw_value.is_empty()
    }

    /// Non-empty and matching its rule
    pub fn is_filled_and_valid(&self) -> bool {
        !self.is_empty() && self.format_valid
    }
}

/// Complete state of the signup screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub mode: Mode,
    pub email: FormField,
    pub password: FormField,
    pub name: FormField,
    /// Message of the last failed submit, cleared by the next edit
    pub auth_error: Option<String>,
}

impl FormState {
    pub fn new(validator: &Validator) -> Self {
        Self {
            mode: Mode::default(),
            email: FormField::untouched(FieldId::Email, validator),
            password: FormField::untouched(FieldId::Password, validator),
            name: FormField::untouched(FieldId::Name, validator),
            auth_error: None,
        }
    }

    pub fn field(&self, field: FieldId) -> &FormField {
        match field {
            FieldId::Email => &self.email,
            FieldId::Password => &self.password,
            FieldId::Name => &self.name,
        }
    }

    fn field_mut(&mut self, field: FieldId) -> &mut FormField {
        match field {
            FieldId::Email => &mut self.email,
            FieldId::Password => &mut self.password,
            FieldId::Name => &mut self.name,
        }
    }

    /// Applies a keystroke: new text, fresh validity, error hidden
    pub fn edit(&mut self, field: FieldId, value: &str, validator: &Validator) {
        let format_valid = validator.is_valid(field, value);
        let slot = self.field_mut(field);
        slot.raw_value = value.to_owned();
        slot.format_valid = format_valid;
        slot.error_visible = false;
        self.auth_error = None;
    }

    /// Debounce expiry for `field`
    ///
    /// Reads the validity at fire time, not at schedule time. The password
    /// error is only disclosed while registering.
    pub fn reveal_error(&mut self, field: FieldId) {
        let surfaced = field != FieldId::Password || self.mode == Mode::Register;
        let slot = self.field_mut(field);
        slot.error_visible = surfaced && !slot.format_valid;
    }

    /// Switches the field set, keeping everything already typed
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        if mode == Mode::Login {
            self.password.error_visible = false;
        }
    }

    /// Whether the submit button for the active mode is enabled
    pub fn can_submit(&self) -> bool {
        match self.mode {
            Mode::Register => {
                self.email.is_filled_and_valid()
                    && self.password.is_filled_and_valid()
                    && self.name.is_filled_and_valid()
            }
            // Password format is irrelevant for login, only presence counts
            Mode::Login => self.email.is_filled_and_valid() && !self.password.is_empty(),
        }
    }

    /// Visible error message under `field`, if any
    pub fn error_message(&self, field: FieldId) -> Option<&'static str> {
        self.field(field)
            .error_visible
            .then(|| validation::error_message(field))
    }
}
