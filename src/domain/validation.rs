//! Validation rules for the signup form
//!
//! Pure predicates over the raw field text. Validation never fails: a rule
//! either matches or it does not, and the form turns that into flags.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::form::FieldId;

const EMAIL_PATTERN: &str = r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#;

const PASSWORD_PATTERN: &str = r"^[a-zA-Z0-9]{6,}$";
const NAME_PATTERN: &str = r"^[a-zA-Z]*$";

// The historical rules used `A-z`, which spans 0x41..=0x7A and therefore
// also admits `[ \ ] ^ _` and the backtick.
const LEGACY_PASSWORD_PATTERN: &str = r"^[a-zA-z0-9]{6,}$";
const LEGACY_NAME_PATTERN: &str = r"^[a-zA-z]*$";

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static PASSWORD_REGEX: OnceLock<Regex> = OnceLock::new();
static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
static LEGACY_PASSWORD_REGEX: OnceLock<Regex> = OnceLock::new();
static LEGACY_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("invalid regex pattern"))
}

/// Which character class the password and name rules accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharsetPolicy {
    /// ASCII letters (and digits for passwords) only
    #[default]
    Strict,
    /// Reproduces the `A-z` range of the first releases
    Legacy,
}

/// Set of rules applied to the form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Validator {
    charset: CharsetPolicy,
}

impl Validator {
    pub fn new(charset: CharsetPolicy) -> Self {
        Self { charset }
    }

    pub fn charset(&self) -> CharsetPolicy {
        self.charset
    }

    /// Checks `value` against the rule for `field`
    pub fn is_valid(&self, field: FieldId, value: &str) -> bool {
        match field {
            FieldId::Email => is_valid_email(value),
            FieldId::Password => self.password_regex().is_match(value),
            FieldId::Name => self.name_regex().is_match(value),
        }
    }

    fn password_regex(&self) -> &'static Regex {
        match self.charset {
            CharsetPolicy::Strict => compiled(&PASSWORD_REGEX, PASSWORD_PATTERN),
            CharsetPolicy::Legacy => compiled(&LEGACY_PASSWORD_REGEX, LEGACY_PASSWORD_PATTERN),
        }
    }

    fn name_regex(&self) -> &'static Regex {
        match self.charset {
            CharsetPolicy::Strict => compiled(&NAME_REGEX, NAME_PATTERN),
            CharsetPolicy::Legacy => compiled(&LEGACY_NAME_REGEX, LEGACY_NAME_PATTERN),
        }
    }
}

/// `local@domain` shape: dotted atoms or a quoted string, then a bracketed
/// dotted quad or a hostname ending in a label of two or more letters
pub fn is_valid_email(value: &str) -> bool {
    compiled(&EMAIL_REGEX, EMAIL_PATTERN).is_match(value)
}

/// Message shown under a field whose error is visible
pub fn error_message(field: FieldId) -> &'static str {
    match field {
        FieldId::Email => "Invalid email format",
        FieldId::Password => "At least 6 characters of letters or numbers",
        FieldId::Name => "Only letters are allowed",
    }
}
