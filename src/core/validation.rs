//! Validation for the waitlist form fields
//!
//! The email check accepts exactly what `^[^\s@]+@[^\s@]+\.[^\s@]+$` accepts:
//! a non-empty local part, a single `@`, and a domain with a dot that has at
//! least one character on each side, with no whitespace anywhere.

/// Border color of a field with valid content
pub const VALID_BORDER: &str = "#10b981";
/// Border color of a field with invalid content
pub const INVALID_BORDER: &str = "#ef4444";
/// Border color of an empty field
pub const EMPTY_BORDER: &str = "#e5e7eb";

/// Which waitlist field a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
}

/// Visual classification of a field's current content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Empty,
    Valid,
    Invalid,
}

impl FieldState {
    /// Class applied to the input, if any
    pub fn class(&self) -> Option<&'static str> {
        match self {
            FieldState::Empty => None,
            FieldState::Valid => Some("valid"),
            FieldState::Invalid => Some("invalid"),
        }
    }

    pub fn border_color(&self) -> &'static str {
        match self {
            FieldState::Empty => EMPTY_BORDER,
            FieldState::Valid => VALID_BORDER,
            FieldState::Invalid => INVALID_BORDER,
        }
    }
}

/// Validation error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty after trimming
    EmptyName,
    /// Email is empty after trimming
    EmptyEmail,
    /// Email does not look like `local@domain.tld`
    InvalidEmail,
}

impl ValidationError {
    /// The field that should receive focus
    pub fn field(&self) -> Field {
        match self {
            ValidationError::EmptyName => Field::Name,
            ValidationError::EmptyEmail | ValidationError::InvalidEmail => Field::Email,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyName => write!(f, "Please enter your name."),
            ValidationError::EmptyEmail => write!(f, "Please enter your email address."),
            ValidationError::InvalidEmail => write!(f, "Please enter a valid email address."),
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validated waitlist sign-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistEntry {
    pub name: String,
    pub email: String,
}

/// Whitespace as browsers define it for `\s` and `String.prototype.trim`
pub fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{9}'..='\u{d}'
            | ' '
            | '\u{a0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
            | '\u{feff}'
    )
}

fn trim(value: &str) -> &str {
    value.trim_matches(is_js_whitespace)
}

/// Check an email address against the simple `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(is_js_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Classify the raw content of a field
pub fn classify(field: Field, value: &str) -> FieldState {
    let trimmed = trim(value);
    if trimmed.is_empty() {
        FieldState::Empty
    } else if field == Field::Email && !is_valid_email(trimmed) {
        FieldState::Invalid
    } else {
        FieldState::Valid
    }
}

/// Validate a submission; the first failing field wins (name, then email)
pub fn validate_submission(name: &str, email: &str) -> Result<WaitlistEntry, ValidationError> {
    let name = trim(name);
    let email = trim(email);

    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(WaitlistEntry {
        name: name.to_string(),
        email: email.to_string(),
    })
}
