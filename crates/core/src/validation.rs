//! Client-side validation of the registration form.
//!
//! This is a cheap, synchronous gate that keeps obviously incomplete submissions off the
//! network. The backend still validates everything it receives.

use crate::form::{FormField, FormInput};

/// Required fields, in the order they are checked. The first empty one is reported.
pub const REQUIRED_FIELDS: [FormField; 5] = [
    FormField::Name,
    FormField::FamilyName,
    FormField::BirthDate,
    FormField::IdentifierValue,
    FormField::CellPhone,
];

/// Result of validating a [`FormInput`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationVerdict {
    Valid,
    Invalid { field: FormField, message: String },
}

impl ValidationVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationVerdict::Valid)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ValidationVerdict::Valid => None,
            ValidationVerdict::Invalid { message, .. } => Some(message),
        }
    }

    /// Field that should receive focus.
    pub fn offending_field(&self) -> Option<FormField> {
        match self {
            ValidationVerdict::Valid => None,
            ValidationVerdict::Invalid { field, .. } => Some(*field),
        }
    }
}

/// Validates a form snapshot.
///
/// Checks, in order:
/// 1. every field in [`REQUIRED_FIELDS`] is non-empty
/// 2. a non-empty email looks like `local@domain.tld`
///
/// An empty email is allowed.
pub fn validate(input: &FormInput) -> ValidationVerdict {
    if let Some(field) = REQUIRED_FIELDS
        .into_iter()
        .find(|f| input.get(*f).is_empty())
    {
        return ValidationVerdict::Invalid {
            field,
            message: format!("{} is required", field.label()),
        };
    }

    if !input.email.is_empty() && !is_valid_email(&input.email) {
        return ValidationVerdict::Invalid {
            field: FormField::Email,
            message: "Please enter a valid email address".into(),
        };
    }

    ValidationVerdict::Valid
}

/// Syntactic email check: `local@domain.tld` with no whitespace and a single `@`.
///
/// The domain must contain a `.` with at least one character on each side. No attempt is
/// made to validate against RFC 5322.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    let plain = |s: &str| !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '@');
    if !plain(local) || !plain(domain) {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + c.len_utf8() < domain.len())
}
