//! The contact form data contract, shared by the REST handler and the
//! submission client so both sides validate against the same rules.

use nutype::nutype;
use serde::Serialize;
use thiserror::Error;

/// Validation rules of a contact submission, in the order in which they are
/// checked.
pub static CONTACT_SUBMISSION_RULES: [FieldRule; 3] = [
    FieldRule {
        field: ContactField::Name,
        required: true,
        min_chars: 2,
        max_chars: 120,
    },
    FieldRule {
        field: ContactField::Contact,
        required: true,
        min_chars: 3,
        max_chars: 320,
    },
    FieldRule {
        field: ContactField::Message,
        required: false,
        min_chars: 0,
        max_chars: 2000,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Contact,
    Message,
}

impl ContactField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Contact => "contact",
            Self::Message => "message",
        }
    }

    pub fn rule(self) -> &'static FieldRule {
        &CONTACT_SUBMISSION_RULES[self as usize]
    }
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: ContactField,
    pub required: bool,
    pub min_chars: usize,
    pub max_chars: usize,
}

impl FieldRule {
    /// Checks a value which has already been trimmed. Lengths are counted in
    /// characters, not bytes.
    pub fn check(&self, value: &str) -> Result<(), ContactSubmissionError> {
        let len = value.chars().count();
        if len == 0 {
            return match self.required {
                true => Err(ContactSubmissionError::Missing(self.field)),
                false => Ok(()),
            };
        }
        if len < self.min_chars {
            return Err(ContactSubmissionError::TooShort {
                field: self.field,
                min: self.min_chars,
            });
        }
        if len > self.max_chars {
            return Err(ContactSubmissionError::TooLong {
                field: self.field,
                max: self.max_chars,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactSubmissionError {
    #[error("{0} is required")]
    Missing(ContactField),
    #[error("{field} must be at least {min} characters long")]
    TooShort { field: ContactField, min: usize },
    #[error("{field} must be at most {max} characters long")]
    TooLong { field: ContactField, max: usize },
    #[error("{0} is invalid")]
    Invalid(ContactField),
}

impl ContactSubmissionError {
    pub fn field(&self) -> ContactField {
        match *self {
            Self::Missing(field) | Self::Invalid(field) => field,
            Self::TooShort { field, .. } | Self::TooLong { field, .. } => field,
        }
    }
}

#[nutype(
    sanitize(trim),
    validate(predicate = |name: &str| ContactField::Name.rule().check(name).is_ok()),
    derive(Debug, Clone, PartialEq, Eq, Display, AsRef, Deref, TryFrom, Serialize)
)]
pub struct ContactName(String);

/// Free-form way to reach the sender: email address, messenger handle or
/// phone number.
#[nutype(
    sanitize(trim),
    validate(predicate = |contact: &str| ContactField::Contact.rule().check(contact).is_ok()),
    derive(Debug, Clone, PartialEq, Eq, Display, AsRef, Deref, TryFrom, Serialize)
)]
pub struct ContactHandle(String);

#[nutype(
    sanitize(trim),
    validate(predicate = |message: &str| ContactField::Message.rule().check(message).is_ok()),
    derive(Debug, Clone, PartialEq, Eq, Display, AsRef, Deref, TryFrom, Serialize)
)]
pub struct ContactMessage(String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub contact: ContactHandle,
    pub message: ContactMessage,
}

impl ContactSubmission {
    /// Validates raw form input and reports the first violated rule. A missing
    /// or blank message becomes the empty string.
    pub fn parse(
        name: Option<String>,
        contact: Option<String>,
        message: Option<String>,
    ) -> Result<Self, ContactSubmissionError> {
        Ok(Self {
            name: parse_field(ContactField::Name, name, |x| ContactName::try_new(x))?,
            contact: parse_field(ContactField::Contact, contact, |x| {
                ContactHandle::try_new(x)
            })?,
            message: parse_field(ContactField::Message, message, |x| {
                ContactMessage::try_new(x)
            })?,
        })
    }
}

fn parse_field<T, E>(
    field: ContactField,
    value: Option<String>,
    new: impl FnOnce(String) -> Result<T, E>,
) -> Result<T, ContactSubmissionError> {
    let value = value.unwrap_or_default();
    field.rule().check(value.trim())?;
    new(value).map_err(|_| ContactSubmissionError::Invalid(field))
}
