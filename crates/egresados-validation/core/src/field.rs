//! Per-field validation state

use alloc::string::{String, ToString};

use crate::identifier::{check, IdentifierRule};

/// Tri-state status shown next to an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldStatus {
    #[default]
    Neutral,
    Valid,
    Invalid,
}

impl FieldStatus {
    /// Bootstrap class for the input, if any
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            FieldStatus::Neutral => None,
            FieldStatus::Valid => Some("is-valid"),
            FieldStatus::Invalid => Some("is-invalid"),
        }
    }
}

/// Status plus the inline message, if one should be shown
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldState {
    pub status: FieldStatus,
    pub message: Option<String>,
}

impl FieldState {
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn valid() -> Self {
        Self {
            status: FieldStatus::Valid,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            status: FieldStatus::Invalid,
            message: Some(message.into()),
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.status == FieldStatus::Invalid
    }
}

/// What kind of rule a field is subject to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Identifier,
}

/// Static description of one form input, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            kind: FieldKind::Text,
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            kind: FieldKind::Identifier,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Classify a field's current value
///
/// Empty (after trimming) is always neutral; requiredness is only enforced
/// on submit so the user is not shouted at while tabbing through the form.
pub fn classify(value: &str, kind: FieldKind, rule: IdentifierRule) -> FieldState {
    let value = value.trim();

    if value.is_empty() {
        return FieldState::neutral();
    }

    match kind {
        FieldKind::Text => FieldState::valid(),
        FieldKind::Identifier => match check(value, rule) {
            Ok(()) => FieldState::valid(),
            Err(e) => FieldState::invalid(e.to_string()),
        },
    }
}
