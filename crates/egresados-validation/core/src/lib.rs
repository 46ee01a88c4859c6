//! Egresados Validation Core
//!
//! Pure Rust form validation and confirmation-dialog state, compatible with
//! both std and no_std environments. The browser shell (WASM) and the server
//! both build on these types, so a matrícula accepted in the browser is
//! accepted by the server and vice versa.
//!
//! Nothing in this crate touches the DOM. Every handler returns a list of
//! [`Effect`]s that the caller applies.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod dialog;
pub mod field;
pub mod form;
pub mod identifier;
pub mod ids;
pub mod search;
pub mod timer;

#[cfg(feature = "garde")]
pub mod garde_validators;

pub use dialog::{
    delete_path, DialogContext, DialogController, DialogView, StatusLabel, TriggerMetadata,
    TriggerRegistry,
};
pub use field::{classify, FieldKind, FieldSpec, FieldState, FieldStatus};
pub use form::{Effect, FormAction, FormConfig, FormValidator, SubmitOutcome, REQUIRED_MESSAGE};
pub use identifier::{check, sanitize, IdentifierError, IdentifierRule, RuleParseError};
pub use search::{filter_rows, row_matches};
pub use timer::{TimerKey, TimerSlots};

#[cfg(feature = "garde")]
pub use garde_validators::*;
