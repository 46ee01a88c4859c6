//! Custom garde validators
//!
//! These let server-side form structs reuse the exact rules the browser
//! applies, so a request that skipped the WASM validator is still checked.
//!
//! # Example
//!
//! ```ignore
//! use garde::Validate;
//!
//! #[derive(Validate)]
//! #[garde(context(IdentifierRule))]
//! struct EgresadoForm {
//!     #[garde(custom(identifier_rule))]
//!     matricula: String,
//! }
//! ```

use alloc::string::ToString;

use crate::form::REQUIRED_MESSAGE;
use crate::identifier::{check, IdentifierRule};

/// Validator: matrícula must satisfy the page's rule (the garde context)
pub fn identifier_rule(value: &str, rule: &IdentifierRule) -> Result<(), garde::Error> {
    let value = value.trim();

    if value.is_empty() {
        return Err(garde::Error::new(REQUIRED_MESSAGE));
    }

    check(value, *rule).map_err(|e| garde::Error::new(e.to_string()))
}

/// Validator: optional phone number, 7 to 15 digits with common separators
///
/// Empty is accepted. Generic over the context so it can sit next to
/// [`identifier_rule`] in the same struct.
pub fn phone_number<C>(value: &str, _ctx: &C) -> Result<(), garde::Error> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(());
    }

    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')');
    if !value.chars().all(allowed) {
        return Err(garde::Error::new("phone may only contain digits, spaces, and + - ( )"));
    }

    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !(7..=15).contains(&digits) {
        return Err(garde::Error::new("phone must have between 7 and 15 digits"));
    }

    Ok(())
}
