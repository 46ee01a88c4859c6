//! Matrícula (record identifier) rules
//!
//! A matrícula is digits only. The create form accepts exactly 8 digits, the
//! unified form anything from 8 to 20. Both are expressed as an
//! [`IdentifierRule`] chosen per page.

use alloc::string::String;
use core::fmt;
use core::str::FromStr;

/// Length policy for the matrícula field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierRule {
    /// Exactly `n` digits
    Exact(usize),
    /// Between `min` and `max` digits, inclusive
    Range { min: usize, max: usize },
}

impl IdentifierRule {
    /// Rule used by the "create" form
    pub const CREATE: IdentifierRule = IdentifierRule::Exact(8);

    /// Rule used by the general/unified form
    pub const UNIFIED: IdentifierRule = IdentifierRule::Range { min: 8, max: 20 };

    /// Longest value the field accepts while typing
    pub fn max_len(&self) -> usize {
        match *self {
            IdentifierRule::Exact(n) => n,
            IdentifierRule::Range { max, .. } => max,
        }
    }

    /// Shortest value that can pass the rule
    pub fn min_len(&self) -> usize {
        match *self {
            IdentifierRule::Exact(n) => n,
            IdentifierRule::Range { min, .. } => min,
        }
    }
}

impl Default for IdentifierRule {
    fn default() -> Self {
        IdentifierRule::CREATE
    }
}

/// Formats as the `data-identifier-rule` attribute syntax (`exact:8`, `range:8-20`)
impl fmt::Display for IdentifierRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            IdentifierRule::Exact(n) => write!(f, "exact:{}", n),
            IdentifierRule::Range { min, max } => write!(f, "range:{}-{}", min, max),
        }
    }
}

/// Returned when a rule attribute cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleParseError(pub String);

impl fmt::Display for RuleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid identifier rule '{}'", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RuleParseError {}

impl FromStr for IdentifierRule {
    type Err = RuleParseError;

    /// Parse `exact:N` or `range:MIN-MAX`
    ///
    /// # Examples
    /// ```
    /// use egresados_validation_core::IdentifierRule;
    /// assert_eq!("exact:8".parse(), Ok(IdentifierRule::Exact(8)));
    /// assert_eq!("range:8-20".parse(), Ok(IdentifierRule::Range { min: 8, max: 20 }));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || RuleParseError(String::from(s));
        let (kind, spec) = s.trim().split_once(':').ok_or_else(err)?;

        match kind {
            "exact" => {
                let n: usize = spec.trim().parse().map_err(|_| err())?;
                if n == 0 {
                    return Err(err());
                }
                Ok(IdentifierRule::Exact(n))
            }
            "range" => {
                let (min, max) = spec.split_once('-').ok_or_else(err)?;
                let min: usize = min.trim().parse().map_err(|_| err())?;
                let max: usize = max.trim().parse().map_err(|_| err())?;
                if min == 0 || min > max {
                    return Err(err());
                }
                Ok(IdentifierRule::Range { min, max })
            }
            _ => Err(err()),
        }
    }
}

/// Why a matrícula failed its rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierError {
    /// Shorter than an exact-length rule
    MissingDigits { missing: usize },
    /// Longer than an exact-length rule
    TooLong { expected: usize, actual: usize },
    /// Outside a range rule
    OutOfRange { min: usize, max: usize, actual: usize },
    /// Contains something other than ASCII digits
    NonDigit,
}

impl fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            IdentifierError::MissingDigits { missing } => {
                write!(f, "need {} more digits", missing)
            }
            IdentifierError::TooLong { expected, .. } => {
                write!(f, "must have exactly {} digits", expected)
            }
            IdentifierError::OutOfRange { min, max, actual } => {
                write!(f, "length must be {}–{}, currently {}", min, max, actual)
            }
            IdentifierError::NonDigit => write!(f, "digits only"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IdentifierError {}

/// Strip every non-digit character and truncate to the rule's maximum
///
/// # Examples
/// ```
/// use egresados_validation_core::{sanitize, IdentifierRule};
/// assert_eq!(sanitize("12ab34'; DROP", IdentifierRule::CREATE), "1234");
/// assert_eq!(sanitize("1234567890", IdentifierRule::CREATE), "12345678");
/// ```
pub fn sanitize(raw: &str, rule: IdentifierRule) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(rule.max_len())
        .collect()
}

/// Check a non-empty matrícula against a rule
pub fn check(value: &str, rule: IdentifierRule) -> Result<(), IdentifierError> {
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(IdentifierError::NonDigit);
    }

    // ASCII digits only past this point, so bytes == chars
    let len = value.len();

    match rule {
        IdentifierRule::Exact(n) if len < n => {
            Err(IdentifierError::MissingDigits { missing: n - len })
        }
        IdentifierRule::Exact(n) if len > n => {
            Err(IdentifierError::TooLong { expected: n, actual: len })
        }
        IdentifierRule::Exact(_) => Ok(()),
        IdentifierRule::Range { min, max } if len < min || len > max => {
            Err(IdentifierError::OutOfRange { min, max, actual: len })
        }
        IdentifierRule::Range { .. } => Ok(()),
    }
}
