// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Non-empty string validation for provider credentials
//!
//! [`NonEmptyString`] holds values such as the indexing API key that must be
//! present for a client to work at all. Rejecting blank values when the
//! configuration is read means a missing key is reported at startup instead of
//! as a 401 on the first wallet check.
//!
//! ```rust
//! use external_apis::NonEmptyString;
//!
//! let api_key = NonEmptyString::new("os-live-1234").unwrap();
//! assert_eq!(api_key.as_str(), "os-live-1234");
//!
//! assert!(NonEmptyString::new("").is_err());
//! assert!(NonEmptyString::new("  \t ").is_err());
//! ```

use core::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// A string that contains at least one non-whitespace character
///
/// The value is kept as given; surrounding whitespace is not stripped.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct NonEmptyString(Box<str>);

impl NonEmptyString {
    /// Create a new `NonEmptyString`
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if `s` is empty or whitespace-only
    pub fn new(s: impl Into<String>) -> Result<Self, String> {
        let s = s.into();
        if s.trim().is_empty() {
            Err("value cannot be empty or whitespace-only".to_string())
        } else {
            Ok(NonEmptyString(s.into_boxed_str()))
        }
    }

    /// Get the contained value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Credentials end up in config dumps and request logs, so Debug never prints them.
impl fmt::Debug for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NonEmptyString(<{} chars>)", self.0.chars().count())
    }
}

impl fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NonEmptyString {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for NonEmptyString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
