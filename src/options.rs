//! Configuration options for Qoid markup.
//!
//! This module provides types to customize how markup is written and read:
//!
//! - [`QoidOptions`]: Main configuration struct
//! - [`Delimiter`]: Separator between a property tag and its value
//!
//! The same options must be used to read a document as were used to write it.
//!
//! ## Examples
//!
//! ```rust
//! use qoid::{to_string_with_options, Container, Delimiter, Property, Qoid, QoidOptions};
//!
//! let mut qoid = Qoid::new("point");
//! qoid.append(Property::new("x", "1"));
//!
//! let options = QoidOptions::new().with_delimiter(Delimiter::Equals);
//! let text = to_string_with_options(&qoid, &options);
//! assert_eq!(text, "#point\nx= 1\n");
//! ```

/// Separator between a property tag and its value.
///
/// # Examples
///
/// ```rust
/// use qoid::Delimiter;
///
/// assert_eq!(Delimiter::Colon.as_char(), ':');
/// assert_eq!(Delimiter::Equals.as_char(), '=');
/// assert_eq!(Delimiter::Pipe.as_char(), '|');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Colon,
    Equals,
    Pipe,
}

impl Delimiter {
    /// Returns the character written between tag and value.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Delimiter::Colon => ':',
            Delimiter::Equals => '=',
            Delimiter::Pipe => '|',
        }
    }
}

/// Configuration options for reading and writing Qoid markup.
///
/// # Examples
///
/// ```rust
/// use qoid::{Delimiter, QoidOptions};
///
/// let options = QoidOptions::new();
/// assert_eq!(options.delimiter, Delimiter::Colon);
/// assert!(!options.pretty);
///
/// let options = QoidOptions::new()
///     .with_delimiter(Delimiter::Pipe)
///     .with_pretty(true);
/// assert!(options.pretty);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QoidOptions {
    pub delimiter: Delimiter,
    /// Pretty-print JSON written by `save_json`.
    pub pretty: bool,
}

impl QoidOptions {
    /// Creates default options (colon delimiter, compact JSON).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the property delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enables or disables pretty-printed JSON output.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}
