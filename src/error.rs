//! Error types for Qoid trees, the markup codec and persistence.
//!
//! Every fallible operation in the crate returns [`Result`], whose error is
//! the single [`Error`] enum below.
//!
//! ## Error Categories
//!
//! - **Lookup Errors**: [`Error::OutOfRange`] and [`Error::KeyNotFound`] from container access
//! - **Kind Errors**: [`Error::TypeMismatch`] when combining incompatible nodes
//! - **Codec Errors**: [`Error::Format`] for markup text, [`Error::MalformedDocument`] for JSON
//! - **Filesystem Errors**: [`Error::NotFound`], [`Error::Io`], [`Error::UnsupportedExtension`],
//!   [`Error::InvalidName`] and [`Error::Attached`]
//!
//! ## Examples
//!
//! ```rust
//! use qoid::{parse_collection, Error};
//!
//! let result = parse_collection("notes", "stray: property\n");
//! assert!(matches!(result, Err(Error::Format { line: 1, .. })));
//! ```

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Positional access outside the bounds of a value-list
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    /// Tag lookup found no matching child
    #[error("no child tagged '{0}'")]
    KeyNotFound(String),

    /// Operands of a dynamic operation have incompatible node kinds
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A JSON document does not have the Qoid interchange shape
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Qoid markup text could not be parsed
    #[error("format error at line {line}: {msg}\n{context}")]
    Format {
        line: usize,
        msg: String,
        context: String,
    },

    /// The path handed to `open` does not exist
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading or writing failed
    #[error("IO error at {}: {msg}", .path.display())]
    Io { path: PathBuf, msg: String },

    /// The file or folder extension is not one Qoid persistence recognizes
    #[error("unsupported extension: {}", .0.display())]
    UnsupportedExtension(PathBuf),

    /// A tag cannot name a single file or folder inside its register
    #[error("tag '{0}' is not a valid file or folder name")]
    InvalidName(String),

    /// The node is owned by a Register and must be resolved or saved through it
    #[error("'{0}' belongs to a register; save or resolve it through its owner")]
    Attached(String),
}

impl Error {
    /// Creates an out-of-range error for a value-list of length `len`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qoid::Error;
    ///
    /// let err = Error::out_of_range(5, 2);
    /// assert!(err.to_string().contains("index 5"));
    /// ```
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Error::OutOfRange { index, len }
    }

    /// Creates a tag lookup miss.
    pub fn key_not_found(tag: &str) -> Self {
        Error::KeyNotFound(tag.to_string())
    }

    /// Creates a kind mismatch between the `expected` and `found` node kinds.
    pub fn type_mismatch(expected: impl ToString, found: impl ToString) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates a malformed-document error for a JSON shape violation.
    pub fn malformed(msg: impl ToString) -> Self {
        Error::MalformedDocument(msg.to_string())
    }

    /// Creates a format error pointing at a 1-based line and its text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qoid::Error;
    ///
    /// let err = Error::format(3, "property outside of a qoid", "name: value");
    /// assert!(err.to_string().contains("line 3"));
    /// assert!(err.to_string().contains("name: value"));
    /// ```
    pub fn format(line: usize, msg: &str, context: &str) -> Self {
        Error::Format {
            line,
            msg: msg.to_string(),
            context: context.to_string(),
        }
    }

    /// Converts an I/O failure on `path`, keeping missing paths distinct.
    pub fn io(path: &Path, err: &io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            return Error::NotFound(path.to_path_buf());
        }
        Error::Io {
            path: path.to_path_buf(),
            msg: err.to_string(),
        }
    }

    /// Creates an invalid-name error for a tag that would leave its folder.
    pub fn invalid_name(tag: &str) -> Self {
        Error::InvalidName(tag.to_string())
    }

    /// Creates an unsupported-extension error for `path`.
    pub fn unsupported_extension(path: &Path) -> Self {
        Error::UnsupportedExtension(path.to_path_buf())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedDocument(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let mapped = Error::io(Path::new("missing.cxr"), &err);
        assert!(matches!(mapped, Error::NotFound(p) if p == Path::new("missing.cxr")));
    }

    #[test]
    fn test_io_other_keeps_message() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let mapped = Error::io(Path::new("locked.cxr"), &err);
        assert!(mapped.to_string().contains("denied"));
        assert!(mapped.to_string().contains("locked.cxr"));
    }

    #[test]
    fn test_json_error_is_malformed_document() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(Error::from(err), Error::MalformedDocument(_)));
    }
}
