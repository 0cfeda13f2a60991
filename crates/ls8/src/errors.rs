//! Structured error reporting for program loading.
//!
//! Errors format for stderr in the usual style:
//! ```text
//! program.ls8:4: error: invalid binary literal `10201`
//! ```

use std::fmt;
use std::path::PathBuf;

use ls8_core::Fault;
use thiserror::Error;

/// Process exit status when the program file does not exist.
pub const EXIT_FILE_NOT_FOUND: i32 = 2;
/// Process exit status for every other load or runtime failure.
pub const EXIT_FAILURE: i32 = 1;

/// A source location for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLoc {
    /// File path, when loading from disk.
    pub file: Option<PathBuf>,
    /// 1-indexed line number.
    pub line: usize,
}

impl SourceLoc {
    /// Creates a location without a file.
    #[must_use]
    pub const fn line(line: usize) -> Self {
        Self { file: None, line }
    }

    /// Attaches the file path.
    #[must_use]
    pub fn in_file(mut self, file: PathBuf) -> Self {
        self.file = Some(file);
        self
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}", file.display(), self.line),
            None => write!(f, "line {}", self.line),
        }
    }
}

/// Classification of load failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadErrorKind {
    /// Program file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Requested path.
        path: PathBuf,
    },
    /// Program file exists but could not be read.
    #[error("failed to read {}: {message}", path.display())]
    Io {
        /// Requested path.
        path: PathBuf,
        /// Underlying I/O error text.
        message: String,
    },
    /// Token is not made of `0`/`1` digits.
    #[error("invalid binary literal `{token}`")]
    InvalidLiteral {
        /// Offending token after comment and whitespace removal.
        token: String,
    },
    /// Token has more significant digits than any operand value.
    #[error("binary literal `{token}` does not fit in a byte")]
    LiteralOverflow {
        /// Offending token.
        token: String,
    },
    /// Machine rejected the value or image (`InvalidOperand`, `ProgramTooLarge`).
    #[error(transparent)]
    Machine(#[from] Fault),
}

/// A load error with optional source context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    /// The kind of error.
    pub kind: LoadErrorKind,
    /// Source location, when the error is tied to a line.
    pub location: Option<SourceLoc>,
}

impl LoadError {
    /// Creates an error without location.
    #[must_use]
    pub const fn new(kind: LoadErrorKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    /// Adds a source location.
    #[must_use]
    pub fn with_location(mut self, loc: SourceLoc) -> Self {
        self.location = Some(loc);
        self
    }

    /// Attaches `file` to an existing location.
    #[must_use]
    pub fn in_file(mut self, file: PathBuf) -> Self {
        self.location = self.location.map(|loc| loc.in_file(file));
        self
    }

    /// Exit status a command-line caller should terminate with.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self.kind {
            LoadErrorKind::FileNotFound { .. } => EXIT_FILE_NOT_FOUND,
            _ => EXIT_FAILURE,
        }
    }

    /// Formats the error for stderr output.
    #[must_use]
    pub fn format_for_stderr(&self) -> String {
        self.location.as_ref().map_or_else(
            || format!("error: {}", self.kind),
            |loc| format!("{loc}: error: {}", self.kind),
        )
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{loc}: {}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<LoadErrorKind> for LoadError {
    fn from(kind: LoadErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<Fault> for LoadError {
    fn from(fault: Fault) -> Self {
        Self::new(LoadErrorKind::Machine(fault))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ls8_core::Fault;

    use super::{LoadError, LoadErrorKind, SourceLoc, EXIT_FAILURE, EXIT_FILE_NOT_FOUND};

    #[test]
    fn file_not_found_maps_to_distinguished_exit_code() {
        let error = LoadError::new(LoadErrorKind::FileNotFound {
            path: PathBuf::from("missing.ls8"),
        });
        assert_eq!(error.exit_code(), EXIT_FILE_NOT_FOUND);
        assert_eq!(
            error.format_for_stderr(),
            "error: file not found: missing.ls8"
        );
    }

    #[test]
    fn other_errors_map_to_generic_failure() {
        let literal = LoadError::new(LoadErrorKind::InvalidLiteral {
            token: "12".into(),
        });
        let too_large = LoadError::from(Fault::ProgramTooLarge {
            len: 300,
            capacity: 256,
        });
        assert_eq!(literal.exit_code(), EXIT_FAILURE);
        assert_eq!(too_large.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn located_errors_prefix_file_and_line() {
        let error = LoadError::new(LoadErrorKind::InvalidLiteral {
            token: "0b101".into(),
        })
        .with_location(SourceLoc::line(4))
        .in_file(PathBuf::from("prog.ls8"));

        assert_eq!(
            error.format_for_stderr(),
            "prog.ls8:4: error: invalid binary literal `0b101`"
        );
        assert_eq!(
            error.to_string(),
            "prog.ls8:4: invalid binary literal `0b101`"
        );
    }

    #[test]
    fn machine_faults_display_transparently() {
        let error = LoadError::from(Fault::InvalidOperand { value: 511 })
            .with_location(SourceLoc::line(2));
        assert_eq!(
            error.to_string(),
            "line 2: operand value 511 does not fit in a byte"
        );
    }
}
