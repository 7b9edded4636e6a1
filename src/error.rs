//! Error types for a generator run.
//!
//! Only [`DiscoveryError`] ends a run. The other three are scoped to one file
//! (or one directive of one declaration) and are reported while the run moves
//! on to the next input.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::generator::DirectiveKind;

/// The input tree could not be enumerated or read.
#[derive(Debug)]
pub enum DiscoveryError {
    /// The walk itself failed (missing root, unreadable directory)
    Walk {
        /// Path the walker was visiting, when known
        path: Option<PathBuf>,
        /// Underlying error message
        message: String,
    },
    /// A discovered source file could not be read
    Read {
        /// File that failed to read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::Walk {
                path: Some(path),
                message,
            } => write!(f, "cannot enumerate {}: {}", path.display(), message),
            DiscoveryError::Walk {
                path: None,
                message,
            } => write!(f, "cannot enumerate source tree: {message}"),
            DiscoveryError::Read { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoveryError::Read { source, .. } => Some(source),
            DiscoveryError::Walk { .. } => None,
        }
    }
}

/// A source file could not be scanned into declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
    /// What went wrong
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        ParseError {
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Rendering one directive for one declaration failed.
#[derive(Debug)]
pub struct RenderError {
    /// Declaration being rendered
    pub declaration: String,
    /// Directive being rendered
    pub directive: DirectiveKind,
    /// Template engine error
    pub source: askama::Error,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to render {} for {}: {}",
            self.directive, self.declaration, self.source
        )
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Writing or formatting a generated artifact failed.
///
/// By the time this error is returned the artifact has been removed again.
#[derive(Debug)]
pub enum EmitError {
    /// The artifact template could not be rendered
    Render(askama::Error),
    /// The artifact could not be written
    Write {
        /// Artifact path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
    /// A stale artifact could not be inspected or removed
    Remove {
        /// Artifact path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
    /// The formatter could not be started or waited on
    FormatterSpawn {
        /// Formatter program
        program: String,
        /// Underlying I/O error
        source: io::Error,
    },
    /// The formatter exited unsuccessfully
    FormatterFailed {
        /// Formatter program
        program: String,
        /// Exit code, if the process exited normally
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },
    /// The formatter did not finish in time and was killed
    FormatterTimeout {
        /// Formatter program
        program: String,
        /// Configured limit in seconds
        seconds: u64,
    },
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitError::Render(err) => write!(f, "failed to render artifact: {err}"),
            EmitError::Write { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            EmitError::Remove { path, source } => {
                write!(f, "failed to remove stale {}: {}", path.display(), source)
            }
            EmitError::FormatterSpawn { program, source } => {
                write!(f, "failed to run formatter `{program}`: {source}")
            }
            EmitError::FormatterFailed {
                program,
                code,
                stderr,
            } => {
                match code {
                    Some(code) => write!(f, "formatter `{program}` exited with status {code}")?,
                    None => write!(f, "formatter `{program}` was terminated by a signal")?,
                }
                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, ": {stderr}")?;
                }
                Ok(())
            }
            EmitError::FormatterTimeout { program, seconds } => {
                write!(f, "formatter `{program}` did not finish within {seconds}s")
            }
        }
    }
}

impl std::error::Error for EmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EmitError::Render(err) => Some(err),
            EmitError::Write { source, .. }
            | EmitError::Remove { source, .. }
            | EmitError::FormatterSpawn { source, .. } => Some(source),
            EmitError::FormatterFailed { .. } | EmitError::FormatterTimeout { .. } => None,
        }
    }
}

/// Why a single file was skipped.
#[derive(Debug)]
pub enum FileError {
    Parse(ParseError),
    Emit(EmitError),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::Parse(err) => write!(f, "parse error at {err}"),
            FileError::Emit(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Parse(err) => Some(err),
            FileError::Emit(err) => Some(err),
        }
    }
}

impl From<ParseError> for FileError {
    fn from(err: ParseError) -> Self {
        FileError::Parse(err)
    }
}

impl From<EmitError> for FileError {
    fn from(err: EmitError) -> Self {
        FileError::Emit(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new(3, 7, "expected field name");
        assert_eq!(err.to_string(), "3:7: expected field name");
    }

    #[test]
    fn test_formatter_failed_display_includes_stderr() {
        let err = EmitError::FormatterFailed {
            program: "goimports".to_string(),
            code: Some(2),
            stderr: "x.go:3:1: expected declaration\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "formatter `goimports` exited with status 2: x.go:3:1: expected declaration"
        );
    }

    #[test]
    fn test_file_error_wraps_parse_error() {
        let err: FileError = ParseError::new(1, 1, "expected package clause").into();
        assert_eq!(err.to_string(), "parse error at 1:1: expected package clause");
    }
}
