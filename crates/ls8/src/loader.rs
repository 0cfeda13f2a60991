//! Program loading from the newline-delimited binary-literal format.
//!
//! Each line holds at most one token. Everything from `#` onward is a
//! comment, surrounding whitespace is ignored, and blank lines do not
//! consume an address. Every remaining token is a base-2 byte written to the
//! next address starting at 0.

use std::fs;
use std::io;
use std::path::Path;

use ls8_core::{byte_operand, Fault, Machine, MEMORY_BYTES};

use crate::errors::{LoadError, LoadErrorKind, SourceLoc};

/// A token extracted from the program text with its original location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLine<'a> {
    /// Token text with comment and whitespace removed.
    pub token: &'a str,
    /// 1-indexed line number in the original text.
    pub original_line: usize,
}

/// Extracts non-blank tokens in document order.
#[must_use]
pub fn extract_program_lines(content: &str) -> Vec<ProgramLine<'_>> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let code = line.split_once('#').map_or(line, |(code, _)| code);
            let token = code.trim();
            (!token.is_empty()).then_some(ProgramLine {
                token,
                original_line: idx + 1,
            })
        })
        .collect()
}

/// Parses one token as a base-2 byte.
///
/// # Errors
///
/// Returns [`LoadErrorKind::InvalidLiteral`] for anything but `0`/`1`
/// digits, [`Fault::InvalidOperand`] for values above 255, and
/// [`LoadErrorKind::LiteralOverflow`] when the value is too wide to report.
pub fn parse_literal(token: &str) -> Result<u8, LoadErrorKind> {
    if token.is_empty() || !token.bytes().all(|digit| matches!(digit, b'0' | b'1')) {
        return Err(LoadErrorKind::InvalidLiteral {
            token: token.to_string(),
        });
    }

    // Digits are already validated, so parsing can only fail on overflow.
    let value = u32::from_str_radix(token, 2).map_err(|_| LoadErrorKind::LiteralOverflow {
        token: token.to_string(),
    })?;
    Ok(byte_operand(value)?)
}

/// Parses program text into a memory image.
///
/// # Errors
///
/// Returns the first malformed token with its line, or
/// [`Fault::ProgramTooLarge`] located at the first byte that does not fit.
pub fn parse_program(content: &str) -> Result<Vec<u8>, LoadError> {
    let lines = extract_program_lines(content);

    if let Some(first_overflow) = lines.get(MEMORY_BYTES) {
        return Err(LoadError::from(Fault::ProgramTooLarge {
            len: lines.len(),
            capacity: MEMORY_BYTES,
        })
        .with_location(SourceLoc::line(first_overflow.original_line)));
    }

    lines
        .iter()
        .map(|line| {
            parse_literal(line.token).map_err(|kind| {
                LoadError::new(kind).with_location(SourceLoc::line(line.original_line))
            })
        })
        .collect()
}

/// Reads and parses a program file.
///
/// # Errors
///
/// Returns [`LoadErrorKind::FileNotFound`] when `path` does not exist,
/// [`LoadErrorKind::Io`] for other read failures, and any parse error with
/// the file attached to its location.
pub fn load_file(path: &Path) -> Result<Vec<u8>, LoadError> {
    let content = fs::read_to_string(path).map_err(|error| {
        let kind = if error.kind() == io::ErrorKind::NotFound {
            LoadErrorKind::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadErrorKind::Io {
                path: path.to_path_buf(),
                message: error.to_string(),
            }
        };
        LoadError::new(kind)
    })?;

    parse_program(&content).map_err(|error| error.in_file(path.to_path_buf()))
}

/// Loads a program file into `machine`, resetting it.
///
/// # Errors
///
/// Propagates [`load_file`] errors; the machine is untouched on failure.
pub fn load_into(machine: &mut Machine, path: &Path) -> Result<(), LoadError> {
    let image = load_file(path)?;
    machine.load(&image)?;
    Ok(())
}
