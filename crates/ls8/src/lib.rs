//! Program loading and command-line support for the LS-8 virtual machine.

use clap as _;
use serde_json as _;

/// Structured load error types and exit-status mapping.
pub mod errors;
/// Binary-literal program parsing and file loading.
pub mod loader;
