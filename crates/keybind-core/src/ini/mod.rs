//! Comment-preserving INI configuration store.
//!
//! # File format
//!
//! ```text
//! [Audio]
//! SFX=1
//! ;Music=0
//! ```
//!
//! - A section line is `[Name]`.
//! - An entry is `key=value`; whitespace around `=` is ignored when reading.
//! - A `;` in front of the key disables the entry without losing its value.
//!
//! Every write rewrites the whole file.  Lines that were not touched keep their
//! exact original bytes; rewritten lines end in `\r\n`.
//!
//! # Errors without exceptions
//!
//! The callers of this store are fire-and-forget menu actions that cannot do
//! anything useful with an error.  So [`ConfigFile`] never returns one from
//! `open`, `read`, `write` or `comment_out`.  Failures are recorded in a shared
//! [`Diagnostics`] context, from which a host can fetch a formatted message
//! and a synthetic backtrace to display.
//!
//! [`ConfigFile`]: file::ConfigFile
//! [`Diagnostics`]: diagnostics::Diagnostics

use std::path::PathBuf;

use thiserror::Error;

pub mod diagnostics;
pub mod document;
pub mod file;

/// Failures of the INI store.
///
/// Only [`IniError::NothingOpened`] is ever returned to a caller; the others
/// are recovered locally and recorded in [`diagnostics::Diagnostics`].
#[derive(Debug, Error)]
pub enum IniError {
    /// The file did not exist when opened; an empty one is created instead.
    #[error("{} file could not be found!\nA new INI file will be created!", .path.display())]
    FileMissing { path: PathBuf },

    /// The replacement empty file could not be created.
    #[error("could not create {}: {source}", .path.display())]
    CreateFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but could not be read.
    #[error("could not read {}: {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rewriting the file after `write` or `comment_out` failed.
    #[error("could not write [{section}] {key} to {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        section: String,
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// No INI file has been opened through this diagnostics context.
    #[error("Failed to load INI data!\nDid you forget to open that file first?")]
    NothingOpened,
}

impl IniError {
    /// Short name of the failure class, used as the report heading.
    pub fn kind(&self) -> &'static str {
        match self {
            IniError::FileMissing { .. } => "FileMissing",
            IniError::CreateFailure { .. } => "CreateFailure",
            IniError::ReadFailure { .. } => "ReadFailure",
            IniError::WriteFailure { .. } => "WriteFailure",
            IniError::NothingOpened => "NothingOpened",
        }
    }
}
