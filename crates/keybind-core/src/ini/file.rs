//! A disk-backed INI file.
//!
//! [`ConfigFile`] wraps an [`IniDocument`] and rewrites the whole file after
//! every edit.  None of its operations return an error; see the module docs of
//! [`crate::ini`] for how failures are reported.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::diagnostics::Diagnostics;
use super::document::IniDocument;
use super::IniError;

/// An open INI file.
#[derive(Debug)]
pub struct ConfigFile {
    path: PathBuf,
    document: IniDocument,
    diagnostics: Diagnostics,
}

impl ConfigFile {
    /// Opens `path`, creating an empty file if it does not exist.
    ///
    /// A missing or unreadable file yields an empty document; the failure is
    /// recorded in `diagnostics`.
    pub fn open(path: impl AsRef<Path>, diagnostics: &Diagnostics) -> Self {
        let path = path.as_ref().to_path_buf();
        diagnostics.set_last_opened(path.clone());

        let document = if path.exists() {
            match fs::read(&path) {
                Ok(bytes) => {
                    let document = IniDocument::parse_bytes(&bytes);
                    debug!(
                        path = %path.display(),
                        sections = document.sections().len(),
                        "INI file loaded"
                    );
                    document
                }
                Err(source) => {
                    warn!(path = %path.display(), error = %source, "INI file unreadable");
                    diagnostics.record(
                        &IniError::ReadFailure {
                            path: path.clone(),
                            source,
                        },
                        &["ConfigFile::open"],
                    );
                    IniDocument::new()
                }
            }
        } else {
            warn!(path = %path.display(), "INI file not found; creating an empty one");
            diagnostics.record(
                &IniError::FileMissing { path: path.clone() },
                &["ConfigFile::open"],
            );
            if let Err(source) = fs::write(&path, b"") {
                diagnostics.record(
                    &IniError::CreateFailure {
                        path: path.clone(),
                        source,
                    },
                    &["ConfigFile::open"],
                );
            }
            IniDocument::new()
        };

        Self {
            path,
            document,
            diagnostics: diagnostics.clone(),
        }
    }

    /// The stored value of `key`, or `default` if it is absent or empty.
    pub fn read(&self, section: &str, key: &str, default: &str) -> String {
        match self.document.get(section, key) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => default.to_string(),
        }
    }

    /// Stores `key=value` and rewrites the file.
    ///
    /// Returns the length of the value in characters, or `0` if the file could
    /// not be rewritten.  The in-memory document keeps the change either way.
    pub fn write(&mut self, section: &str, key: &str, value: impl Display) -> usize {
        let value = value.to_string();
        self.document.set(section, key, &value);
        self.persist(section, key, &value, "ConfigFile::write")
    }

    /// Disables `key` with `;` and rewrites the file.
    ///
    /// An existing entry keeps its value; a new one is written with `default`.
    /// Returns the length of the stored value, or `0` on failure.
    pub fn comment_out(&mut self, section: &str, key: &str, default: impl Display) -> usize {
        let value = self
            .document
            .comment_out(section, key, &default.to_string())
            .value()
            .to_string();
        self.persist(section, key, &value, "ConfigFile::comment_out")
    }

    /// Section names in file order.
    pub fn section_names(&self) -> Vec<String> {
        self.document.section_names().map(str::to_string).collect()
    }

    /// Path this file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed contents.
    pub fn document(&self) -> &IniDocument {
        &self.document
    }

    /// The diagnostics context failures are recorded in.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    fn persist(&self, section: &str, key: &str, value: &str, frame: &str) -> usize {
        match self.write_all_entries() {
            Ok(()) => {
                debug!(path = %self.path.display(), section, key, "INI entry written");
                value.chars().count()
            }
            Err(source) => {
                warn!(path = %self.path.display(), section, key, error = %source, "INI rewrite failed");
                self.diagnostics.record(
                    &IniError::WriteFailure {
                        path: self.path.clone(),
                        section: section.to_string(),
                        key: key.to_string(),
                        source,
                    },
                    &[frame, "ConfigFile::write_all_entries"],
                );
                0
            }
        }
    }

    fn write_all_entries(&self) -> std::io::Result<()> {
        fs::write(&self.path, self.document.render_bytes())
    }
}
