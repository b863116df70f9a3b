//! Settings upload validation.
//!
//! Flight controller settings are submitted as a pair: the configurator's GUI
//! backup and the CLI dump. Supplying only one of them is rejected, since the
//! two describe the same configuration and are stored together.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::dump::{self, RawSettings};
use crate::error::{Error, Result};

/// A GUI backup / CLI dump pair, either of which may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpload {
    /// Contents of the configurator GUI backup.
    pub gui_backup: Option<String>,
    /// Contents of the CLI dump.
    pub cli_dump: Option<String>,
}

impl SettingsUpload {
    /// Create an upload from in-memory contents.
    #[must_use]
    pub fn new(gui_backup: Option<String>, cli_dump: Option<String>) -> Self {
        Self {
            gui_backup,
            cli_dump,
        }
    }

    /// Read an upload from files.
    ///
    /// The pair is validated before anything is read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteUpload`] if only one path is given, or
    /// [`Error::DumpRead`] if a file can't be read.
    pub fn read(gui_backup: Option<&Path>, cli_dump: Option<&Path>) -> Result<Self> {
        if gui_backup.is_some() != cli_dump.is_some() {
            return Err(Error::IncompleteUpload);
        }
        Ok(Self {
            gui_backup: gui_backup.map(read_text).transpose()?,
            cli_dump: cli_dump.map(read_text).transpose()?,
        })
    }

    /// Check if nothing was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gui_backup.is_none() && self.cli_dump.is_none()
    }

    /// Check that both halves are supplied, or neither.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteUpload`] when exactly one is supplied.
    pub fn validate(&self) -> Result<()> {
        if self.gui_backup.is_some() == self.cli_dump.is_some() {
            Ok(())
        } else {
            Err(Error::IncompleteUpload)
        }
    }

    /// Parse the CLI dump, if any.
    #[must_use]
    pub fn raw_settings(&self) -> Option<RawSettings> {
        self.cli_dump.as_deref().map(dump::parse)
    }
}

/// Read a dump or backup file as text.
///
/// # Errors
///
/// Returns [`Error::DumpRead`] if the file can't be read.
pub fn read_text(path: &Path) -> Result<String> {
    debug!("Reading {}", path.display());
    std::fs::read_to_string(path).map_err(|source| Error::DumpRead {
        path: PathBuf::from(path),
        source,
    })
}
