//! Recompute-on-change comparison session.
//!
//! A page that shows one build, or two builds side by side, gets new dump
//! text and part selections whenever the underlying build records change.
//! [`ComparisonSession`] keeps the latest inputs and re-parses a dump only
//! when its content actually changed. Reports are always rebuilt from the
//! current inputs by calling the pure functions again.

use tracing::debug;

use crate::config::DisplayConfig;
use crate::deps::{Comparison, DependencySpec};
use crate::dump::{self, RawSettings};
use crate::parts::PartSelection;
use crate::pid::PidEncoding;
use crate::report::ComparisonReport;

/// A parsed dump together with the fingerprint of its text.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDump {
    fingerprint: String,
    raw: RawSettings,
}

impl LoadedDump {
    /// Parse a dump.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            fingerprint: Self::compute_fingerprint(text),
            raw: dump::parse(text),
        }
    }

    /// Compute the BLAKE3 fingerprint of dump text.
    #[must_use]
    pub fn compute_fingerprint(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    /// Fingerprint of the text this dump was parsed from.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Raw settings.
    #[must_use]
    pub fn raw(&self) -> &RawSettings {
        &self.raw
    }
}

/// Holds the inputs of a build comparison.
#[derive(Debug, Clone, Default)]
pub struct ComparisonSession {
    primary: Option<LoadedDump>,
    secondary: Option<LoadedDump>,
    primary_parts: Option<PartSelection>,
    secondary_parts: Option<PartSelection>,
}

impl ComparisonSession {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the primary build's dump. Returns `true` if it changed.
    pub fn load_primary(&mut self, text: &str) -> bool {
        Self::load(&mut self.primary, text, "primary")
    }

    /// Load the secondary build's dump. Returns `true` if it changed.
    pub fn load_secondary(&mut self, text: &str) -> bool {
        Self::load(&mut self.secondary, text, "secondary")
    }

    /// Stop comparing against a secondary build.
    pub fn clear_secondary(&mut self) {
        self.secondary = None;
        self.secondary_parts = None;
    }

    /// Set the primary build's part selections.
    pub fn set_primary_parts(&mut self, parts: PartSelection) {
        self.primary_parts = Some(parts);
    }

    /// Set the secondary build's part selections.
    pub fn set_secondary_parts(&mut self, parts: PartSelection) {
        self.secondary_parts = Some(parts);
    }

    /// The primary dump, if loaded.
    #[must_use]
    pub fn primary(&self) -> Option<&LoadedDump> {
        self.primary.as_ref()
    }

    /// The secondary dump, if loaded.
    #[must_use]
    pub fn secondary(&self) -> Option<&LoadedDump> {
        self.secondary.as_ref()
    }

    /// Current comparison, or `None` before a primary dump is loaded.
    #[must_use]
    pub fn comparison(&self, spec: DependencySpec) -> Option<Comparison<'_>> {
        let primary = self.primary.as_ref()?;
        Some(Comparison {
            primary_raw: primary.raw(),
            secondary_raw: self.secondary.as_ref().map(LoadedDump::raw),
            primary_parts: self.primary_parts.as_ref(),
            secondary_parts: self.secondary_parts.as_ref(),
            spec,
        })
    }

    /// Build a report from the current inputs.
    #[must_use]
    pub fn report(&self, spec: DependencySpec, display: &DisplayConfig) -> Option<ComparisonReport> {
        self.comparison(spec)
            .map(|comparison| ComparisonReport::build(&comparison, display))
    }

    fn load(slot: &mut Option<LoadedDump>, text: &str, side: &'static str) -> bool {
        let fingerprint = LoadedDump::compute_fingerprint(text);
        if slot.as_ref().is_some_and(|d| d.fingerprint == fingerprint) {
            debug!(side, "Dump unchanged; keeping parsed settings");
            return false;
        }

        let loaded = LoadedDump::new(text);
        debug!(
            side,
            settings = loaded.raw.len(),
            encoding = %PidEncoding::detect(&loaded.raw),
            "Loaded dump"
        );
        *slot = Some(loaded);
        true
    }
}
