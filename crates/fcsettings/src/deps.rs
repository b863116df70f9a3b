//! Dependency-aware comparability.
//!
//! A difference between two builds' values only means something when the
//! settings and parts it depends on are the same on both sides. For example,
//! the scale of the PID gains changes with `pid_controller`, so two builds on
//! different controllers can't have their gains compared.
//!
//! The dependency table is static. Fields that aren't listed are never
//! comparable.
//!
//! # Example
//!
//! ```
//! use fcsettings::deps::{is_comparable, DependencySpec};
//! use fcsettings::dump;
//!
//! let primary = dump::parse("set pid_controller = 0\nset p_roll = 40");
//! let secondary = dump::parse("set pid_controller = 0\nset p_roll = 45");
//! let spec = DependencySpec::builtin();
//!
//! assert!(is_comparable("p_roll", &primary, Some(&secondary), None, None, &spec));
//! assert!(!is_comparable("p_roll", &primary, None, None, None, &spec));
//! ```

use serde::Serialize;
use tracing::trace;

use crate::dump::RawSettings;
use crate::parts::{PartSelection, BLACKBOX, FLIGHT_CONTROLLER, RECEIVER};
use crate::pid::PID_CONTROLLER_FIELD;
use crate::tuning::LOOPTIME_FIELD;

/// What must match between two builds before a field can be compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Dependency {
    /// Raw firmware fields that must have equal values.
    #[serde(skip_serializing_if = "no_deps")]
    pub settings_deps: &'static [&'static str],
    /// Part categories that must have the same selected part.
    #[serde(skip_serializing_if = "no_deps")]
    pub part_deps: &'static [&'static str],
}

impl Dependency {
    /// Dependency on raw settings only.
    #[must_use]
    pub const fn settings(settings_deps: &'static [&'static str]) -> Self {
        Self {
            settings_deps,
            part_deps: &[],
        }
    }

    /// Dependency on part selections only.
    #[must_use]
    pub const fn parts(part_deps: &'static [&'static str]) -> Self {
        Self {
            settings_deps: &[],
            part_deps,
        }
    }

    /// Dependency on both raw settings and part selections.
    #[must_use]
    pub const fn both(
        settings_deps: &'static [&'static str],
        part_deps: &'static [&'static str],
    ) -> Self {
        Self {
            settings_deps,
            part_deps,
        }
    }

    fn settings_match(&self, primary: &RawSettings, secondary: &RawSettings) -> bool {
        self.settings_deps
            .iter()
            .all(|dep| primary.get(dep) == secondary.get(dep))
    }

    fn parts_match(
        &self,
        primary: Option<&PartSelection>,
        secondary: Option<&PartSelection>,
    ) -> bool {
        if self.part_deps.is_empty() {
            return true;
        }
        let (Some(primary), Some(secondary)) = (primary, secondary) else {
            return false;
        };
        self.part_deps
            .iter()
            .all(|category| primary.get(category) == secondary.get(category))
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn no_deps(deps: &&[&str]) -> bool {
    deps.is_empty()
}

const PID_DEPS: Dependency = Dependency::settings(&[PID_CONTROLLER_FIELD]);
const BLACKBOX_RATE_DEPS: Dependency = Dependency::both(&[LOOPTIME_FIELD], &[BLACKBOX]);

const BUILTIN: &[(&str, Dependency)] = &[
    ("p_roll", PID_DEPS),
    ("i_roll", PID_DEPS),
    ("d_roll", PID_DEPS),
    ("p_pitch", PID_DEPS),
    ("i_pitch", PID_DEPS),
    ("d_pitch", PID_DEPS),
    ("p_yaw", PID_DEPS),
    ("i_yaw", PID_DEPS),
    ("d_yaw", PID_DEPS),
    (
        "telemetry_inversion",
        Dependency::parts(&[FLIGHT_CONTROLLER, RECEIVER]),
    ),
    ("blackbox_device", Dependency::parts(&[BLACKBOX])),
    ("blackbox_rate_num", BLACKBOX_RATE_DEPS),
    ("blackbox_rate_denom", BLACKBOX_RATE_DEPS),
];

/// Static table of field dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencySpec {
    entries: &'static [(&'static str, Dependency)],
}

impl Default for DependencySpec {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DependencySpec {
    /// The dependency table for flight-controller settings.
    #[must_use]
    pub const fn builtin() -> Self {
        Self { entries: BUILTIN }
    }

    /// A table with custom entries.
    #[must_use]
    pub const fn new(entries: &'static [(&'static str, Dependency)]) -> Self {
        Self { entries }
    }

    /// Look up the dependency declared for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Dependency> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, dep)| dep)
    }

    /// Iterate over declared fields in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static Dependency)> {
        self.entries.iter().map(|(name, dep)| (*name, dep))
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for DependencySpec {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Decide whether `field` can be compared between two builds.
///
/// Returns `false` when there is no secondary build or the field has no
/// entry in `spec`. Otherwise every declared settings dependency must have an
/// identical raw value on both sides (absent on both counts as identical),
/// and every declared part category must have the same selected part.
#[must_use]
pub fn is_comparable(
    field: &str,
    primary_raw: &RawSettings,
    secondary_raw: Option<&RawSettings>,
    primary_parts: Option<&PartSelection>,
    secondary_parts: Option<&PartSelection>,
    spec: &DependencySpec,
) -> bool {
    let Some(secondary_raw) = secondary_raw else {
        return false;
    };
    let Some(dep) = spec.get(field) else {
        trace!(field, "No dependency entry; not comparable");
        return false;
    };

    let comparable = dep.settings_match(primary_raw, secondary_raw)
        && dep.parts_match(primary_parts, secondary_parts);
    trace!(field, comparable, "Checked field dependencies");
    comparable
}

/// The two sides of a build comparison.
///
/// Bundles the arguments of [`is_comparable`] so callers can query one field
/// at a time.
#[derive(Debug, Clone, Copy)]
pub struct Comparison<'a> {
    /// Primary build's raw settings.
    pub primary_raw: &'a RawSettings,
    /// Secondary build's raw settings, if any.
    pub secondary_raw: Option<&'a RawSettings>,
    /// Primary build's part selections.
    pub primary_parts: Option<&'a PartSelection>,
    /// Secondary build's part selections.
    pub secondary_parts: Option<&'a PartSelection>,
    /// Dependency table.
    pub spec: DependencySpec,
}

impl<'a> Comparison<'a> {
    /// Compare against nothing; no field is comparable.
    #[must_use]
    pub fn single(primary_raw: &'a RawSettings) -> Self {
        Self {
            primary_raw,
            secondary_raw: None,
            primary_parts: None,
            secondary_parts: None,
            spec: DependencySpec::builtin(),
        }
    }

    /// Compare two builds' settings with the builtin table.
    #[must_use]
    pub fn new(primary_raw: &'a RawSettings, secondary_raw: &'a RawSettings) -> Self {
        Self {
            secondary_raw: Some(secondary_raw),
            ..Self::single(primary_raw)
        }
    }

    /// Attach part selections.
    #[must_use]
    pub fn with_parts(
        mut self,
        primary_parts: &'a PartSelection,
        secondary_parts: &'a PartSelection,
    ) -> Self {
        self.primary_parts = Some(primary_parts);
        self.secondary_parts = Some(secondary_parts);
        self
    }

    /// Use a different dependency table.
    #[must_use]
    pub fn with_spec(mut self, spec: DependencySpec) -> Self {
        self.spec = spec;
        self
    }

    /// Check if there is a secondary build.
    #[must_use]
    pub fn has_secondary(&self) -> bool {
        self.secondary_raw.is_some()
    }

    /// See [`is_comparable`].
    #[must_use]
    pub fn is_comparable(&self, field: &str) -> bool {
        is_comparable(
            field,
            self.primary_raw,
            self.secondary_raw,
            self.primary_parts,
            self.secondary_parts,
            &self.spec,
        )
    }
}
