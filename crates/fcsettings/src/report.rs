//! Side-by-side settings report.
//!
//! Groups a build's derived values into the sections of the flight
//! controller settings panel: the PID grid and controller info (Core), rates,
//! filters, and any "other" settings that differ in a meaningful way. Each
//! value carries its comparison partner and whether the difference may be
//! shown.

use std::fmt::Write as _;

use serde::Serialize;

use crate::config::DisplayConfig;
use crate::deps::Comparison;
use crate::pid::{legacy_field, Axis, PidEncoding, Term, PID_CONTROLLER_FIELD};
use crate::tuning::{
    derive_with_divisor, DerivedSettings, FILTER_FIELDS, LOOPTIME_FIELD, TPA_BREAKPOINT_FIELD,
};

/// Settings listed in the Other section when they differ and are comparable.
pub const OTHER_SETTINGS: [&str; 4] = [
    "telemetry_inversion",
    "blackbox_device",
    "blackbox_rate_num",
    "blackbox_rate_denom",
];

/// A primary value and its optional comparison partner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ValueCell {
    /// Value from the primary build.
    pub primary: Option<f64>,
    /// Value from the secondary build.
    pub secondary: Option<f64>,
    /// Fixed number of decimal places, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<usize>,
    /// Whether the two values are comparable.
    pub show_difference: bool,
}

impl ValueCell {
    /// Create a cell.
    #[must_use]
    pub fn new(primary: Option<f64>, secondary: Option<f64>, show_difference: bool) -> Self {
        Self {
            primary,
            secondary,
            precision: None,
            show_difference,
        }
    }

    /// Set the display precision.
    #[must_use]
    pub fn with_precision(mut self, precision: Option<usize>) -> Self {
        self.precision = precision;
        self
    }

    /// `secondary - primary`, when comparable and both values are known.
    #[must_use]
    pub fn difference(&self) -> Option<f64> {
        if !self.show_difference {
            return None;
        }
        Some(self.secondary? - self.primary?)
    }

    /// Format the primary value.
    #[must_use]
    pub fn format_primary(&self, unknown: &str) -> String {
        format_value(self.primary, self.precision, unknown)
    }

    /// Format the secondary value.
    #[must_use]
    pub fn format_secondary(&self, unknown: &str) -> String {
        format_value(self.secondary, self.precision, unknown)
    }

    /// Format the difference with an explicit sign.
    #[must_use]
    pub fn format_difference(&self) -> Option<String> {
        let diff = self.difference()?;
        Some(match self.precision {
            Some(precision) => format!("{diff:+.precision$}"),
            None => format!("{diff:+}"),
        })
    }
}

/// Format a value, using `unknown` for a missing one.
#[must_use]
pub fn format_value(value: Option<f64>, precision: Option<usize>, unknown: &str) -> String {
    match (value, precision) {
        (None, _) => unknown.to_string(),
        (Some(value), Some(precision)) => format!("{value:.precision$}"),
        (Some(value), None) => format!("{value}"),
    }
}

/// A labelled value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Display label.
    pub label: String,
    /// Field the value comes from.
    pub key: String,
    /// The values.
    #[serde(flatten)]
    pub cell: ValueCell,
}

impl Row {
    fn new(label: impl Into<String>, key: impl Into<String>, cell: ValueCell) -> Self {
        Self {
            label: label.into(),
            key: key.into(),
            cell,
        }
    }
}

/// One axis of the PID grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PidRow {
    /// Axis.
    pub axis: Axis,
    /// Proportional gain.
    pub p: ValueCell,
    /// Integral gain.
    pub i: ValueCell,
    /// Derivative gain.
    pub d: ValueCell,
}

impl PidRow {
    /// Cell for a term.
    #[must_use]
    pub fn cell(&self, term: Term) -> &ValueCell {
        match term {
            Term::P => &self.p,
            Term::I => &self.i,
            Term::D => &self.d,
        }
    }
}

/// Full comparison report for one build, optionally against another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Encoding of the primary build's gains.
    pub primary_encoding: PidEncoding,
    /// Encoding of the secondary build's gains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_encoding: Option<PidEncoding>,
    /// PID grid.
    pub pids: Vec<PidRow>,
    /// PID controller and loop time.
    pub core: Vec<Row>,
    /// Rates and TPA.
    pub rates: Vec<Row>,
    /// Filter cutoffs.
    pub filter: Vec<Row>,
    /// Other settings that differ and are comparable.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other: Vec<Row>,
}

impl ComparisonReport {
    /// Build the report for a comparison.
    #[must_use]
    pub fn build(comparison: &Comparison<'_>, display: &DisplayConfig) -> Self {
        let primary = derive_with_divisor(comparison.primary_raw, display.rate_divisor);
        let secondary = comparison
            .secondary_raw
            .map(|raw| derive_with_divisor(raw, display.rate_divisor));
        let secondary = secondary.as_ref();

        let cell = |name: &str, field: &str| {
            ValueCell::new(
                primary.get(name),
                secondary.and_then(|s| s.get(name)),
                comparison.is_comparable(field),
            )
        };

        let pids = Axis::ALL
            .into_iter()
            .map(|axis| {
                let gain = |term: Term| {
                    let field = legacy_field(term, axis);
                    ValueCell::new(
                        primary.pids.get(term, axis),
                        secondary.and_then(|s| s.pids.get(term, axis)),
                        comparison.is_comparable(&field),
                    )
                };
                PidRow {
                    axis,
                    p: gain(Term::P).with_precision(Some(display.pid_p_precision)),
                    i: gain(Term::I).with_precision(Some(display.pid_i_precision)),
                    d: gain(Term::D),
                }
            })
            .collect();

        let core = vec![
            Row::new(
                "PID Controller",
                PID_CONTROLLER_FIELD,
                ValueCell::new(
                    primary.pid_controller,
                    secondary.and_then(|s| s.pid_controller),
                    false,
                ),
            ),
            Row::new(
                LOOPTIME_FIELD,
                LOOPTIME_FIELD,
                ValueCell::new(primary.looptime, secondary.and_then(|s| s.looptime), false),
            ),
        ];

        let rates = [
            ("Roll", "roll_rate"),
            ("Pitch", "pitch_rate"),
            ("Yaw", "yaw_rate"),
            ("TPA", "tpa_rate"),
            ("TPA Breakpoint", TPA_BREAKPOINT_FIELD),
        ]
        .into_iter()
        .map(|(label, key)| Row::new(label, key, cell(key, key)))
        .collect();

        let filter = FILTER_FIELDS
            .into_iter()
            .map(|key| Row::new(key, key, cell(key, key)))
            .collect();

        Self {
            primary_encoding: primary.encoding,
            secondary_encoding: secondary.map(|s: &DerivedSettings| s.encoding),
            pids,
            core,
            rates,
            filter,
            other: other_rows(comparison),
        }
    }

    /// Render the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render the report as plain-text tables.
    #[must_use]
    pub fn to_text(&self, unknown: &str) -> String {
        let mut out = String::new();
        let compare = self.secondary_encoding.is_some();
        let show = |cell: &ValueCell| render_cell(cell, compare, unknown);

        let _ = writeln!(out, "Core");
        let _ = writeln!(
            out,
            "  {:<8} {:<24} {:<24} {:<24}",
            "",
            Term::P.label(),
            Term::I.label(),
            Term::D.label()
        );
        for row in &self.pids {
            let _ = writeln!(
                out,
                "  {:<8} {:<24} {:<24} {:<24}",
                row.axis.label(),
                show(&row.p),
                show(&row.i),
                show(&row.d)
            );
        }
        write_rows(&mut out, None, &self.core, &show);
        write_rows(&mut out, Some("Rates"), &self.rates, &show);
        write_rows(&mut out, Some("Filter"), &self.filter, &show);
        if !self.other.is_empty() {
            write_rows(&mut out, Some("Other"), &self.other, &show);
        }
        out
    }
}

fn other_rows(comparison: &Comparison<'_>) -> Vec<Row> {
    let Some(secondary) = comparison.secondary_raw else {
        return Vec::new();
    };
    let primary = comparison.primary_raw;

    OTHER_SETTINGS
        .into_iter()
        .filter_map(|key| {
            let (a, b) = (primary.get(key)?, secondary.get(key)?);
            #[allow(clippy::float_cmp)]
            let differs = a != b;
            (differs && comparison.is_comparable(key))
                .then(|| Row::new(key, key, ValueCell::new(Some(a), Some(b), true)))
        })
        .collect()
}

fn render_cell(cell: &ValueCell, compare: bool, unknown: &str) -> String {
    let primary = cell.format_primary(unknown);
    if !compare {
        return primary;
    }
    let secondary = cell.format_secondary(unknown);
    match cell.format_difference() {
        Some(diff) => format!("{primary} / {secondary} ({diff})"),
        None => format!("{primary} / {secondary}"),
    }
}

fn write_rows(
    out: &mut String,
    title: Option<&str>,
    rows: &[Row],
    show: &dyn Fn(&ValueCell) -> String,
) {
    if let Some(title) = title {
        let _ = writeln!(out, "{title}");
    }
    for row in rows {
        let _ = writeln!(out, "  {:<16} {}", row.label, show(&row.cell));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::{self, RawSettings};
    use crate::parts::PartSelection;

    const LEGACY: &str = "\
set looptime = 3500
set pid_controller = 1
set p_roll = 40
set i_roll = 30
set d_roll = 23
set p_pitch = 40
set i_pitch = 30
set d_pitch = 23
set p_yaw = 85
set i_yaw = 45
set d_yaw = 0
set roll_rate = 45
set tpa_breakpoint = 1500
set gyro_lpf = 42
set telemetry_inversion = 0
set blackbox_device = 1
set blackbox_rate_num = 1
set blackbox_rate_denom = 2
";

    fn legacy_with(overrides: &str) -> RawSettings {
        dump::parse(&format!("{LEGACY}{overrides}"))
    }

    #[test]
    fn test_single_build_report() {
        let raw = dump::parse(LEGACY);
        let report = ComparisonReport::build(&Comparison::single(&raw), &DisplayConfig::default());

        assert_eq!(report.primary_encoding, PidEncoding::Legacy);
        assert_eq!(report.secondary_encoding, None);
        assert_eq!(report.pids.len(), 3);
        assert_eq!(report.pids[0].p.primary, Some(4.0));
        assert_eq!(report.pids[0].p.precision, Some(1));
        assert_eq!(report.pids[0].i.precision, Some(3));
        assert_eq!(report.pids[0].d.precision, None);
        assert!(!report.pids[0].p.show_difference);
        assert_eq!(report.core[1].cell.primary, Some(3500.0));
        assert_eq!(report.rates[0].cell.primary, Some(0.45));
        assert_eq!(report.rates[4].cell.primary, Some(1500.0));
        assert!(report.other.is_empty());
    }

    #[test]
    fn test_pid_differences_shown_when_controller_matches() {
        let a = dump::parse(LEGACY);
        let b = legacy_with("set p_roll = 45\n");
        let report =
            ComparisonReport::build(&Comparison::new(&a, &b), &DisplayConfig::default());

        let roll = &report.pids[0];
        assert!(roll.p.show_difference);
        let diff = roll.p.difference().unwrap();
        assert!((diff - 0.5).abs() < 1e-9);
        assert_eq!(roll.p.format_difference().as_deref(), Some("+0.5"));
        assert_eq!(roll.cell(Term::D).difference(), Some(0.0));
    }

    #[test]
    fn test_pid_differences_hidden_across_controllers() {
        let a = dump::parse(LEGACY);
        let b = dump::parse("set pid_controller = 2\nset p_rollf = 4.5\n");
        let report =
            ComparisonReport::build(&Comparison::new(&a, &b), &DisplayConfig::default());

        assert_eq!(report.secondary_encoding, Some(PidEncoding::Scaled));
        let roll = &report.pids[0];
        assert_eq!(roll.p.secondary, Some(4.5));
        assert!(!roll.p.show_difference);
        assert_eq!(roll.p.difference(), None);
        assert_eq!(roll.i.secondary, None);
    }

    #[test]
    fn test_rates_and_filters_never_show_difference() {
        let a = dump::parse(LEGACY);
        let b = legacy_with("set roll_rate = 60\n");
        let report =
            ComparisonReport::build(&Comparison::new(&a, &b), &DisplayConfig::default());

        assert_eq!(report.rates[0].cell.secondary, Some(0.6));
        assert!(!report.rates[0].cell.show_difference);
        assert!(report.filter.iter().all(|row| !row.cell.show_difference));
        assert!(report.core.iter().all(|row| !row.cell.show_difference));
    }

    #[test]
    fn test_other_section_lists_meaningful_differences() {
        let a = dump::parse(LEGACY);
        let b = legacy_with("set blackbox_device = 0\nset telemetry_inversion = 1\n");
        let parts = PartSelection::new()
            .with("fc", "naze32")
            .with("receiver", "x4r")
            .with("blackbox", "openlog");
        let comparison = Comparison::new(&a, &b).with_parts(&parts, &parts);
        let report = ComparisonReport::build(&comparison, &DisplayConfig::default());

        let keys: Vec<_> = report.other.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, ["telemetry_inversion", "blackbox_device"]);
        assert!(report.other.iter().all(|row| row.cell.show_difference));
    }

    #[test]
    fn test_other_section_skips_incomparable_and_missing() {
        let a = dump::parse(LEGACY);
        let b = dump::parse(
            "set pid_controller = 1\nset looptime = 2000\nset blackbox_rate_num = 2\nset blackbox_device = 0\n",
        );
        let pa = PartSelection::new().with("blackbox", "openlog");
        let pb = PartSelection::new().with("blackbox", "flash");
        let comparison = Comparison::new(&a, &b).with_parts(&pa, &pb);
        let report = ComparisonReport::build(&comparison, &DisplayConfig::default());

        assert!(report.other.is_empty());
    }

    #[test]
    fn test_other_section_needs_parts() {
        let a = dump::parse(LEGACY);
        let b = legacy_with("set blackbox_device = 0\n");
        let report =
            ComparisonReport::build(&Comparison::new(&a, &b), &DisplayConfig::default());
        assert!(report.other.is_empty());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(None, Some(3), "unknown"), "unknown");
        assert_eq!(format_value(Some(0.0), None, "unknown"), "0");
        assert_eq!(format_value(Some(0.04), Some(3), "?"), "0.040");
        assert_eq!(format_value(Some(4.5), Some(1), "?"), "4.5");
        assert_eq!(format_value(Some(23.0), None, "?"), "23");
    }

    #[test]
    fn test_format_difference_sign() {
        let cell = ValueCell::new(Some(30.0), Some(23.0), true);
        assert_eq!(cell.format_difference().as_deref(), Some("-7"));
        let cell = cell.with_precision(Some(2));
        assert_eq!(cell.format_difference().as_deref(), Some("-7.00"));
        let hidden = ValueCell::new(Some(30.0), Some(23.0), false);
        assert_eq!(hidden.format_difference(), None);
        let unknown = ValueCell::new(None, Some(23.0), true);
        assert_eq!(unknown.difference(), None);
    }

    #[test]
    fn test_to_text_marks_unknown_values() {
        let raw = dump::parse("set p_roll = 40\n");
        let report = ComparisonReport::build(&Comparison::single(&raw), &DisplayConfig::default());
        let text = report.to_text("unknown");

        assert!(text.contains("Core"));
        assert!(text.contains("Rates"));
        assert!(text.contains("Filter"));
        assert!(!text.contains("Other"));
        assert!(text.contains("4.0"));
        assert!(text.contains("unknown"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn test_to_text_comparison_shows_difference() {
        let a = dump::parse(LEGACY);
        let b = legacy_with("set p_roll = 45\n");
        let report =
            ComparisonReport::build(&Comparison::new(&a, &b), &DisplayConfig::default());
        let text = report.to_text("unknown");

        assert!(text.contains("4.0 / 4.5 (+0.5)"));
    }

    #[test]
    fn test_report_serializes() {
        let raw = dump::parse(LEGACY);
        let report = ComparisonReport::build(&Comparison::single(&raw), &DisplayConfig::default());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["primary_encoding"], "legacy");
        assert_eq!(json["pids"][0]["axis"], "roll");
        assert_eq!(json["core"][1]["key"], "looptime");
        assert!(json.get("other").is_none());
        assert!(json.get("secondary_encoding").is_none());
    }

    #[test]
    fn test_missing_pid_gain_uses_configured_placeholder() {
        let raw = dump::parse("set pid_controller = 2\nset p_rollf = 3.3\n");
        let pids = crate::pid::derive_pids(&raw);

        assert_eq!(format_value(pids.p_roll, None, "n/a"), "3.3");
        assert_eq!(format_value(pids.d_roll, None, "n/a"), "n/a");
    }

    #[test]
    fn test_to_json_matches_serialized_report() {
        let raw = dump::parse(LEGACY);
        let report = ComparisonReport::build(&Comparison::single(&raw), &DisplayConfig::default());
        let json = report.to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::to_value(&report).unwrap());
        assert!(json.contains('\n'));
    }
}
