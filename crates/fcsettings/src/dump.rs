//! Configuration dump parsing.
//!
//! A firmware CLI dump is a text export where each setting appears as
//! `set <name> = <value>`. Only numeric settings are kept. Comments, blank
//! lines, and `set` lines with non-numeric values are skipped silently, so
//! parsing never fails.
//!
//! # Example
//!
//! ```
//! use fcsettings::dump;
//!
//! let raw = dump::parse("# master\nset looptime = 3500\nset pid_controller = 2\n");
//! assert_eq!(raw.get("looptime"), Some(3500.0));
//! assert_eq!(raw.len(), 2);
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Grammar of a numeric `set` line.
///
/// ASCII classes are spelled out so that Unicode word characters and digits
/// are not accepted. The match may start anywhere in a line and only spaces
/// may follow the `=`.
const SET_LINE_PATTERN: &str = r"set ([A-Za-z0-9_]+) = *([0-9]+(?:\.[0-9]+)?)";

static DEFAULT_PARSER: LazyLock<DumpParser> = LazyLock::new(DumpParser::new);

/// Flat mapping of firmware field name to numeric value.
///
/// Keys are never empty and values are always finite.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, f64>")]
pub struct RawSettings {
    values: BTreeMap<String, f64>,
}

impl RawSettings {
    /// Create an empty settings map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a raw field, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }

    /// Check whether a raw field is present.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no field was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Insert a value, replacing any earlier one.
    ///
    /// Empty names and non-finite values are dropped.
    fn set(&mut self, field: impl Into<String>, value: f64) {
        let field = field.into();
        if field.is_empty() || !value.is_finite() {
            return;
        }
        self.values.insert(field, value);
    }
}

impl Serialize for RawSettings {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl From<BTreeMap<String, f64>> for RawSettings {
    fn from(values: BTreeMap<String, f64>) -> Self {
        values.into_iter().collect()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for RawSettings {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut settings = Self::new();
        for (field, value) in iter {
            settings.set(field, value);
        }
        settings
    }
}

/// Line-by-line parser for firmware configuration dumps.
#[derive(Debug)]
pub struct DumpParser {
    set_line: Regex,
}

impl Default for DumpParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DumpParser {
    /// Create a parser for the `set <name> = <number>` grammar.
    ///
    /// # Panics
    ///
    /// Panics if the built-in pattern fails to compile, which would be a bug.
    #[must_use]
    pub fn new() -> Self {
        Self {
            set_line: Regex::new(SET_LINE_PATTERN).expect("Invalid set line pattern"),
        }
    }

    /// Parse a single line, returning the field and value if it matches.
    #[must_use]
    pub fn parse_line<'a>(&self, line: &'a str) -> Option<(&'a str, f64)> {
        let caps = self.set_line.captures(line)?;
        let field = caps.get(1)?.as_str();
        let value: f64 = caps.get(2)?.as_str().parse().ok()?;
        value.is_finite().then_some((field, value))
    }

    /// Parse a whole dump.
    ///
    /// When a field appears on several lines the last one wins.
    #[must_use]
    pub fn parse(&self, text: &str) -> RawSettings {
        let mut settings = RawSettings::new();
        let mut lines = 0usize;

        for line in text.lines() {
            lines += 1;
            match self.parse_line(line) {
                Some((field, value)) => settings.set(field, value),
                None => trace!(line, "Skipping non-numeric dump line"),
            }
        }

        debug!(lines, settings = settings.len(), "Parsed configuration dump");
        settings
    }
}

/// Parse a dump with the shared default parser.
#[must_use]
pub fn parse(text: &str) -> RawSettings {
    DEFAULT_PARSER.parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_input() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_parse_last_write_wins() {
        let raw = parse("set looptime = 1000\nset looptime = 2000\n");
        assert_eq!(raw.len(), 1);
        assert_eq!(raw.get("looptime"), Some(2000.0));
    }

    #[test]
    fn test_parse_ignores_malformed_lines() {
        let raw = parse("# comment\nset foo bar\nset looptime = 1000");
        assert_eq!(raw.len(), 1);
        assert_eq!(raw.get("looptime"), Some(1000.0));
    }

    #[test]
    fn test_parse_decimal_values() {
        let raw = parse("set p_rollf = 1.25\nset i_rollf = 0.030\n");
        assert_eq!(raw.get("p_rollf"), Some(1.25));
        assert_eq!(raw.get("i_rollf"), Some(0.03));
    }

    #[test]
    fn test_parse_windows_line_endings() {
        let raw = parse("set gyro_lpf = 42\r\nset looptime = 3500\r\n");
        assert_eq!(raw.get("gyro_lpf"), Some(42.0));
        assert_eq!(raw.get("looptime"), Some(3500.0));
    }

    #[test]
    fn test_parse_no_trailing_newline() {
        let raw = parse("set a = 1\nset b = 2");
        assert_eq!(raw.get("b"), Some(2.0));
    }

    #[test]
    fn test_parse_whitespace_after_equals_is_optional() {
        let raw = parse("set looptime =3500\nset gyro_lpf =    42");
        assert_eq!(raw.get("looptime"), Some(3500.0));
        assert_eq!(raw.get("gyro_lpf"), Some(42.0));
    }

    #[test]
    fn test_parse_matches_set_anywhere_in_line() {
        assert_eq!(parse("# set looptime = 1000\n").get("looptime"), Some(1000.0));
        assert_eq!(parse("reset looptime = 2000\n").get("looptime"), Some(2000.0));
        assert_eq!(parse("  set looptime = 3000").get("looptime"), Some(3000.0));
    }

    #[test]
    fn test_parse_tab_after_equals_rejected() {
        assert!(parse("set looptime =\t3000\n").is_empty());
    }

    #[test]
    fn test_parse_skips_non_numeric_values() {
        let raw = parse("set serialrx_provider = SBUS\nset name = -\nset rc_rate = 90");
        assert_eq!(raw.len(), 1);
        assert!(!raw.contains("serialrx_provider"));
        assert!(!raw.contains("name"));
    }

    #[test]
    fn test_parse_negative_values_are_not_numeric() {
        let raw = parse("set align_board_roll = -5");
        assert!(raw.is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "set p_roll = 40\nset i_roll = 30\nset d_roll = 23\n";
        assert_eq!(parse(text), parse(text));
    }

    #[test]
    fn test_parse_line_unicode_digits_rejected() {
        let parser = DumpParser::new();
        assert!(parser.parse_line("set looptime = \u{0663}").is_none());
        assert_eq!(parser.parse_line("set looptime = 3"), Some(("looptime", 3.0)));
    }

    #[test]
    fn test_parse_overflowing_value_skipped() {
        let huge = "9".repeat(400);
        let raw = parse(&format!("set big = {huge}\nset small = 1"));
        assert!(!raw.contains("big"));
        assert_eq!(raw.get("small"), Some(1.0));
    }

    #[test]
    fn test_from_iter_drops_invalid_entries() {
        let raw: RawSettings = vec![("", 1.0), ("nan", f64::NAN), ("ok", 2.0)]
            .into_iter()
            .collect();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw.get("ok"), Some(2.0));
    }

    #[test]
    fn test_raw_settings_serialize_flat() {
        let raw = parse("set looptime = 3500\nset pid_controller = 2");
        let json = serde_json::to_string(&raw).unwrap();
        assert_eq!(json, r#"{"looptime":3500.0,"pid_controller":2.0}"#);
    }

    #[test]
    fn test_raw_settings_deserialize() {
        let raw: RawSettings = serde_json::from_str(r#"{"looptime": 3500}"#).unwrap();
        assert_eq!(raw.get("looptime"), Some(3500.0));
    }
}
