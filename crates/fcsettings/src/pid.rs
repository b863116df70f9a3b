//! PID gain derivation.
//!
//! Firmware has stored PID gains in two encodings. The legacy encoding uses
//! integer fields (`p_roll`, `i_roll`, `d_roll`, ...) with fixed scale factors,
//! and PID controller 2 uses already-scaled float fields (`p_rollf`, ...).
//! [`derive_pids`] maps either one onto the same set of gains.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dump::RawSettings;

/// Raw field holding the PID controller number.
pub const PID_CONTROLLER_FIELD: &str = "pid_controller";

/// The PID controller that stores float gains.
const SCALED_PID_CONTROLLER: f64 = 2.0;

/// How the firmware encodes PID gains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PidEncoding {
    /// Integer fields: P in tenths, I in thousandths, D unscaled.
    #[default]
    Legacy,
    /// Float fields with an `f` suffix, used as-is.
    Scaled,
}

impl PidEncoding {
    /// Resolve the encoding from `pid_controller`.
    ///
    /// Only controller 2 uses the scaled encoding; any other value, or a
    /// missing field, is legacy.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn detect(raw: &RawSettings) -> Self {
        match raw.get(PID_CONTROLLER_FIELD) {
            Some(controller) if controller == SCALED_PID_CONTROLLER => Self::Scaled,
            _ => Self::Legacy,
        }
    }
}

impl fmt::Display for PidEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Scaled => write!(f, "scaled"),
        }
    }
}

/// Control axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Roll axis.
    Roll,
    /// Pitch axis.
    Pitch,
    /// Yaw axis.
    Yaw,
}

impl Axis {
    /// All axes in display order.
    pub const ALL: [Self; 3] = [Self::Roll, Self::Pitch, Self::Yaw];

    /// Lowercase name as used in firmware field names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Roll => "roll",
            Self::Pitch => "pitch",
            Self::Yaw => "yaw",
        }
    }

    /// Capitalized name for display.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Roll => "Roll",
            Self::Pitch => "Pitch",
            Self::Yaw => "Yaw",
        }
    }
}

/// PID term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// Proportional.
    P,
    /// Integral.
    I,
    /// Derivative.
    D,
}

impl Term {
    /// All terms in display order.
    pub const ALL: [Self; 3] = [Self::P, Self::I, Self::D];

    /// Lowercase prefix as used in firmware field names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::P => "p",
            Self::I => "i",
            Self::D => "d",
        }
    }

    /// Column heading for display.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::P => "Proportional",
            Self::I => "Integral",
            Self::D => "Derivative",
        }
    }

    /// Divisor applied to the legacy integer field.
    #[must_use]
    pub fn legacy_divisor(self) -> f64 {
        match self {
            Self::P => 10.0,
            Self::I => 1000.0,
            Self::D => 1.0,
        }
    }
}

/// Legacy raw field name for a gain, e.g. `p_roll`.
///
/// This is also the key the dependency table uses for the derived gain.
#[must_use]
pub fn legacy_field(term: Term, axis: Axis) -> String {
    format!("{}_{}", term.as_str(), axis.as_str())
}

/// Scaled raw field name for a gain, e.g. `p_rollf`.
#[must_use]
pub fn scaled_field(term: Term, axis: Axis) -> String {
    format!("{}_{}f", term.as_str(), axis.as_str())
}

/// Derive a single gain under the given encoding.
#[must_use]
pub fn derive_gain(raw: &RawSettings, encoding: PidEncoding, term: Term, axis: Axis) -> Option<f64> {
    match encoding {
        PidEncoding::Scaled => raw.get(&scaled_field(term, axis)),
        PidEncoding::Legacy => raw
            .get(&legacy_field(term, axis))
            .map(|value| value / term.legacy_divisor()),
    }
}

/// PID gains for all three axes.
///
/// A `None` gain means the dump didn't contain the field; it is never
/// reported as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Pids {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_roll: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i_roll: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d_roll: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_pitch: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i_pitch: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d_pitch: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_yaw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i_yaw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d_yaw: Option<f64>,
}

impl Pids {
    /// Get the gain for a term on an axis.
    #[must_use]
    pub fn get(&self, term: Term, axis: Axis) -> Option<f64> {
        match (term, axis) {
            (Term::P, Axis::Roll) => self.p_roll,
            (Term::I, Axis::Roll) => self.i_roll,
            (Term::D, Axis::Roll) => self.d_roll,
            (Term::P, Axis::Pitch) => self.p_pitch,
            (Term::I, Axis::Pitch) => self.i_pitch,
            (Term::D, Axis::Pitch) => self.d_pitch,
            (Term::P, Axis::Yaw) => self.p_yaw,
            (Term::I, Axis::Yaw) => self.i_yaw,
            (Term::D, Axis::Yaw) => self.d_yaw,
        }
    }

    fn slot(&mut self, term: Term, axis: Axis) -> &mut Option<f64> {
        match (term, axis) {
            (Term::P, Axis::Roll) => &mut self.p_roll,
            (Term::I, Axis::Roll) => &mut self.i_roll,
            (Term::D, Axis::Roll) => &mut self.d_roll,
            (Term::P, Axis::Pitch) => &mut self.p_pitch,
            (Term::I, Axis::Pitch) => &mut self.i_pitch,
            (Term::D, Axis::Pitch) => &mut self.d_pitch,
            (Term::P, Axis::Yaw) => &mut self.p_yaw,
            (Term::I, Axis::Yaw) => &mut self.i_yaw,
            (Term::D, Axis::Yaw) => &mut self.d_yaw,
        }
    }

    /// Look up a gain by its canonical name (`pRoll`, `iPitch`, `dYaw`, ...).
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<f64> {
        let mut chars = name.chars();
        let term = match chars.next()? {
            'p' => Term::P,
            'i' => Term::I,
            'd' => Term::D,
            _ => return None,
        };
        let axis = match chars.as_str() {
            "Roll" => Axis::Roll,
            "Pitch" => Axis::Pitch,
            "Yaw" => Axis::Yaw,
            _ => return None,
        };
        self.get(term, axis)
    }
}

/// Derive PID gains, detecting the encoding from `pid_controller`.
#[must_use]
pub fn derive_pids(raw: &RawSettings) -> Pids {
    derive_pids_with(raw, PidEncoding::detect(raw))
}

/// Derive PID gains under an already-resolved encoding.
#[must_use]
pub fn derive_pids_with(raw: &RawSettings, encoding: PidEncoding) -> Pids {
    let mut pids = Pids::default();
    for axis in Axis::ALL {
        for term in Term::ALL {
            *pids.slot(term, axis) = derive_gain(raw, encoding, term, axis);
        }
    }
    pids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, f64)]) -> RawSettings {
        pairs.iter().copied().collect()
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("value should be present");
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_detect_encoding() {
        assert_eq!(PidEncoding::detect(&raw(&[])), PidEncoding::Legacy);
        assert_eq!(
            PidEncoding::detect(&raw(&[("pid_controller", 0.0)])),
            PidEncoding::Legacy
        );
        assert_eq!(
            PidEncoding::detect(&raw(&[("pid_controller", 1.0)])),
            PidEncoding::Legacy
        );
        assert_eq!(
            PidEncoding::detect(&raw(&[("pid_controller", 2.0)])),
            PidEncoding::Scaled
        );
        assert_eq!(
            PidEncoding::detect(&raw(&[("pid_controller", 2.5)])),
            PidEncoding::Legacy
        );
    }

    #[test]
    fn test_legacy_scaling() {
        let pids = derive_pids(&raw(&[
            ("pid_controller", 0.0),
            ("p_roll", 45.0),
            ("i_roll", 40.0),
            ("d_roll", 23.0),
        ]));
        assert_close(pids.p_roll, 4.5);
        assert_close(pids.i_roll, 0.04);
        assert_close(pids.d_roll, 23.0);
    }

    #[test]
    fn test_legacy_when_controller_absent() {
        let pids = derive_pids(&raw(&[("p_pitch", 50.0), ("p_pitchf", 9.9)]));
        assert_close(pids.p_pitch, 5.0);
    }

    #[test]
    fn test_scaled_passthrough() {
        let pids = derive_pids(&raw(&[
            ("pid_controller", 2.0),
            ("p_rollf", 1.2),
            ("i_rollf", 0.03),
            ("d_rollf", 15.0),
            ("p_roll", 45.0),
        ]));
        assert_eq!(pids.p_roll, Some(1.2));
        assert_eq!(pids.i_roll, Some(0.03));
        assert_eq!(pids.d_roll, Some(15.0));
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let pids = derive_pids(&raw(&[("pid_controller", 0.0), ("p_yaw", 85.0)]));
        assert_close(pids.p_yaw, 8.5);
        assert_eq!(pids.i_yaw, None);
        assert_eq!(pids.d_yaw, None);
        assert_eq!(pids.p_roll, None);

        let scaled = derive_pids(&raw(&[("pid_controller", 2.0), ("p_roll", 45.0)]));
        assert_eq!(scaled, Pids::default());
    }

    #[test]
    fn test_zero_is_not_absent() {
        let pids = derive_pids(&raw(&[("d_yaw", 0.0)]));
        assert_eq!(pids.d_yaw, Some(0.0));
    }

    #[test]
    fn test_field_names() {
        assert_eq!(legacy_field(Term::I, Axis::Pitch), "i_pitch");
        assert_eq!(scaled_field(Term::D, Axis::Yaw), "d_yawf");
    }

    #[test]
    fn test_by_name() {
        let pids = Pids {
            i_pitch: Some(0.03),
            ..Pids::default()
        };
        assert_eq!(pids.by_name("iPitch"), Some(0.03));
        assert_eq!(pids.by_name("pPitch"), None);
        assert_eq!(pids.by_name("xRoll"), None);
        assert_eq!(pids.by_name("iSideways"), None);
        assert_eq!(pids.by_name(""), None);
    }

    #[test]
    fn test_pids_serialize_camel_case_and_skip_absent() {
        let pids = Pids {
            p_roll: Some(4.5),
            ..Pids::default()
        };
        let json = serde_json::to_string(&pids).unwrap();
        assert_eq!(json, r#"{"pRoll":4.5}"#);
    }

    #[test]
    fn test_derivation_is_pure() {
        let settings = raw(&[("p_roll", 40.0), ("i_roll", 30.0)]);
        assert_eq!(derive_pids(&settings), derive_pids(&settings));
    }
}
