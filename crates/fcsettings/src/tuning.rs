//! Derived tuning values.
//!
//! [`DerivedSettings`] is a pure function of [`RawSettings`]. It holds the PID
//! gains plus the rate, TPA, and filter values shown next to them, all keyed by
//! a stable, firmware-independent name.

use serde::{Deserialize, Serialize};

use crate::dump::RawSettings;
use crate::pid::{derive_pids_with, PidEncoding, Pids, PID_CONTROLLER_FIELD};

/// Raw field holding the main loop time.
pub const LOOPTIME_FIELD: &str = "looptime";

/// Throttle PID attenuation breakpoint.
pub const TPA_BREAKPOINT_FIELD: &str = "tpa_breakpoint";

/// Filter cutoff fields, shown unscaled.
pub const FILTER_FIELDS: [&str; 4] = ["gyro_lpf", "dterm_cut_hz", "pterm_cut_hz", "gyro_cut_hz"];

/// Default divisor for rate fields.
pub const DEFAULT_RATE_DIVISOR: f64 = 100.0;

/// Rate values, already divided by the rate divisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// Roll rate.
    pub roll_rate: Option<f64>,
    /// Pitch rate.
    pub pitch_rate: Option<f64>,
    /// Yaw rate.
    pub yaw_rate: Option<f64>,
    /// Throttle PID attenuation.
    pub tpa_rate: Option<f64>,
    /// Throttle value where TPA starts (not scaled).
    pub tpa_breakpoint: Option<f64>,
}

/// Filter cutoff values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Filters {
    pub gyro_lpf: Option<f64>,
    pub dterm_cut_hz: Option<f64>,
    pub pterm_cut_hz: Option<f64>,
    pub gyro_cut_hz: Option<f64>,
}

/// Firmware-independent view of a flight controller's tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedSettings {
    /// Encoding the gains were read from.
    pub encoding: PidEncoding,
    /// PID gains.
    pub pids: Pids,
    /// Raw PID controller number.
    pub pid_controller: Option<f64>,
    /// Main loop time.
    pub looptime: Option<f64>,
    /// Rates.
    pub rates: Rates,
    /// Filter cutoffs.
    pub filters: Filters,
}

impl DerivedSettings {
    /// Look up a value by its canonical name.
    ///
    /// PID gains use camelCase (`pRoll`); everything else uses the firmware
    /// field name (`looptime`, `roll_rate`, `gyro_lpf`).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            PID_CONTROLLER_FIELD => self.pid_controller,
            LOOPTIME_FIELD => self.looptime,
            "roll_rate" => self.rates.roll_rate,
            "pitch_rate" => self.rates.pitch_rate,
            "yaw_rate" => self.rates.yaw_rate,
            "tpa_rate" => self.rates.tpa_rate,
            TPA_BREAKPOINT_FIELD => self.rates.tpa_breakpoint,
            "gyro_lpf" => self.filters.gyro_lpf,
            "dterm_cut_hz" => self.filters.dterm_cut_hz,
            "pterm_cut_hz" => self.filters.pterm_cut_hz,
            "gyro_cut_hz" => self.filters.gyro_cut_hz,
            other => self.pids.by_name(other),
        }
    }
}

/// Derive tuning values with the default rate divisor.
#[must_use]
pub fn derive(raw: &RawSettings) -> DerivedSettings {
    derive_with_divisor(raw, DEFAULT_RATE_DIVISOR)
}

/// Derive tuning values, dividing rate fields by `rate_divisor`.
#[must_use]
pub fn derive_with_divisor(raw: &RawSettings, rate_divisor: f64) -> DerivedSettings {
    let encoding = PidEncoding::detect(raw);
    let scaled = |field: &str| raw.get(field).map(|value| value / rate_divisor);

    DerivedSettings {
        encoding,
        pids: derive_pids_with(raw, encoding),
        pid_controller: raw.get(PID_CONTROLLER_FIELD),
        looptime: raw.get(LOOPTIME_FIELD),
        rates: Rates {
            roll_rate: scaled("roll_rate"),
            pitch_rate: scaled("pitch_rate"),
            yaw_rate: scaled("yaw_rate"),
            tpa_rate: scaled("tpa_rate"),
            tpa_breakpoint: raw.get(TPA_BREAKPOINT_FIELD),
        },
        filters: Filters {
            gyro_lpf: raw.get("gyro_lpf"),
            dterm_cut_hz: raw.get("dterm_cut_hz"),
            pterm_cut_hz: raw.get("pterm_cut_hz"),
            gyro_cut_hz: raw.get("gyro_cut_hz"),
        },
    }
}
