//! `fcsettings` - Flight controller settings parsing and build comparison
//!
//! This library turns a firmware CLI dump into numeric settings, derives PID
//! gains that don't depend on the firmware's PID encoding, and decides which
//! differences between two builds' settings are meaningful given the settings
//! and parts each value depends on.
//!
//! ```
//! use fcsettings::{derive_pids, dump, Comparison};
//!
//! let primary = dump::parse("set pid_controller = 0\nset p_roll = 45\nset i_roll = 40\n");
//! let secondary = dump::parse("set pid_controller = 2\nset p_rollf = 4.0\n");
//!
//! assert_eq!(derive_pids(&primary).p_roll, Some(4.5));
//! assert_eq!(derive_pids(&secondary).p_roll, Some(4.0));
//!
//! // Different PID controllers scale gains differently
//! assert!(!Comparison::new(&primary, &secondary).is_comparable("p_roll"));
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod deps;
pub mod dump;
pub mod error;
pub mod logging;
pub mod parts;
pub mod pid;
pub mod report;
pub mod session;
pub mod tuning;
pub mod upload;

pub use config::Config;
pub use deps::{is_comparable, Comparison, Dependency, DependencySpec};
pub use dump::{parse, RawSettings};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use parts::PartSelection;
pub use pid::{derive_pids, PidEncoding, Pids};
pub use report::ComparisonReport;
pub use session::ComparisonSession;
pub use tuning::{derive, DerivedSettings};
pub use upload::SettingsUpload;
