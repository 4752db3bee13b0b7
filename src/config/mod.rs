//! Configuration loading for the attendance engine.
//!
//! The site configuration fixes the timezone and the attendance, correction
//! and dashboard rules. It is loaded once at startup from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/site.yaml").unwrap().into_config();
//! println!("Late after: {}", config.attendance.late_threshold);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, load_roster};
pub use types::{AttendancePolicy, CorrectionPolicy, DashboardConfig, SiteConfig, SiteInfo};
