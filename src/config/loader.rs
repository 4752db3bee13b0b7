//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the site
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::Employee;

use super::types::SiteConfig;

/// Loads and provides access to the site configuration.
///
/// # File Layout
///
/// ```text
/// site:
///   name: Main Street Kitchen
///   timezone: Asia/Kolkata
/// attendance:
///   late_threshold: "09:15:00"
///   min_shift_gap_hours: 8
///   min_shift_minutes: 30
///   full_day_hours: "4"
/// corrections:
///   window_days: 7
/// dashboard:
///   chart_days: 30
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/site.yaml").unwrap();
/// println!("Site timezone: {}", loader.config().timezone());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: SiteConfig,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// Returns `ConfigNotFound` if the file cannot be read and
    /// `ConfigParseError` if it is not valid configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> EngineResult<Self> {
        let config: SiteConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        Self::validate(&config, origin)?;

        tracing::debug!(
            site = %config.site.name,
            timezone = %config.site.timezone,
            "Loaded site configuration"
        );

        Ok(Self { config })
    }

    fn validate(config: &SiteConfig, origin: &str) -> EngineResult<()> {
        let invalid = |message: &str| EngineError::ConfigParseError {
            path: origin.to_string(),
            message: message.to_string(),
        };

        if config.attendance.min_shift_gap_hours < 0 {
            return Err(invalid("attendance.min_shift_gap_hours must not be negative"));
        }
        if config.attendance.min_shift_minutes < 0 {
            return Err(invalid("attendance.min_shift_minutes must not be negative"));
        }
        if config.corrections.window_days < 0 {
            return Err(invalid("corrections.window_days must not be negative"));
        }
        if config.dashboard.chart_days <= 0 {
            return Err(invalid("dashboard.chart_days must be positive"));
        }
        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> SiteConfig {
        self.config
    }
}

/// Loads the employee roster supplied by the identity collaborator.
///
/// The file is a YAML list of employees; ledgers may be omitted.
///
/// ```text
/// - id: emp_001
///   name: Asha Rao
/// - id: emp_002
///   name: Ravi Iyer
///   status: inactive
/// ```
pub fn load_roster<P: AsRef<Path>>(path: P) -> EngineResult<Vec<Employee>> {
    let path = path.as_ref();
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.clone(),
    })?;
    let roster: Vec<Employee> =
        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

    tracing::debug!(path = %path_str, employees = roster.len(), "Loaded employee roster");
    Ok(roster)
}
