//! Configuration types for the HR operations engine.
//!
//! These types represent the structure of the `engine.yaml` file.

use std::collections::HashMap;

use chrono::FixedOffset;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, LeaveBalance, WorkSchedule};

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the API listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1:5000".to_string()
}

/// Attendance rule settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceConfig {
    /// Scheduled hours given to every new attendance record.
    #[serde(default = "default_scheduled_hours")]
    pub default_scheduled_hours: Decimal,
    /// Offset of the reference timezone from UTC, in minutes.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Maximum number of records returned by the history endpoint.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Schedule given to employees registered without one.
    #[serde(default)]
    pub default_schedule: WorkSchedule,
}

impl AttendanceConfig {
    /// Returns the reference timezone offset.
    pub fn offset(&self) -> EngineResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            EngineError::validation(
                "attendance.utc_offset_minutes",
                format!("{} is out of range", self.utc_offset_minutes),
            )
        })
    }
}

impl Default for AttendanceConfig {
    fn default() -> Self {
        Self {
            default_scheduled_hours: default_scheduled_hours(),
            utc_offset_minutes: 0,
            history_limit: default_history_limit(),
            default_schedule: WorkSchedule::default(),
        }
    }
}

fn default_scheduled_hours() -> Decimal {
    Decimal::from(8)
}

fn default_history_limit() -> usize {
    100
}

/// Leave settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaveConfig {
    /// Balances given to newly registered employees.
    #[serde(default)]
    pub default_balances: LeaveBalance,
}

/// Records loaded into the in-memory store at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    /// Employees to register.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// Bearer token to employee id.
    #[serde(default)]
    pub tokens: HashMap<String, String>,
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Attendance rule settings.
    #[serde(default)]
    pub attendance: AttendanceConfig,
    /// Leave settings.
    #[serde(default)]
    pub leave: LeaveConfig,
    /// Startup data.
    #[serde(default)]
    pub seed: SeedConfig,
}

impl EngineConfig {
    /// Checks values serde cannot validate on its own.
    pub fn validate(&self) -> EngineResult<()> {
        if self.attendance.default_scheduled_hours <= Decimal::ZERO {
            return Err(EngineError::validation(
                "attendance.default_scheduled_hours",
                "must be positive",
            ));
        }
        if self.attendance.history_limit == 0 {
            return Err(EngineError::validation(
                "attendance.history_limit",
                "must be positive",
            ));
        }
        self.attendance.offset()?;
        self.attendance.default_schedule.validate()?;
        for employee in &self.seed.employees {
            employee.schedule().validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.attendance.default_scheduled_hours, Decimal::from(8));
        assert_eq!(config.attendance.history_limit, 100);
        assert_eq!(config.leave.default_balances.casual, 12);
        assert_eq!(config.leave.default_balances.sick, 12);
        assert_eq!(config.leave.default_balances.earned, 21);
        assert_eq!(config.server.bind_address, "127.0.0.1:5000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "attendance:\n  utc_offset_minutes: 330\n";
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.attendance.utc_offset_minutes, 330);
        assert_eq!(config.attendance.default_scheduled_hours, Decimal::from(8));
        assert_eq!(
            config.attendance.offset().unwrap(),
            FixedOffset::east_opt(19800).unwrap()
        );
    }

    #[test]
    fn test_validate_rejects_zero_scheduled_hours() {
        let mut config = EngineConfig::default();
        config.attendance.default_scheduled_hours = Decimal::ZERO;
        assert!(matches!(
            config.validate(),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_offset() {
        let mut config = EngineConfig::default();
        config.attendance.utc_offset_minutes = 24 * 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_default_schedule() {
        let mut config = EngineConfig::default();
        config.attendance.default_schedule.end_time = "6pm".to_string();
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidSchedule { .. })
        ));
    }
}
