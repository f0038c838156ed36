//! Error types for the HR operations engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition the rule engine, the store and the API can signal.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the HR operations engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use hrms_engine::error::EngineError;
///
/// let error = EngineError::AlreadyCheckedIn {
///     employee_id: "EMP20240001".to_string(),
///     date: chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
/// };
/// assert_eq!(error.to_string(), "Employee EMP20240001 already checked in on 2024-01-15");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The attendance record for the day already has a check-in time.
    #[error("Employee {employee_id} already checked in on {date}")]
    AlreadyCheckedIn {
        /// The employee attempting to check in.
        employee_id: String,
        /// The calendar day of the record.
        date: NaiveDate,
    },

    /// A check-out was attempted before any check-in for the day.
    #[error("Employee {employee_id} has not checked in on {date}")]
    NotCheckedIn {
        /// The employee attempting to check out.
        employee_id: String,
        /// The calendar day of the record.
        date: NaiveDate,
    },

    /// The attendance record for the day already has a check-out time.
    #[error("Employee {employee_id} already checked out on {date}")]
    AlreadyCheckedOut {
        /// The employee attempting to check out.
        employee_id: String,
        /// The calendar day of the record.
        date: NaiveDate,
    },

    /// A date range ended before it started.
    #[error("Invalid date range: {end} is before {start}")]
    InvalidRange {
        /// The first day of the range.
        start: NaiveDate,
        /// The last day of the range.
        end: NaiveDate,
    },

    /// A uniqueness constraint in the store was violated.
    #[error("Duplicate {entity} for key {key}")]
    DuplicateKey {
        /// The kind of record (e.g. "attendance", "payroll").
        entity: String,
        /// The key that already exists.
        key: String,
    },

    /// A work schedule time was not a 24-hour `HH:MM` string.
    #[error("Invalid schedule time '{value}': expected 24-hour HH:MM")]
    InvalidSchedule {
        /// The offending value.
        value: String,
    },

    /// A pay period or month reference was out of range.
    #[error("Invalid pay period {month}/{year}")]
    InvalidPeriod {
        /// The month (1-12 expected).
        month: u32,
        /// The year.
        year: i32,
    },

    /// A status transition is not allowed from the current state.
    #[error("Cannot move {entity} from '{from}' to '{to}'")]
    InvalidTransition {
        /// The kind of record.
        entity: String,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// A request field failed validation.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A record was not found in the store.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record.
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The caller could not be identified.
    #[error("Not authenticated: {reason}")]
    Unauthenticated {
        /// Why authentication failed.
        reason: String,
    },

    /// The caller's role is not allowed to perform the operation.
    #[error("Access denied for role '{role}'")]
    Unauthorized {
        /// The caller's role.
        role: String,
    },

    /// The store could not serve the request.
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        /// A description of the failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::NotFound`] error.
    pub fn not_found(entity: &str, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity: entity.to_string(),
            id: id.into(),
        }
    }

    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
