//! Leave request model.
//!
//! A [`LeaveRequest`] is created pending and reviewed exactly once by a
//! manager or administrator.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::leave_total_days;
use crate::error::{EngineError, EngineResult};

/// Maximum length of the reason and review comments.
pub const MAX_LEAVE_TEXT_LENGTH: usize = 500;

/// Kind of leave being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Casual leave.
    Casual,
    /// Sick leave.
    Sick,
    /// Earned leave.
    Earned,
    /// Maternity leave.
    Maternity,
    /// Paternity leave.
    Paternity,
}

/// Review state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Approved by a reviewer.
    Approved,
    /// Rejected by a reviewer.
    Rejected,
}

impl LeaveStatus {
    /// Returns the lowercase name used in API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
        }
    }
}

/// A request for leave over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Request identifier.
    pub id: Uuid,
    /// Requesting employee.
    pub employee_id: String,
    /// Kind of leave.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Number of days covered, derived from the date range.
    pub total_days: i64,
    /// Reason given by the employee.
    pub reason: String,
    /// Review state.
    pub status: LeaveStatus,
    /// When the request was submitted.
    pub applied_date: NaiveDateTime,
    /// The reviewer, once reviewed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    /// When the request was reviewed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_date: Option<NaiveDateTime>,
    /// Reviewer comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_comments: Option<String>,
}

impl LeaveRequest {
    /// Creates a pending leave request, deriving `total_days`.
    ///
    /// # Errors
    ///
    /// - `InvalidRange` if `end_date` is before `start_date`
    /// - `Validation` if the reason is blank or longer than 500 characters
    ///
    /// # Example
    ///
    /// ```
    /// use hrms_engine::models::{LeaveRequest, LeaveStatus, LeaveType};
    /// use chrono::NaiveDate;
    ///
    /// let leave = LeaveRequest::new(
    ///     "EMP20240001",
    ///     LeaveType::Casual,
    ///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
    ///     "Family function",
    ///     NaiveDate::from_ymd_opt(2023, 12, 20).unwrap().and_hms_opt(10, 0, 0).unwrap(),
    /// ).unwrap();
    /// assert_eq!(leave.total_days, 3);
    /// assert_eq!(leave.status, LeaveStatus::Pending);
    /// ```
    pub fn new(
        employee_id: &str,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: &str,
        applied_date: NaiveDateTime,
    ) -> EngineResult<Self> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(EngineError::validation("reason", "Reason is required"));
        }
        check_length("reason", reason)?;

        Ok(Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.to_string(),
            leave_type,
            start_date,
            end_date,
            total_days: leave_total_days(start_date, end_date)?,
            reason: reason.to_string(),
            status: LeaveStatus::Pending,
            applied_date,
            reviewed_by: None,
            reviewed_date: None,
            review_comments: None,
        })
    }

    /// Changes the date range and re-derives `total_days`.
    pub fn reschedule(&self, start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        if self.status != LeaveStatus::Pending {
            return Err(EngineError::validation(
                "status",
                "Only pending leave requests can be rescheduled",
            ));
        }
        let mut updated = self.clone();
        updated.total_days = leave_total_days(start_date, end_date)?;
        updated.start_date = start_date;
        updated.end_date = end_date;
        Ok(updated)
    }

    /// Records a reviewer's decision.
    ///
    /// A request can only move from pending to approved or rejected, once.
    pub fn review(
        &self,
        reviewer_id: &str,
        decision: LeaveStatus,
        comments: Option<String>,
        now: NaiveDateTime,
    ) -> EngineResult<Self> {
        if self.status != LeaveStatus::Pending || decision == LeaveStatus::Pending {
            return Err(EngineError::InvalidTransition {
                entity: "leave".to_string(),
                from: self.status.as_str().to_string(),
                to: decision.as_str().to_string(),
            });
        }
        if let Some(comments) = &comments {
            check_length("review_comments", comments)?;
        }

        let mut reviewed = self.clone();
        reviewed.status = decision;
        reviewed.reviewed_by = Some(reviewer_id.to_string());
        reviewed.reviewed_date = Some(now);
        reviewed.review_comments = comments;
        Ok(reviewed)
    }
}

fn check_length(field: &str, value: &str) -> EngineResult<()> {
    if value.chars().count() > MAX_LEAVE_TEXT_LENGTH {
        return Err(EngineError::validation(
            field,
            format!("cannot exceed {} characters", MAX_LEAVE_TEXT_LENGTH),
        ));
    }
    Ok(())
}
