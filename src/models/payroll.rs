//! Pay period and payroll record models.
//!
//! This module contains the [`PayPeriod`] identifying one monthly payroll
//! cycle and the [`PayrollRecord`] computed for an employee in that cycle.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{PayrollTotals, compute_payroll, month_bounds};
use crate::error::{EngineError, EngineResult};

use super::AttendanceSummary;

/// One monthly payroll cycle.
///
/// # Example
///
/// ```
/// use hrms_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(2, 2024).unwrap();
/// let (first, last) = period.bounds().unwrap();
/// assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// Month of the year, 1-12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
}

impl PayPeriod {
    /// Creates a pay period, rejecting months outside 1-12.
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        let period = Self { month, year };
        period.bounds()?;
        Ok(period)
    }

    /// Returns the first and last calendar days of the period.
    pub fn bounds(&self) -> EngineResult<(NaiveDate, NaiveDate)> {
        month_bounds(self.year, self.month)
    }
}

/// Attendance totals copied into a payroll record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSnapshot {
    /// Number of attendance records in the period.
    pub total_working_days: u32,
    /// Days present (including late days).
    pub present_days: u32,
    /// Days absent.
    pub absent_days: u32,
    /// Days late.
    pub late_days: u32,
    /// Half days.
    pub half_days: u32,
    /// Sum of actual working hours.
    pub total_hours: Decimal,
    /// Sum of overtime hours.
    pub overtime_hours: Decimal,
}

impl From<&AttendanceSummary> for AttendanceSnapshot {
    fn from(summary: &AttendanceSummary) -> Self {
        Self {
            total_working_days: summary.total_days,
            present_days: summary.present_days,
            absent_days: summary.absent_days,
            late_days: summary.late_days,
            half_days: summary.half_days,
            total_hours: summary.total_hours,
            overtime_hours: summary.total_overtime_hours,
        }
    }
}

/// Earnings components for a pay period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earnings {
    /// Basic salary.
    pub basic_salary: Decimal,
    /// House rent allowance.
    #[serde(default)]
    pub hra: Decimal,
    /// Transport allowance.
    #[serde(default)]
    pub transport: Decimal,
    /// Medical allowance.
    #[serde(default)]
    pub medical: Decimal,
    /// Overtime pay.
    #[serde(default)]
    pub overtime: Decimal,
    /// Bonus.
    #[serde(default)]
    pub bonus: Decimal,
}

impl Earnings {
    /// Returns the components keyed by name.
    pub fn components(&self) -> BTreeMap<String, Decimal> {
        [
            ("basic_salary", self.basic_salary),
            ("hra", self.hra),
            ("transport", self.transport),
            ("medical", self.medical),
            ("overtime", self.overtime),
            ("bonus", self.bonus),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}

/// Deduction components for a pay period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    /// Provident fund.
    #[serde(default)]
    pub pf: Decimal,
    /// Employee state insurance.
    #[serde(default)]
    pub esi: Decimal,
    /// Professional tax.
    #[serde(default)]
    pub professional_tax: Decimal,
    /// Tax deducted at source.
    #[serde(default)]
    pub tds: Decimal,
    /// Salary advance recovered.
    #[serde(default)]
    pub advance: Decimal,
}

impl Deductions {
    /// Returns the components keyed by name.
    pub fn components(&self) -> BTreeMap<String, Decimal> {
        [
            ("pf", self.pf),
            ("esi", self.esi),
            ("professional_tax", self.professional_tax),
            ("tds", self.tds),
            ("advance", self.advance),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}

/// Processing state of a payroll record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Computed, not yet approved.
    #[default]
    Draft,
    /// Approved for payment.
    Approved,
    /// Paid out.
    Paid,
}

impl PayrollStatus {
    /// Returns the lowercase name used in API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            PayrollStatus::Draft => "draft",
            PayrollStatus::Approved => "approved",
            PayrollStatus::Paid => "paid",
        }
    }

    /// Returns the status that follows this one, if any.
    pub fn next(&self) -> Option<PayrollStatus> {
        match self {
            PayrollStatus::Draft => Some(PayrollStatus::Approved),
            PayrollStatus::Approved => Some(PayrollStatus::Paid),
            PayrollStatus::Paid => None,
        }
    }
}

/// An employee's payroll for one pay period.
///
/// Records are unique per `(employee_id, month, year)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Record identifier.
    pub id: Uuid,
    /// Paid employee.
    pub employee_id: String,
    /// The pay period.
    pub pay_period: PayPeriod,
    /// Attendance totals for the period.
    pub attendance: AttendanceSnapshot,
    /// Earnings components.
    pub earnings: Earnings,
    /// Deduction components.
    pub deductions: Deductions,
    /// Sum of earnings.
    pub gross_salary: Decimal,
    /// Sum of deductions.
    pub total_deductions: Decimal,
    /// Gross salary less deductions.
    pub net_salary: Decimal,
    /// Processing state.
    pub status: PayrollStatus,
    /// When the payroll was paid out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_on: Option<NaiveDateTime>,
    /// Who last advanced the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_by: Option<String>,
}

impl PayrollRecord {
    /// Re-derives gross, total deductions and net from the components.
    pub fn refresh_totals(&mut self) {
        let PayrollTotals {
            gross_salary,
            total_deductions,
            net_salary,
        } = compute_payroll(&self.earnings.components(), &self.deductions.components());
        self.gross_salary = gross_salary;
        self.total_deductions = total_deductions;
        self.net_salary = net_salary;
    }

    /// Moves the record to its next status.
    ///
    /// Status only moves forward: draft, approved, paid. `paid_on` is
    /// stamped when the record becomes paid.
    pub fn advance(&self, target: PayrollStatus, processed_by: &str, now: NaiveDateTime) -> EngineResult<Self> {
        if self.status.next() != Some(target) {
            return Err(EngineError::InvalidTransition {
                entity: "payroll".to_string(),
                from: self.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }
        let mut updated = self.clone();
        updated.status = target;
        updated.processed_by = Some(processed_by.to_string());
        if target == PayrollStatus::Paid {
            updated.paid_on = Some(now);
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PayrollRecord {
        let mut record = PayrollRecord {
            id: Uuid::new_v4(),
            employee_id: "EMP20240001".to_string(),
            pay_period: PayPeriod::new(1, 2024).unwrap(),
            attendance: AttendanceSnapshot::default(),
            earnings: Earnings {
                basic_salary: Decimal::new(30000, 0),
                hra: Decimal::new(5000, 0),
                bonus: Decimal::new(1250, 1),
                ..Earnings::default()
            },
            deductions: Deductions {
                pf: Decimal::new(1800, 0),
                advance: Decimal::new(500, 0),
                ..Deductions::default()
            },
            gross_salary: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            net_salary: Decimal::ZERO,
            status: PayrollStatus::Draft,
            paid_on: None,
            processed_by: None,
        };
        record.refresh_totals();
        record
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_pay_period_rejects_bad_month() {
        assert!(PayPeriod::new(0, 2024).is_err());
        assert!(PayPeriod::new(13, 2024).is_err());
        assert!(PayPeriod::new(12, 2024).is_ok());
    }

    #[test]
    fn test_refresh_totals() {
        let record = record();
        assert_eq!(record.gross_salary, Decimal::new(351250, 1));
        assert_eq!(record.total_deductions, Decimal::new(2300, 0));
        assert_eq!(record.net_salary, Decimal::new(328250, 1));
    }

    #[test]
    fn test_components_include_every_field() {
        let record = record();
        assert_eq!(record.earnings.components().len(), 6);
        assert_eq!(record.deductions.components().len(), 5);
        assert_eq!(
            record.deductions.components()["advance"],
            Decimal::new(500, 0)
        );
    }

    #[test]
    fn test_status_moves_forward_only() {
        let approved = record()
            .advance(PayrollStatus::Approved, "EMP20240009", now())
            .unwrap();
        assert_eq!(approved.status, PayrollStatus::Approved);
        assert!(approved.paid_on.is_none());

        let paid = approved
            .advance(PayrollStatus::Paid, "EMP20240009", now())
            .unwrap();
        assert_eq!(paid.status, PayrollStatus::Paid);
        assert_eq!(paid.paid_on, Some(now()));

        assert!(matches!(
            paid.advance(PayrollStatus::Draft, "EMP20240009", now()),
            Err(EngineError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_cannot_skip_approval() {
        let result = record().advance(PayrollStatus::Paid, "EMP20240009", now());
        assert!(matches!(result, Err(EngineError::InvalidTransition { .. })));
    }

    #[test]
    fn test_snapshot_from_summary() {
        let summary = AttendanceSummary {
            total_days: 22,
            present_days: 20,
            late_days: 3,
            total_hours: Decimal::new(1765, 1),
            total_overtime_hours: Decimal::new(45, 1),
            ..AttendanceSummary::default()
        };
        let snapshot = AttendanceSnapshot::from(&summary);
        assert_eq!(snapshot.total_working_days, 22);
        assert_eq!(snapshot.present_days, 20);
        assert_eq!(snapshot.late_days, 3);
        assert_eq!(snapshot.overtime_hours, Decimal::new(45, 1));
    }
}
