//! Payroll aggregation.
//!
//! This module sums earnings and deductions into gross and net salary, and
//! builds draft payroll records from an employee's compensation and the
//! attendance summary for the pay period. Amounts are [`Decimal`] so that
//! repeated sums do not drift.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceSnapshot, AttendanceSummary, Deductions, Earnings, Employee, PayPeriod,
    PayrollRecord, PayrollStatus,
};

/// Gross, deductions and net for a set of payroll components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTotals {
    /// Sum of all earnings components.
    pub gross_salary: Decimal,
    /// Sum of all deduction components.
    pub total_deductions: Decimal,
    /// Gross salary less total deductions.
    pub net_salary: Decimal,
}

/// Sums earnings and deductions.
///
/// No rounding is applied beyond the precision of the inputs.
///
/// # Example
///
/// ```
/// use hrms_engine::calculation::compute_payroll;
/// use rust_decimal::Decimal;
/// use std::collections::BTreeMap;
///
/// let earnings = BTreeMap::from([
///     ("basic".to_string(), Decimal::from(30000)),
///     ("hra".to_string(), Decimal::from(5000)),
/// ]);
/// let deductions = BTreeMap::from([("pf".to_string(), Decimal::from(1800))]);
///
/// let totals = compute_payroll(&earnings, &deductions);
/// assert_eq!(totals.gross_salary, Decimal::from(35000));
/// assert_eq!(totals.total_deductions, Decimal::from(1800));
/// assert_eq!(totals.net_salary, Decimal::from(33200));
/// ```
pub fn compute_payroll(
    earnings: &BTreeMap<String, Decimal>,
    deductions: &BTreeMap<String, Decimal>,
) -> PayrollTotals {
    let gross_salary: Decimal = earnings.values().sum();
    let total_deductions: Decimal = deductions.values().sum();

    PayrollTotals {
        gross_salary,
        total_deductions,
        net_salary: gross_salary - total_deductions,
    }
}

/// One-off amounts for a pay period on top of the standing compensation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollAdjustments {
    /// Overtime pay for the period.
    #[serde(default)]
    pub overtime: Decimal,
    /// Bonus for the period.
    #[serde(default)]
    pub bonus: Decimal,
    /// Professional tax withheld.
    #[serde(default)]
    pub professional_tax: Decimal,
    /// Salary advance recovered.
    #[serde(default)]
    pub advance: Decimal,
}

impl PayrollAdjustments {
    fn validate(&self, summary: &AttendanceSummary) -> EngineResult<()> {
        let fields = [
            ("overtime", self.overtime),
            ("bonus", self.bonus),
            ("professional_tax", self.professional_tax),
            ("advance", self.advance),
        ];
        for (field, amount) in fields {
            if amount < Decimal::ZERO {
                return Err(EngineError::validation(field, "cannot be negative"));
            }
        }
        if self.overtime > Decimal::ZERO && summary.total_overtime_hours <= Decimal::ZERO {
            return Err(EngineError::validation(
                "overtime",
                "overtime pay given but no overtime hours were recorded in the period",
            ));
        }
        Ok(())
    }
}

/// Builds a draft payroll record for an employee and pay period.
///
/// Earnings are the employee's basic salary and allowances plus the
/// adjustment's overtime and bonus. Deductions are the standing pf, esi and
/// tax (as TDS) plus professional tax and advance. The attendance snapshot is
/// copied from `summary`, which must cover the same pay period.
///
/// # Errors
///
/// - `Validation` for negative adjustments, or overtime pay with no
///   recorded overtime hours
pub fn draft_payroll(
    employee: &Employee,
    pay_period: PayPeriod,
    summary: &AttendanceSummary,
    adjustments: &PayrollAdjustments,
) -> EngineResult<PayrollRecord> {
    adjustments.validate(summary)?;

    let compensation = &employee.compensation;
    let earnings = Earnings {
        basic_salary: compensation.basic_salary,
        hra: compensation.allowances.hra,
        transport: compensation.allowances.transport,
        medical: compensation.allowances.medical,
        overtime: adjustments.overtime,
        bonus: adjustments.bonus,
    };
    let deductions = Deductions {
        pf: compensation.deductions.pf,
        esi: compensation.deductions.esi,
        professional_tax: adjustments.professional_tax,
        tds: compensation.deductions.tax,
        advance: adjustments.advance,
    };

    let mut record = PayrollRecord {
        id: Uuid::new_v4(),
        employee_id: employee.id.clone(),
        pay_period,
        attendance: AttendanceSnapshot::from(summary),
        earnings,
        deductions,
        gross_salary: Decimal::ZERO,
        total_deductions: Decimal::ZERO,
        net_salary: Decimal::ZERO,
        status: PayrollStatus::Draft,
        paid_on: None,
        processed_by: None,
    };
    record.refresh_totals();
    Ok(record)
}
