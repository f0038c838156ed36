//! In-memory implementation of every repository.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::config::SeedConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, Employee, LeaveRequest, LeaveStatus, PayPeriod, PayrollRecord,
};

use super::{
    AttendanceRepository, DateRange, EmployeeFilter, EmployeeRepository, LeaveRepository,
    PayrollRepository,
};

type DayKey = (String, NaiveDate);

/// Thread-safe store holding every record in hash maps.
///
/// Each table sits behind its own `RwLock`. A poisoned lock surfaces as
/// [`EngineError::StoreUnavailable`] rather than a panic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    employees: RwLock<HashMap<String, Employee>>,
    attendance: RwLock<HashMap<DayKey, AttendanceRecord>>,
    leaves: RwLock<HashMap<Uuid, LeaveRequest>>,
    payroll: RwLock<HashMap<(String, PayPeriod), PayrollRecord>>,
    day_locks: Mutex<HashMap<DayKey, Arc<Mutex<()>>>>,
}

fn unavailable(table: &str, error: impl Display) -> EngineError {
    EngineError::StoreUnavailable {
        message: format!("Failed to lock {} table: {}", table, error),
    }
}

fn read<'a, T>(lock: &'a RwLock<T>, table: &str) -> EngineResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|e| unavailable(table, e))
}

fn write<'a, T>(lock: &'a RwLock<T>, table: &str) -> EngineResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|e| unavailable(table, e))
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the seed employees.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if two seed employees share an id or email.
    pub fn with_seed(seed: &SeedConfig) -> EngineResult<Self> {
        let store = Self::new();
        for employee in &seed.employees {
            store.insert_employee(employee.clone())?;
        }
        Ok(store)
    }

    /// Runs `f` while holding the lock for one employee and day.
    ///
    /// Check-in and check-out read the day's record, apply the rules and save
    /// the result. Running that sequence under this lock keeps two concurrent
    /// punches for the same day from both succeeding.
    ///
    /// The entry is dropped again once no caller holds or waits on it, so
    /// the lock map only holds days with a punch in flight.
    pub fn with_day_lock<T>(
        &self,
        employee_id: &str,
        day: NaiveDate,
        f: impl FnOnce() -> EngineResult<T>,
    ) -> EngineResult<T> {
        let key = (employee_id.to_string(), day);
        let lock = {
            let mut locks = self
                .day_locks
                .lock()
                .map_err(|e| unavailable("day lock", e))?;
            Arc::clone(locks.entry(key.clone()).or_default())
        };

        let result = match lock.lock() {
            Ok(_guard) => f(),
            Err(e) => Err(unavailable("day lock", e)),
        };

        // Clones are only taken under the map lock, so a count of two (map
        // plus ours) means nobody else is holding or waiting.
        let mut locks = self
            .day_locks
            .lock()
            .map_err(|e| unavailable("day lock", e))?;
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&key);
        }
        result
    }

    #[cfg(test)]
    fn day_lock_count(&self) -> EngineResult<usize> {
        Ok(self
            .day_locks
            .lock()
            .map_err(|e| unavailable("day lock", e))?
            .len())
    }
}

impl EmployeeRepository for InMemoryStore {
    fn find_employee(&self, id: &str) -> EngineResult<Option<Employee>> {
        Ok(read(&self.employees, "employee")?.get(id).cloned())
    }

    fn list_employees(&self, filter: &EmployeeFilter) -> EngineResult<Vec<Employee>> {
        let employees = read(&self.employees, "employee")?;
        let mut matches: Vec<Employee> = employees
            .values()
            .filter(|e| {
                filter
                    .department
                    .as_ref()
                    .is_none_or(|d| &e.employment_info.department == d)
            })
            .filter(|e| filter.active.is_none_or(|active| e.is_active == active))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            a.personal_info
                .first_name
                .cmp(&b.personal_info.first_name)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matches)
    }

    fn insert_employee(&self, employee: Employee) -> EngineResult<Employee> {
        let mut employees = write(&self.employees, "employee")?;
        if employees.contains_key(&employee.id) {
            return Err(EngineError::DuplicateKey {
                entity: "employee".to_string(),
                key: employee.id,
            });
        }
        if employees
            .values()
            .any(|e| e.email.eq_ignore_ascii_case(&employee.email))
        {
            return Err(EngineError::DuplicateKey {
                entity: "employee".to_string(),
                key: employee.email,
            });
        }
        employees.insert(employee.id.clone(), employee.clone());
        Ok(employee)
    }

    fn update_employee(&self, employee: Employee) -> EngineResult<Employee> {
        let mut employees = write(&self.employees, "employee")?;
        match employees.get_mut(&employee.id) {
            Some(existing) => {
                *existing = employee.clone();
                Ok(employee)
            }
            None => Err(EngineError::not_found("Employee", employee.id)),
        }
    }

    fn employee_count(&self) -> EngineResult<usize> {
        Ok(read(&self.employees, "employee")?.len())
    }
}

impl AttendanceRepository for InMemoryStore {
    fn find_attendance(
        &self,
        employee_id: &str,
        day: NaiveDate,
    ) -> EngineResult<Option<AttendanceRecord>> {
        let attendance = read(&self.attendance, "attendance")?;
        Ok(attendance.get(&(employee_id.to_string(), day)).cloned())
    }

    fn find_attendance_range(
        &self,
        employee_id: &str,
        range: DateRange,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let attendance = read(&self.attendance, "attendance")?;
        let mut records: Vec<AttendanceRecord> = attendance
            .values()
            .filter(|r| r.employee_id == employee_id && range.contains(r.date))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    fn save_attendance(&self, record: AttendanceRecord) -> EngineResult<AttendanceRecord> {
        let mut attendance = write(&self.attendance, "attendance")?;
        let key = (record.employee_id.clone(), record.date);
        if let Some(existing) = attendance.get(&key) {
            if existing.id != record.id {
                return Err(EngineError::DuplicateKey {
                    entity: "attendance".to_string(),
                    key: format!("{}/{}", record.employee_id, record.date),
                });
            }
        }
        attendance.insert(key, record.clone());
        Ok(record)
    }
}

impl LeaveRepository for InMemoryStore {
    fn find_leave(&self, id: Uuid) -> EngineResult<Option<LeaveRequest>> {
        Ok(read(&self.leaves, "leave")?.get(&id).cloned())
    }

    fn leaves_for_employee(&self, employee_id: &str) -> EngineResult<Vec<LeaveRequest>> {
        let leaves = read(&self.leaves, "leave")?;
        let mut matches: Vec<LeaveRequest> = leaves
            .values()
            .filter(|l| l.employee_id == employee_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
        Ok(matches)
    }

    fn pending_leaves(&self) -> EngineResult<Vec<LeaveRequest>> {
        let leaves = read(&self.leaves, "leave")?;
        let mut matches: Vec<LeaveRequest> = leaves
            .values()
            .filter(|l| l.status == LeaveStatus::Pending)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
        Ok(matches)
    }

    fn save_leave(&self, leave: LeaveRequest) -> EngineResult<LeaveRequest> {
        write(&self.leaves, "leave")?.insert(leave.id, leave.clone());
        Ok(leave)
    }
}

impl PayrollRepository for InMemoryStore {
    fn find_payroll(&self, id: Uuid) -> EngineResult<Option<PayrollRecord>> {
        let payroll = read(&self.payroll, "payroll")?;
        Ok(payroll.values().find(|p| p.id == id).cloned())
    }

    fn list_payroll(
        &self,
        month: Option<u32>,
        year: Option<i32>,
    ) -> EngineResult<Vec<PayrollRecord>> {
        let payroll = read(&self.payroll, "payroll")?;
        let mut matches: Vec<PayrollRecord> = payroll
            .values()
            .filter(|p| month.is_none_or(|m| p.pay_period.month == m))
            .filter(|p| year.is_none_or(|y| p.pay_period.year == y))
            .cloned()
            .collect();
        sort_newest_period_first(&mut matches);
        Ok(matches)
    }

    fn payroll_for_employee(&self, employee_id: &str) -> EngineResult<Vec<PayrollRecord>> {
        let payroll = read(&self.payroll, "payroll")?;
        let mut matches: Vec<PayrollRecord> = payroll
            .values()
            .filter(|p| p.employee_id == employee_id)
            .cloned()
            .collect();
        sort_newest_period_first(&mut matches);
        Ok(matches)
    }

    fn save_payroll(&self, record: PayrollRecord) -> EngineResult<PayrollRecord> {
        let mut payroll = write(&self.payroll, "payroll")?;
        let key = (record.employee_id.clone(), record.pay_period);
        if let Some(existing) = payroll.get(&key) {
            if existing.id != record.id {
                return Err(EngineError::DuplicateKey {
                    entity: "payroll".to_string(),
                    key: format!(
                        "{}/{}/{}",
                        record.employee_id, record.pay_period.month, record.pay_period.year
                    ),
                });
            }
        }
        payroll.insert(key, record.clone());
        Ok(record)
    }
}

fn sort_newest_period_first(records: &mut [PayrollRecord]) {
    records.sort_by(|a, b| {
        (b.pay_period.year, b.pay_period.month)
            .cmp(&(a.pay_period.year, a.pay_period.month))
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });
}
