//! Orchestration of ledger operations over the repositories.
//!
//! [`WorkforceService`] loads an employee inside its critical section, runs a
//! pure ledger transition on an owned copy and writes the copy back only when
//! the transition succeeds. Cross-employee reads work on snapshots and take
//! no locks.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::SiteConfig;
use crate::error::{EngineError, EngineResult};
use crate::ledger::{
    self, AttendanceOverride, ClockInRequest, ClockOutRequest, CorrectionDecision,
    CorrectionInput, LeaveFilter, LeaveInput, LeaveListing,
};
use crate::models::{
    AttendanceRecord, CorrectionRequest, Employee, LeaveRequest, PlannedShift, ReviewStatus,
};
use crate::notify::{Notification, Notifier};
use crate::scheduling::{self, ShiftInput, ShiftPatch, ShiftQuery};
use crate::stats::{self, AttendanceStats, ChartPoint};
use crate::store::{EmployeeLocks, EmployeeRepository, ShiftRepository};
use crate::time::Clock;

/// Dashboard payload for one employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// The employee.
    pub employee_id: String,
    /// Site-local current day.
    pub today: NaiveDate,
    /// Today's record, if any.
    pub today_record: Option<AttendanceRecord>,
    /// Statistics over the chart window.
    pub stats: AttendanceStats,
    /// Hours per day over the chart window, oldest first.
    pub chart: Vec<ChartPoint>,
}

/// Entry point for every attendance, leave, correction and shift operation.
pub struct WorkforceService {
    config: SiteConfig,
    employees: Arc<dyn EmployeeRepository>,
    shifts: Arc<dyn ShiftRepository>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    locks: EmployeeLocks,
}

impl WorkforceService {
    /// Creates a service over the given collaborators.
    pub fn new(
        config: SiteConfig,
        employees: Arc<dyn EmployeeRepository>,
        shifts: Arc<dyn ShiftRepository>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            employees,
            shifts,
            notifier,
            clock,
            locks: EmployeeLocks::default(),
        }
    }

    /// The site configuration.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    async fn load(&self, employee_id: &str) -> EngineResult<Employee> {
        self.employees
            .find_by_id(employee_id)
            .await?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })
    }

    /// Runs `op` on a copy of the employee under its lock and persists the
    /// copy if `op` succeeds.
    async fn mutate<T, F>(&self, employee_id: &str, op: F) -> EngineResult<T>
    where
        T: Send,
        F: FnOnce(&mut Employee, DateTime<Utc>, &SiteConfig) -> EngineResult<T> + Send,
    {
        let _guard = self.locks.acquire(employee_id).await;
        let mut employee = self.load(employee_id).await?;
        let output = op(&mut employee, self.now(), &self.config)?;
        self.employees.update(&employee).await?;
        Ok(output)
    }

    async fn publish(&self, notification: Notification) {
        if let Err(error) = self.notifier.notify(&notification).await {
            warn!(
                employee_id = %notification.employee_id(),
                error = %error,
                "Notification delivery failed"
            );
        }
    }

    /// Registers an employee supplied by the identity collaborator.
    pub async fn register_employee(&self, employee: Employee) -> EngineResult<Employee> {
        self.employees.insert(employee.clone()).await?;
        info!(employee_id = %employee.id, "Employee registered");
        Ok(employee)
    }

    /// Fetches an employee with all of its ledgers.
    pub async fn employee(&self, employee_id: &str) -> EngineResult<Employee> {
        self.load(employee_id).await
    }

    /// Clocks the employee in for today.
    pub async fn clock_in(
        &self,
        employee_id: &str,
        request: ClockInRequest,
    ) -> EngineResult<AttendanceRecord> {
        let record = self
            .mutate(employee_id, |employee, now, site| {
                ledger::clock_in(employee, request, now, site)
            })
            .await?;
        info!(
            employee_id = %employee_id,
            date = %record.date,
            status = %record.status,
            "Clocked in"
        );
        Ok(record)
    }

    /// Clocks the employee out of the open record.
    pub async fn clock_out(
        &self,
        employee_id: &str,
        request: ClockOutRequest,
    ) -> EngineResult<AttendanceRecord> {
        let record = self
            .mutate(employee_id, |employee, now, site| {
                ledger::clock_out(employee, request, now, site)
            })
            .await?;
        info!(
            employee_id = %employee_id,
            date = %record.date,
            status = %record.status,
            hours_worked = %record.hours_worked,
            "Clocked out"
        );
        Ok(record)
    }

    /// Today's record, if the employee has one.
    pub async fn today_record(&self, employee_id: &str) -> EngineResult<Option<AttendanceRecord>> {
        let employee = self.load(employee_id).await?;
        Ok(ledger::today_record(&employee, self.now(), &self.config))
    }

    /// Administrative override of one day.
    pub async fn override_attendance(
        &self,
        employee_id: &str,
        date: NaiveDate,
        changes: AttendanceOverride,
    ) -> EngineResult<AttendanceRecord> {
        let record = self
            .mutate(employee_id, |employee, _, site| {
                ledger::override_attendance(employee, date, changes, site)
            })
            .await?;
        info!(
            employee_id = %employee_id,
            date = %record.date,
            status = %record.status,
            "Attendance overridden"
        );
        Ok(record)
    }

    /// Statistics over `[from, to]`; either bound may be omitted.
    pub async fn attendance_stats(
        &self,
        employee_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> EngineResult<AttendanceStats> {
        let employee = self.load(employee_id).await?;
        let today = self.config.today(self.now());
        let slice = stats::filter_records(&employee.attendance, from, to);
        Ok(stats::compute_stats(slice, today))
    }

    /// Dashboard over the configured rolling window.
    pub async fn dashboard(&self, employee_id: &str) -> EngineResult<Dashboard> {
        let employee = self.load(employee_id).await?;
        let now = self.now();
        let today = self.config.today(now);
        let days = self.config.dashboard.chart_days;

        let first = today - chrono::Duration::days((days - 1).max(0));
        let slice = stats::filter_records(&employee.attendance, Some(first), Some(today));

        Ok(Dashboard {
            employee_id: employee.id.clone(),
            today,
            today_record: ledger::today_record(&employee, now, &self.config),
            stats: stats::compute_stats(slice, today),
            chart: stats::dashboard_chart(&employee.attendance, today, days),
        })
    }

    /// Files a correction request.
    pub async fn request_correction(
        &self,
        employee_id: &str,
        input: CorrectionInput,
    ) -> EngineResult<CorrectionRequest> {
        let request = self
            .mutate(employee_id, |employee, now, site| {
                ledger::request_correction(employee, input, now, site)
            })
            .await?;
        info!(
            employee_id = %employee_id,
            correction_id = %request.id,
            date = %request.date,
            "Correction requested"
        );
        self.publish(Notification::CorrectionRequested {
            employee_id: employee_id.to_string(),
            correction_id: request.id,
            date: request.date,
        })
        .await;
        Ok(request)
    }

    /// Approves or rejects a pending correction.
    pub async fn review_correction(
        &self,
        employee_id: &str,
        correction_id: Uuid,
        decision: CorrectionDecision,
        note: Option<String>,
    ) -> EngineResult<CorrectionRequest> {
        let request = self
            .mutate(employee_id, |employee, now, site| {
                ledger::review_correction(employee, correction_id, decision, note, now, site)
            })
            .await?;
        info!(
            employee_id = %employee_id,
            correction_id = %correction_id,
            status = %request.status,
            "Correction reviewed"
        );
        self.publish(Notification::CorrectionReviewed {
            employee_id: employee_id.to_string(),
            correction_id,
            status: request.status,
        })
        .await;
        Ok(request)
    }

    /// Files a leave request.
    pub async fn request_leave(
        &self,
        employee_id: &str,
        input: LeaveInput,
    ) -> EngineResult<LeaveRequest> {
        let leave = self
            .mutate(employee_id, |employee, now, site| {
                ledger::request_leave(employee, input, now, site)
            })
            .await?;
        let zone = self.config.timezone();
        info!(
            employee_id = %employee_id,
            leave_id = %leave.id,
            days = leave.days,
            "Leave requested"
        );
        self.publish(Notification::LeaveRequested {
            employee_id: employee_id.to_string(),
            leave_id: leave.id,
            start: leave.first_day(zone),
            end: leave.last_day(zone),
        })
        .await;
        Ok(leave)
    }

    /// Moves a leave to a new review status.
    pub async fn update_leave_status(
        &self,
        employee_id: &str,
        leave_id: Uuid,
        status: ReviewStatus,
    ) -> EngineResult<LeaveRequest> {
        let leave = self
            .mutate(employee_id, |employee, now, site| {
                ledger::update_leave_status(employee, leave_id, status, now, site)
            })
            .await?;
        info!(
            employee_id = %employee_id,
            leave_id = %leave_id,
            status = %leave.status,
            "Leave status updated"
        );
        self.publish(Notification::LeaveStatusChanged {
            employee_id: employee_id.to_string(),
            leave_id,
            status: leave.status,
        })
        .await;
        Ok(leave)
    }

    /// Withdraws a pending leave that has not started.
    pub async fn cancel_leave(&self, employee_id: &str, leave_id: Uuid) -> EngineResult<LeaveRequest> {
        let leave = self
            .mutate(employee_id, |employee, now, _| {
                ledger::cancel_leave(employee, leave_id, now)
            })
            .await?;
        info!(employee_id = %employee_id, leave_id = %leave_id, "Leave cancelled");
        self.publish(Notification::LeaveCancelled {
            employee_id: employee_id.to_string(),
            leave_id,
        })
        .await;
        Ok(leave)
    }

    /// Cross-employee leave listing.
    pub async fn list_leaves(&self, filter: &LeaveFilter) -> EngineResult<Vec<LeaveListing>> {
        let employees = self.employees.list().await?;
        Ok(ledger::list_leaves(&employees, filter, self.config.timezone()))
    }

    /// Plans a shift and links it to its employee.
    pub async fn create_shift(&self, input: ShiftInput) -> EngineResult<PlannedShift> {
        let shift = scheduling::build_shift(input, self.now(), &self.config)?;

        let _guard = self.locks.acquire(&shift.employee_id).await;
        let mut employee = self.load(&shift.employee_id).await?;
        scheduling::attach(&mut employee, shift.id);

        self.shifts.insert(&shift).await?;
        if let Err(error) = self.employees.update(&employee).await {
            if let Err(undo) = self.shifts.delete(shift.id).await {
                warn!(shift_id = %shift.id, error = %undo, "Failed to roll back shift insert");
            }
            return Err(error);
        }

        info!(
            employee_id = %shift.employee_id,
            shift_id = %shift.id,
            start = %shift.start,
            "Shift scheduled"
        );
        self.publish(Notification::ShiftScheduled {
            employee_id: shift.employee_id.clone(),
            shift_id: shift.id,
        })
        .await;
        Ok(shift)
    }

    async fn find_shift(&self, shift_id: Uuid) -> EngineResult<PlannedShift> {
        self.shifts
            .find_by_id(shift_id)
            .await?
            .ok_or_else(|| EngineError::ShiftNotFound {
                shift_id: shift_id.to_string(),
            })
    }

    /// Fetches one planned shift.
    pub async fn shift(&self, shift_id: Uuid) -> EngineResult<PlannedShift> {
        self.find_shift(shift_id).await
    }

    /// Applies a partial update to a planned shift.
    pub async fn update_shift(&self, shift_id: Uuid, patch: ShiftPatch) -> EngineResult<PlannedShift> {
        let owner = self.find_shift(shift_id).await?.employee_id;
        let _guard = self.locks.acquire(&owner).await;

        let mut shift = self.find_shift(shift_id).await?;
        scheduling::apply_patch(&mut shift, patch, self.now(), &self.config)?;
        self.shifts.update(&shift).await?;

        info!(
            employee_id = %shift.employee_id,
            shift_id = %shift.id,
            status = %shift.status,
            "Shift updated"
        );
        self.publish(Notification::ShiftUpdated {
            employee_id: shift.employee_id.clone(),
            shift_id,
            status: shift.status,
        })
        .await;
        Ok(shift)
    }

    /// Deletes a planned shift and its back-reference.
    pub async fn delete_shift(&self, shift_id: Uuid) -> EngineResult<PlannedShift> {
        let owner = self.find_shift(shift_id).await?.employee_id;
        let _guard = self.locks.acquire(&owner).await;

        let shift = self.find_shift(shift_id).await?;
        let employee = self.employees.find_by_id(&owner).await?;

        if !self.shifts.delete(shift_id).await? {
            return Err(EngineError::ShiftNotFound {
                shift_id: shift_id.to_string(),
            });
        }
        if let Some(mut employee) = employee {
            scheduling::detach(&mut employee, shift_id);
            if let Err(error) = self.employees.update(&employee).await {
                if let Err(undo) = self.shifts.insert(&shift).await {
                    warn!(shift_id = %shift_id, error = %undo, "Failed to restore deleted shift");
                }
                return Err(error);
            }
        }

        info!(employee_id = %owner, shift_id = %shift_id, "Shift deleted");
        self.publish(Notification::ShiftRemoved {
            employee_id: owner,
            shift_id,
        })
        .await;
        Ok(shift)
    }

    /// Planned shifts matching `query`, sorted by start.
    pub async fn list_shifts(&self, query: &ShiftQuery) -> EngineResult<Vec<PlannedShift>> {
        let shifts = self.shifts.list().await?;
        Ok(scheduling::query_shifts(shifts, query, self.config.timezone()))
    }
}
