//! Outbound notifications.
//!
//! The service emits a [`Notification`] after each committed leave,
//! correction or shift mutation. Delivery is best-effort: a failing
//! [`Notifier`] is logged and never rolls back the mutation.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{ReviewStatus, ShiftStatus};

/// Something an employee or a manager may want to hear about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Notification {
    /// A leave was filed.
    LeaveRequested {
        employee_id: String,
        leave_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// A leave was approved, rejected or reopened.
    LeaveStatusChanged {
        employee_id: String,
        leave_id: Uuid,
        status: ReviewStatus,
    },
    /// A pending leave was withdrawn.
    LeaveCancelled {
        employee_id: String,
        leave_id: Uuid,
    },
    /// A correction was filed.
    CorrectionRequested {
        employee_id: String,
        correction_id: Uuid,
        date: NaiveDate,
    },
    /// A correction was approved or rejected.
    CorrectionReviewed {
        employee_id: String,
        correction_id: Uuid,
        status: ReviewStatus,
    },
    /// A shift was planned.
    ShiftScheduled {
        employee_id: String,
        shift_id: Uuid,
    },
    /// A planned shift changed.
    ShiftUpdated {
        employee_id: String,
        shift_id: Uuid,
        status: ShiftStatus,
    },
    /// A planned shift was deleted.
    ShiftRemoved {
        employee_id: String,
        shift_id: Uuid,
    },
}

impl Notification {
    /// The employee the notification concerns.
    pub fn employee_id(&self) -> &str {
        match self {
            Notification::LeaveRequested { employee_id, .. }
            | Notification::LeaveStatusChanged { employee_id, .. }
            | Notification::LeaveCancelled { employee_id, .. }
            | Notification::CorrectionRequested { employee_id, .. }
            | Notification::CorrectionReviewed { employee_id, .. }
            | Notification::ShiftScheduled { employee_id, .. }
            | Notification::ShiftUpdated { employee_id, .. }
            | Notification::ShiftRemoved { employee_id, .. } => employee_id,
        }
    }
}

/// Delivery port for notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification.
    async fn notify(&self, notification: &Notification) -> EngineResult<()>;
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notification: &Notification) -> EngineResult<()> {
        tracing::info!(
            employee_id = %notification.employee_id(),
            notification = ?notification,
            "Notification emitted"
        );
        Ok(())
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Notifications received so far, oldest first.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> EngineResult<()> {
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification.clone());
        Ok(())
    }
}
