//! Per-employee critical sections.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = Mutex<HashMap<String, Arc<AsyncMutex<()>>>>;

/// One async mutex per employee id.
///
/// Holding the guard returned by [`EmployeeLocks::acquire`] serializes every
/// read-modify-write of that employee's aggregate. Different employees never
/// contend. An entry lives only while someone holds or waits for it.
#[derive(Debug, Default)]
pub struct EmployeeLocks {
    locks: LockMap,
}

impl EmployeeLocks {
    /// Waits for exclusive access to `employee_id`.
    pub async fn acquire(&self, employee_id: &str) -> EmployeeGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks.entry(employee_id.to_string()).or_default().clone()
        };
        EmployeeGuard {
            locks: &self.locks,
            employee_id: employee_id.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Number of employees currently locked or awaited.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether no employee is locked or awaited.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive access to one employee; released on drop.
#[derive(Debug)]
pub struct EmployeeGuard<'a> {
    locks: &'a LockMap,
    employee_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for EmployeeGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        // Waiters hold their own clone, so a count of one means nobody needs it.
        if locks
            .get(&self.employee_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.employee_id);
        }
    }
}
