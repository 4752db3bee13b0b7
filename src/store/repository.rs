//! Persistence ports.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{Employee, PlannedShift};

/// Storage for employee aggregates.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Fetch an employee with all of its ledgers.
    async fn find_by_id(&self, id: &str) -> EngineResult<Option<Employee>>;
    /// Replace a stored employee. Fails `EmployeeNotFound` if it is unknown.
    async fn update(&self, employee: &Employee) -> EngineResult<()>;
    /// Store a new employee. Fails `Storage` if the id is taken.
    async fn insert(&self, employee: Employee) -> EngineResult<()>;
    /// Snapshot of every employee.
    async fn list(&self) -> EngineResult<Vec<Employee>>;
}

/// Storage for planned shifts.
#[async_trait]
pub trait ShiftRepository: Send + Sync {
    /// Store a new shift.
    async fn insert(&self, shift: &PlannedShift) -> EngineResult<()>;
    /// Fetch a shift.
    async fn find_by_id(&self, id: Uuid) -> EngineResult<Option<PlannedShift>>;
    /// Replace a stored shift. Fails `ShiftNotFound` if it is unknown.
    async fn update(&self, shift: &PlannedShift) -> EngineResult<()>;
    /// Remove a shift, returning whether it existed.
    async fn delete(&self, id: Uuid) -> EngineResult<bool>;
    /// Snapshot of every shift.
    async fn list(&self) -> EngineResult<Vec<PlannedShift>>;
}
