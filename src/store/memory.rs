//! In-memory repository adapters.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PlannedShift};

use super::repository::{EmployeeRepository, ShiftRepository};

/// Employees held in a map keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeRepository {
    employees: RwLock<HashMap<String, Employee>>,
}

impl InMemoryEmployeeRepository {
    /// Creates a repository seeded with `employees`.
    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        Self {
            employees: RwLock::new(employees.into_iter().map(|e| (e.id.clone(), e)).collect()),
        }
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn find_by_id(&self, id: &str) -> EngineResult<Option<Employee>> {
        Ok(self.employees.read().await.get(id).cloned())
    }

    async fn update(&self, employee: &Employee) -> EngineResult<()> {
        let mut employees = self.employees.write().await;
        match employees.get_mut(&employee.id) {
            Some(stored) => {
                *stored = employee.clone();
                Ok(())
            }
            None => Err(EngineError::EmployeeNotFound {
                employee_id: employee.id.clone(),
            }),
        }
    }

    async fn insert(&self, employee: Employee) -> EngineResult<()> {
        let mut employees = self.employees.write().await;
        if employees.contains_key(&employee.id) {
            return Err(EngineError::EmployeeExists {
                employee_id: employee.id,
            });
        }
        employees.insert(employee.id.clone(), employee);
        Ok(())
    }

    async fn list(&self) -> EngineResult<Vec<Employee>> {
        let mut employees: Vec<Employee> = self.employees.read().await.values().cloned().collect();
        employees.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(employees)
    }
}

/// Planned shifts held in a map keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryShiftRepository {
    shifts: RwLock<HashMap<Uuid, PlannedShift>>,
}

#[async_trait]
impl ShiftRepository for InMemoryShiftRepository {
    async fn insert(&self, shift: &PlannedShift) -> EngineResult<()> {
        let mut shifts = self.shifts.write().await;
        if shifts.contains_key(&shift.id) {
            return Err(EngineError::Storage {
                message: format!("shift '{}' already exists", shift.id),
            });
        }
        shifts.insert(shift.id, shift.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> EngineResult<Option<PlannedShift>> {
        Ok(self.shifts.read().await.get(&id).cloned())
    }

    async fn update(&self, shift: &PlannedShift) -> EngineResult<()> {
        let mut shifts = self.shifts.write().await;
        match shifts.get_mut(&shift.id) {
            Some(stored) => {
                *stored = shift.clone();
                Ok(())
            }
            None => Err(EngineError::ShiftNotFound {
                shift_id: shift.id.to_string(),
            }),
        }
    }

    async fn delete(&self, id: Uuid) -> EngineResult<bool> {
        Ok(self.shifts.write().await.remove(&id).is_some())
    }

    async fn list(&self) -> EngineResult<Vec<PlannedShift>> {
        Ok(self.shifts.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftStatus;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn test_employee_round_trip() {
        let repo = InMemoryEmployeeRepository::default();
        repo.insert(Employee::new("emp_001", "Asha")).await.unwrap();

        let mut employee = repo.find_by_id("emp_001").await.unwrap().unwrap();
        employee.name = "Asha Rao".to_string();
        repo.update(&employee).await.unwrap();

        let stored = repo.find_by_id("emp_001").await.unwrap().unwrap();
        assert_eq!(stored.name, "Asha Rao");
        assert!(repo.find_by_id("emp_404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_and_unknown_update() {
        let repo = InMemoryEmployeeRepository::with_employees([Employee::new("emp_001", "Asha")]);
        assert!(matches!(
            repo.insert(Employee::new("emp_001", "Other")).await,
            Err(EngineError::EmployeeExists { .. })
        ));
        assert!(matches!(
            repo.update(&Employee::new("emp_404", "Nobody")).await,
            Err(EngineError::EmployeeNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_id() {
        let repo = InMemoryEmployeeRepository::with_employees([
            Employee::new("emp_003", "C"),
            Employee::new("emp_001", "A"),
            Employee::new("emp_002", "B"),
        ]);
        let ids: Vec<_> = repo.list().await.unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["emp_001", "emp_002", "emp_003"]);
    }

    #[tokio::test]
    async fn test_shift_lifecycle() {
        let repo = InMemoryShiftRepository::default();
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let mut shift = PlannedShift {
            id: Uuid::new_v4(),
            employee_id: "emp_001".to_string(),
            start: at,
            end: at + chrono::Duration::hours(8),
            location: None,
            status: ShiftStatus::Scheduled,
            notes: None,
            created_at: at,
            updated_at: at,
        };

        repo.insert(&shift).await.unwrap();
        shift.status = ShiftStatus::Cancelled;
        repo.update(&shift).await.unwrap();
        assert_eq!(
            repo.find_by_id(shift.id).await.unwrap().unwrap().status,
            ShiftStatus::Cancelled
        );

        assert!(repo.delete(shift.id).await.unwrap());
        assert!(!repo.delete(shift.id).await.unwrap());
        assert!(matches!(
            repo.update(&shift).await,
            Err(EngineError::ShiftNotFound { .. })
        ));
    }
}
