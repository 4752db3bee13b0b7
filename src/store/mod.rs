//! Persistence ports, in-memory adapters and per-employee locking.

mod locks;
mod memory;
mod repository;

pub use locks::{EmployeeGuard, EmployeeLocks};
pub use memory::{InMemoryEmployeeRepository, InMemoryShiftRepository};
pub use repository::{EmployeeRepository, ShiftRepository};
