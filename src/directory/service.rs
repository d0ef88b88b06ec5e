//! Directory operations exposed to the HTTP layer.
//!
//! Reads go through the snapshot source; writes go straight to the upstream
//! and invalidate the snapshot once the upstream confirms them.

use std::sync::Arc;

use crate::directory::cache::{CacheStatus, SnapshotSource};
use crate::directory::client::EmployeeDirectory;
use crate::directory::error::{DirectoryError, DirectoryResult};
use crate::directory::top_k::select_top_k;
use crate::directory::types::{Employee, EmployeeCreateRequest};

/// How many names the top earners query returns.
pub const TOP_EARNERS: usize = 10;

/// Search, aggregate and mutate the employee directory.
#[derive(Clone)]
pub struct DirectoryService {
    directory: Arc<dyn EmployeeDirectory>,
    snapshots: Arc<dyn SnapshotSource>,
}

impl DirectoryService {
    pub fn new(directory: Arc<dyn EmployeeDirectory>, snapshots: Arc<dyn SnapshotSource>) -> Self {
        Self {
            directory,
            snapshots,
        }
    }

    /// Validate and create an employee, then invalidate the snapshot.
    pub async fn create(&self, request: &EmployeeCreateRequest) -> DirectoryResult<Employee> {
        request.validate()?;

        let created = self.directory.create_employee(request).await.map_err(|e| {
            tracing::warn!(name = %request.name, error = %e, "Employee creation not confirmed");
            DirectoryError::CreationFailed
        })?;

        self.snapshots.invalidate();
        tracing::info!(id = %created.id, name = %created.name, "Employee created");
        Ok(created)
    }

    pub async fn find_by_id(&self, id: &str) -> DirectoryResult<Employee> {
        self.directory
            .get_employee(id)
            .await
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))
    }

    /// Every employee in snapshot order.
    pub async fn all(&self) -> Vec<Employee> {
        self.snapshots.get_all().await.employees.clone()
    }

    /// Employees whose name contains `fragment`, ignoring case, in snapshot order.
    pub async fn search_by_name(&self, fragment: &str) -> Vec<Employee> {
        let needle = fragment.to_lowercase();
        self.snapshots
            .get_all()
            .await
            .employees
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Highest salary in the snapshot, 0 when it is empty.
    pub async fn highest_salary(&self) -> u64 {
        self.snapshots
            .get_all()
            .await
            .employees
            .iter()
            .map(|e| e.salary)
            .max()
            .unwrap_or(0)
    }

    /// Names of the `k` best paid employees, salary descending.
    pub async fn top_earner_names(&self, k: usize) -> Vec<String> {
        let snapshot = self.snapshots.get_all().await;
        select_top_k(&snapshot.employees, k)
            .into_iter()
            .map(|e| e.name)
            .collect()
    }

    /// Delete by id and return the deleted name.
    ///
    /// A missing employee also yields `DeletionFailed`.
    pub async fn delete_by_id(&self, id: &str) -> DirectoryResult<String> {
        let name = self
            .directory
            .delete_employee(id)
            .await
            .ok_or_else(|| DirectoryError::DeletionFailed(id.to_string()))?;

        self.snapshots.invalidate();
        tracing::info!(id, name = %name, "Employee deleted");
        Ok(name)
    }

    pub fn cache_status(&self) -> Option<CacheStatus> {
        self.snapshots.status()
    }
}
