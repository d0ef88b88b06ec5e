//! Directory domain types and upstream wire formats.

use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::directory::error::DirectoryError;

/// Youngest age accepted on creation.
pub const MIN_AGE: u32 = 16;
/// Oldest age accepted on creation.
pub const MAX_AGE: u32 = 75;

/// An employee as returned by the upstream directory.
///
/// Records are immutable values: a change upstream is only observed by
/// fetching a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Upstream-assigned identifier.
    pub id: String,
    #[serde(rename = "employee_name")]
    pub name: String,
    #[serde(rename = "employee_salary")]
    pub salary: u64,
    #[serde(rename = "employee_age")]
    pub age: u32,
    #[serde(rename = "employee_title", default)]
    pub title: String,
    /// Derived by the upstream from the name; never supplied by us.
    #[serde(rename = "employee_email", default)]
    pub email: String,
}

/// Payload for creating an employee. The identifier is assigned upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeCreateRequest {
    pub name: String,
    pub salary: u64,
    pub age: u32,
    pub title: String,
}

impl EmployeeCreateRequest {
    /// Reject requests the upstream would refuse anyway.
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if self.name.trim().is_empty() {
            return Err(DirectoryError::InvalidInput("name must not be blank".to_string()));
        }
        if self.salary == 0 {
            return Err(DirectoryError::InvalidInput("salary must be greater than 0".to_string()));
        }
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(DirectoryError::InvalidInput(format!(
                "age must be between {} and {}",
                MIN_AGE, MAX_AGE
            )));
        }
        if self.title.trim().is_empty() {
            return Err(DirectoryError::InvalidInput("title must not be blank".to_string()));
        }
        Ok(())
    }
}

/// Upstream response wrapper: `{ "data": ..., "status": "..." }`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub status: Option<String>,
}

/// Body of the upstream delete-by-name call.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteByName<'a> {
    pub name: &'a str,
}

/// All employees as of the last successful fetch.
#[derive(Debug, Clone)]
pub struct DirectorySnapshot {
    pub employees: Vec<Employee>,
    pub fetched_at: SystemTime,
}

impl DirectorySnapshot {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self {
            employees,
            fetched_at: SystemTime::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Time since the snapshot was taken.
    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed().unwrap_or_default()
    }
}
