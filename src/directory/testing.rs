//! In-memory fakes shared by the directory unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::Method;
use parking_lot::Mutex;

use crate::directory::client::EmployeeDirectory;
use crate::directory::error::UpstreamError;
use crate::directory::types::{Employee, EmployeeCreateRequest};
use crate::upstream::{Transport, TransportError, UpstreamRequest, UpstreamResponse};

pub fn employee(id: &str, name: &str, salary: u64) -> Employee {
    Employee {
        id: id.to_string(),
        name: name.to_string(),
        salary,
        age: 30,
        title: "Engineer".to_string(),
        email: format!("{}@test.com", name.to_lowercase()),
    }
}

pub fn alice() -> Employee {
    Employee {
        id: "1".to_string(),
        name: "Alice".to_string(),
        salary: 1000,
        age: 30,
        title: "Proj. Mgr".to_string(),
        email: "alice@test.com".to_string(),
    }
}

pub fn bob() -> Employee {
    Employee {
        id: "2".to_string(),
        name: "Bob".to_string(),
        salary: 900,
        age: 25,
        title: "Dev".to_string(),
        email: "bob@test.com".to_string(),
    }
}

type Handler =
    Box<dyn Fn(&UpstreamRequest) -> Result<UpstreamResponse, TransportError> + Send + Sync>;

/// Transport that records every request and answers via a closure.
pub struct RecordingTransport {
    handler: Handler,
    requests: Mutex<Vec<UpstreamRequest>>,
}

impl RecordingTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&UpstreamRequest) -> Result<UpstreamResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<UpstreamRequest> {
        self.requests.lock().clone()
    }

    pub fn count(&self, method: &Method) -> usize {
        self.requests.lock().iter().filter(|r| &r.method == method).count()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, TransportError> {
        self.requests.lock().push(request.clone());
        (self.handler)(request)
    }
}

/// Directory backed by a vector, with call counters and an optional list delay.
#[derive(Default)]
pub struct FakeDirectory {
    pub employees: Mutex<Vec<Employee>>,
    pub list_delay: Duration,
    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub fail_create: bool,
}

impl FakeDirectory {
    pub fn with(employees: Vec<Employee>) -> Self {
        Self {
            employees: Mutex::new(employees),
            ..Default::default()
        }
    }

    pub fn slow(employees: Vec<Employee>, list_delay: Duration) -> Self {
        Self {
            employees: Mutex::new(employees),
            list_delay,
            ..Default::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn set_employees(&self, employees: Vec<Employee>) {
        *self.employees.lock() = employees;
    }
}

#[async_trait]
impl EmployeeDirectory for FakeDirectory {
    async fn create_employee(
        &self,
        request: &EmployeeCreateRequest,
    ) -> Result<Employee, UpstreamError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create {
            return Err(UpstreamError::EmptyEnvelope);
        }
        let mut employees = self.employees.lock();
        let created = Employee {
            id: format!("id-{}", employees.len() + 1),
            name: request.name.clone(),
            salary: request.salary,
            age: request.age,
            title: request.title.clone(),
            email: format!("{}@test.com", request.name.to_lowercase()),
        };
        employees.push(created.clone());
        Ok(created)
    }

    async fn list_employees(&self) -> Vec<Employee> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        // Read before the delay so the result reflects call time.
        let employees = self.employees.lock().clone();
        if !self.list_delay.is_zero() {
            tokio::time::sleep(self.list_delay).await;
        }
        employees
    }

    async fn get_employee(&self, id: &str) -> Option<Employee> {
        self.employees.lock().iter().find(|e| e.id == id).cloned()
    }

    async fn delete_employee(&self, id: &str) -> Option<String> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut employees = self.employees.lock();
        let pos = employees.iter().position(|e| e.id == id)?;
        Some(employees.remove(pos).name)
    }
}
