//! Client for the upstream employee directory API.
//!
//! # Responsibilities
//! - Build create/list/get/delete calls against the configured collection URL
//! - Unwrap `{data, status}` envelopes into domain records
//! - Absorb transport and decoding failures into empty/absent results
//!
//! # Design Decisions
//! - Upstream unavailability is never an error for callers of this layer
//! - Delete is lookup-by-id then delete-by-name, because the upstream
//!   deletes by name; a miss on the lookup never reaches the delete call
//! - Only an explicit `data: true` counts as a successful delete

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::directory::error::UpstreamError;
use crate::directory::types::{DeleteByName, Employee, EmployeeCreateRequest, Envelope};
use crate::upstream::{Transport, UpstreamRequest, UpstreamResponse};

/// Operations the service needs from the upstream directory.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Create an employee, returning the upstream's record.
    async fn create_employee(
        &self,
        request: &EmployeeCreateRequest,
    ) -> Result<Employee, UpstreamError>;

    /// All employees in upstream order; empty on any failure.
    async fn list_employees(&self) -> Vec<Employee>;

    /// A single employee; `None` when missing or on any failure.
    async fn get_employee(&self, id: &str) -> Option<Employee>;

    /// Delete an employee by id, returning the deleted name.
    /// `None` covers "not found", "not confirmed" and failures alike.
    async fn delete_employee(&self, id: &str) -> Option<String>;
}

/// [`EmployeeDirectory`] over HTTP.
#[derive(Clone)]
pub struct DirectoryClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
}

impl DirectoryClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        Ok(Self {
            transport,
            base_url,
        })
    }

    fn employee_url(&self, id: &str) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url.to_string()
    }

    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let response = self.transport.execute(&request).await?;
        if !response.status.is_success() {
            return Err(UpstreamError::Status(response.status.as_u16()));
        }
        Ok(response)
    }

    fn decode<T: DeserializeOwned>(response: &UpstreamResponse) -> Result<T, UpstreamError> {
        let envelope: Envelope<T> = serde_json::from_str(&response.body)
            .map_err(|e| UpstreamError::Decode(e.to_string()))?;
        envelope.data.ok_or(UpstreamError::EmptyEnvelope)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: UpstreamRequest,
    ) -> Result<T, UpstreamError> {
        let response = self.send(request).await?;
        Self::decode(&response)
    }
}

impl std::fmt::Debug for DirectoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[async_trait]
impl EmployeeDirectory for DirectoryClient {
    async fn create_employee(
        &self,
        request: &EmployeeCreateRequest,
    ) -> Result<Employee, UpstreamError> {
        let body = serde_json::to_value(request).map_err(|e| UpstreamError::Decode(e.to_string()))?;
        match self.fetch::<Employee>(UpstreamRequest::post(self.base_url.as_str(), body)).await {
            Ok(created) => {
                tracing::debug!(id = %created.id, name = %created.name, "Created employee");
                Ok(created)
            }
            Err(e) => {
                tracing::error!(name = %request.name, error = %e, "Failed to create employee");
                Err(e)
            }
        }
    }

    async fn list_employees(&self) -> Vec<Employee> {
        match self.fetch::<Vec<Employee>>(UpstreamRequest::get(self.base_url.as_str())).await {
            Ok(employees) => employees,
            Err(e) => {
                tracing::error!(url = %self.base_url, error = %e, "Failed to fetch employees");
                Vec::new()
            }
        }
    }

    async fn get_employee(&self, id: &str) -> Option<Employee> {
        match self.fetch::<Employee>(UpstreamRequest::get(self.employee_url(id))).await {
            Ok(employee) => Some(employee),
            Err(UpstreamError::Status(404)) => {
                tracing::debug!(id, "Employee not found upstream");
                None
            }
            Err(e) => {
                tracing::error!(id, error = %e, "Failed to fetch employee");
                None
            }
        }
    }

    async fn delete_employee(&self, id: &str) -> Option<String> {
        let name = match self.get_employee(id).await {
            Some(employee) if !employee.name.trim().is_empty() => employee.name,
            _ => {
                tracing::warn!(id, "Cannot delete employee: id not found or name missing");
                return None;
            }
        };

        let body = match serde_json::to_value(DeleteByName { name: &name }) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(id, error = %e, "Failed to encode delete request");
                return None;
            }
        };

        match self.fetch::<bool>(UpstreamRequest::delete(self.base_url.as_str(), body)).await {
            Ok(true) => {
                tracing::debug!(id, name = %name, "Deleted employee");
                Some(name)
            }
            Ok(false) | Err(UpstreamError::EmptyEnvelope) => {
                tracing::warn!(id, name = %name, "Upstream did not confirm deletion");
                None
            }
            Err(UpstreamError::Status(status)) if status == StatusCode::NOT_FOUND.as_u16() => {
                // Removed between the lookup and the delete call.
                tracing::warn!(id, name = %name, "Employee vanished before deletion");
                None
            }
            Err(e) => {
                tracing::error!(id, name = %name, error = %e, "Failed to delete employee");
                None
            }
        }
    }
}
