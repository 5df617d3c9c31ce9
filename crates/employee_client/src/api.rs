use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::domain::{Employee, EmployeeFormData, EmployeeId};
use tracing::debug;
use url::Url;

use crate::error::{ApiError, TransportError};

pub const EMPLOYEES_PATH: &str = "employees";

/// Requests against the remote employee collection. Failures are never retried.
#[async_trait]
pub trait EmployeeApi: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Employee>, ApiError>;
    async fn get_by_id(&self, id: EmployeeId) -> Result<Employee, ApiError>;
    async fn create(&self, data: &EmployeeFormData) -> Result<Employee, ApiError>;
    async fn replace(&self, id: EmployeeId, data: &EmployeeFormData)
        -> Result<Employee, ApiError>;
    async fn delete(&self, id: EmployeeId) -> Result<(), ApiError>;
}

pub struct HttpEmployeeApi {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpEmployeeApi {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| TransportError::Network(err.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/{EMPLOYEES_PATH}", self.base_url)
    }

    fn record_url(&self, id: EmployeeId) -> String {
        format!("{}/{EMPLOYEES_PATH}/{}", self.base_url, id)
    }

    fn transport(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Transport(TransportError::Timeout(self.timeout))
        } else {
            ApiError::Transport(err.into())
        }
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        id: Option<EmployeeId>,
    ) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|err| self.transport(err))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(ApiError::NotFound { id });
            }
        }
        let body = response.text().await.map_err(|err| self.transport(err))?;
        Err(ApiError::Transport(TransportError::Status {
            status: status.as_u16(),
            body,
        }))
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let bytes = response.bytes().await.map_err(|err| self.transport(err))?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::Transport(TransportError::Decode(err.to_string())))
    }
}

#[async_trait]
impl EmployeeApi for HttpEmployeeApi {
    async fn list_all(&self) -> Result<Vec<Employee>, ApiError> {
        let url = self.collection_url();
        debug!(method = "GET", %url, "listing employees");
        let response = self.send(self.http.get(&url), None).await?;
        self.decode(response).await
    }

    async fn get_by_id(&self, id: EmployeeId) -> Result<Employee, ApiError> {
        let url = self.record_url(id);
        debug!(method = "GET", %url, "fetching employee");
        let response = self.send(self.http.get(&url), Some(id)).await?;
        self.decode(response).await
    }

    async fn create(&self, data: &EmployeeFormData) -> Result<Employee, ApiError> {
        let url = self.collection_url();
        debug!(method = "POST", %url, "creating employee");
        let response = self.send(self.http.post(&url).json(data), None).await?;
        self.decode(response).await
    }

    async fn replace(
        &self,
        id: EmployeeId,
        data: &EmployeeFormData,
    ) -> Result<Employee, ApiError> {
        let url = self.record_url(id);
        debug!(method = "PUT", %url, "replacing employee");
        let response = self.send(self.http.put(&url).json(data), Some(id)).await?;
        self.decode(response).await
    }

    async fn delete(&self, id: EmployeeId) -> Result<(), ApiError> {
        let url = self.record_url(id);
        debug!(method = "DELETE", %url, "deleting employee");
        self.send(self.http.delete(&url), Some(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
