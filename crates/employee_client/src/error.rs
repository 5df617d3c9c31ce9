use std::{fmt, time::Duration};

use shared::{domain::EmployeeId, error::ValidationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("employee {id} not found")]
    NotFound { id: EmployeeId },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("failed to load employees: {0}")]
    Fetch(#[from] ApiError),
    #[error("employee {operation} failed: {cause}")]
    MutationFailed {
        operation: MutationKind,
        #[source]
        cause: ApiError,
    },
    #[error("employee form rejected: {0}")]
    Invalid(#[from] ValidationError),
}

impl StoreError {
    pub fn mutation(&self) -> Option<MutationKind> {
        match self {
            StoreError::MutationFailed { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("session storage failure: {0}")]
    Session(String),
}
