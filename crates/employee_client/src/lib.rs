//! Client-side data layer for the employee records endpoint: typed requests,
//! a cached list with invalidate-and-refetch mutations, and the pure views
//! (filtering, dashboard statistics) derived from it.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod filters;
pub mod stats;
pub mod store;

pub use api::{EmployeeApi, HttpEmployeeApi};
pub use auth::{Authenticator, MockAuthenticator, SessionStore};
pub use config::{load_settings, ClientSettings};
pub use error::{ApiError, AuthError, MutationKind, StoreError, TransportError};
pub use filters::{apply_filters, EmployeeFilters, GenderFilter, StatusFilter};
pub use stats::{compute_stats, EmployeeStats, StateCount};
pub use store::{EmployeeSnapshot, EmployeeStore};
