use std::sync::Arc;

use futures::{
    future::{BoxFuture, Shared},
    FutureExt,
};
use shared::domain::{Employee, EmployeeFormData, EmployeeId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    api::EmployeeApi,
    error::{ApiError, MutationKind, StoreError},
};

/// Immutable view of the collection as of one fetch.
pub type EmployeeSnapshot = Arc<[Employee]>;

type SharedFetch = Shared<BoxFuture<'static, Result<EmployeeSnapshot, ApiError>>>;

struct InflightFetch {
    ticket: u64,
    generation: u64,
    fetch: SharedFetch,
}

#[derive(Default)]
struct CacheState {
    snapshot: Option<EmployeeSnapshot>,
    // Bumped on every invalidation; fetches started under an older value are not stored.
    generation: u64,
    next_ticket: u64,
    inflight: Option<InflightFetch>,
}

/// Owns the cached employee list and funnels every mutation through the endpoint.
///
/// The cache is never patched from mutation responses. A successful create,
/// update or delete marks it stale and the next [`EmployeeStore::get_employees`]
/// refetches the whole collection. A failed mutation leaves it as it was.
pub struct EmployeeStore {
    api: Arc<dyn EmployeeApi>,
    state: Mutex<CacheState>,
}

impl EmployeeStore {
    pub fn new(api: Arc<dyn EmployeeApi>) -> Self {
        Self {
            api,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Returns the cached list, fetching it first when absent or stale.
    ///
    /// Callers arriving while a fetch is in flight await that same fetch and
    /// observe its result or its error.
    pub async fn get_employees(&self) -> Result<EmployeeSnapshot, StoreError> {
        let (ticket, generation, fetch) = {
            let mut state = self.state.lock().await;
            if let Some(snapshot) = &state.snapshot {
                return Ok(Arc::clone(snapshot));
            }
            match &state.inflight {
                Some(inflight) => {
                    debug!(ticket = inflight.ticket, "joining in-flight employee fetch");
                    (inflight.ticket, inflight.generation, inflight.fetch.clone())
                }
                None => {
                    let ticket = state.next_ticket;
                    state.next_ticket += 1;
                    let api = Arc::clone(&self.api);
                    let fetch = async move { api.list_all().await.map(EmployeeSnapshot::from) }
                        .boxed()
                        .shared();
                    state.inflight = Some(InflightFetch {
                        ticket,
                        generation: state.generation,
                        fetch: fetch.clone(),
                    });
                    debug!(ticket, "starting employee fetch");
                    (ticket, state.generation, fetch)
                }
            }
        };

        let result = fetch.await;

        let mut state = self.state.lock().await;
        if state.inflight.as_ref().is_some_and(|i| i.ticket == ticket) {
            state.inflight = None;
        }
        match &result {
            Ok(snapshot) if state.generation == generation && state.snapshot.is_none() => {
                info!(count = snapshot.len(), "employee cache populated");
                state.snapshot = Some(Arc::clone(snapshot));
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "failed to load employees"),
        }
        drop(state);

        result.map_err(StoreError::Fetch)
    }

    pub async fn add_employee(&self, data: &EmployeeFormData) -> Result<Employee, StoreError> {
        data.validate()?;
        let created = self
            .api
            .create(data)
            .await
            .map_err(|cause| mutation_failed(MutationKind::Create, cause))?;
        self.invalidate().await;
        info!(id = %created.id, "employee created");
        Ok(created)
    }

    pub async fn update_employee(
        &self,
        id: EmployeeId,
        data: &EmployeeFormData,
    ) -> Result<Employee, StoreError> {
        data.validate()?;
        let updated = self
            .api
            .replace(id, data)
            .await
            .map_err(|cause| mutation_failed(MutationKind::Update, cause))?;
        self.invalidate().await;
        info!(%id, "employee updated");
        Ok(updated)
    }

    pub async fn remove_employee(&self, id: EmployeeId) -> Result<(), StoreError> {
        self.api
            .delete(id)
            .await
            .map_err(|cause| mutation_failed(MutationKind::Delete, cause))?;
        self.invalidate().await;
        info!(%id, "employee deleted");
        Ok(())
    }

    /// Flips `is_active` and replaces the record. The full record is
    /// validated, so a stored record that no longer passes cannot be toggled.
    pub async fn toggle_active(&self, employee: &Employee) -> Result<Employee, StoreError> {
        let data = EmployeeFormData::from(employee).with_active(!employee.is_active);
        self.update_employee(employee.id, &data).await
    }

    /// Marks the cache stale. Waiters on a fetch already in flight still get
    /// its result, but that result is not kept.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.snapshot = None;
        state.inflight = None;
        debug!(generation = state.generation, "employee cache invalidated");
    }

    pub async fn is_stale(&self) -> bool {
        self.state.lock().await.snapshot.is_none()
    }
}

fn mutation_failed(operation: MutationKind, cause: ApiError) -> StoreError {
    warn!(%operation, error = %cause, "employee mutation failed");
    StoreError::MutationFailed { operation, cause }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
