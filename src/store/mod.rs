//! Where appointment rows come from.
//!
//! A store only returns rows. It reports "nothing matched" as an empty list
//! and every failure as a [`FetchError`]; it never invents rows.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::appointments::{AppointmentStatus, FilterCriteria, RawAppointment};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgAppointmentStore;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
    #[error("appointment store unavailable: {0}")]
    Unavailable(String),
}

/// The subset of the filter that a store can push down into its query.
/// Free text is always applied afterwards by the pure filter stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchFilters {
    pub status: Option<AppointmentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl From<&FilterCriteria> for FetchFilters {
    fn from(c: &FilterCriteria) -> Self {
        FetchFilters {
            status: c.status,
            date_from: c.date_from,
            date_to: c.date_to,
        }
    }
}

/// Whose appointments a view lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Patient(Uuid),
    Clinic(Uuid),
    Doctor(Uuid),
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn fetch_by_patient(
        &self,
        patient_id: Uuid,
        filters: &FetchFilters,
    ) -> Result<Vec<RawAppointment>, FetchError>;

    async fn fetch_by_clinic(
        &self,
        clinic_id: Uuid,
        filters: &FetchFilters,
    ) -> Result<Vec<RawAppointment>, FetchError>;

    async fn fetch_by_doctor(
        &self,
        doctor_id: Uuid,
        filters: &FetchFilters,
    ) -> Result<Vec<RawAppointment>, FetchError>;

    async fn fetch_one(&self, appointment_id: Uuid) -> Result<Option<RawAppointment>, FetchError>;

    /// Writes `next` only while the stored status still equals `expected`.
    /// `Ok(None)` means the row is gone or its status moved underneath us.
    async fn update_status(
        &self,
        appointment_id: Uuid,
        expected: AppointmentStatus,
        next: AppointmentStatus,
    ) -> Result<Option<RawAppointment>, FetchError>;

    async fn fetch_scope(
        &self,
        scope: Scope,
        filters: &FetchFilters,
    ) -> Result<Vec<RawAppointment>, FetchError> {
        match scope {
            Scope::Patient(id) => self.fetch_by_patient(id, filters).await,
            Scope::Clinic(id) => self.fetch_by_clinic(id, filters).await,
            Scope::Doctor(id) => self.fetch_by_doctor(id, filters).await,
        }
    }
}

/// Runs any store call under a deadline; expiry becomes [`FetchError::Timeout`].
pub async fn with_deadline<T, F>(timeout: Duration, call: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or(Err(FetchError::Timeout(timeout)))
}

/// Runs a scoped fetch under a deadline.
pub async fn fetch_with_timeout(
    store: &dyn AppointmentStore,
    scope: Scope,
    filters: &FetchFilters,
    timeout: Duration,
) -> Result<Vec<RawAppointment>, FetchError> {
    let result = with_deadline(timeout, store.fetch_scope(scope, filters)).await;

    match &result {
        Ok(rows) => tracing::debug!(?scope, rows = rows.len(), "appointments fetched"),
        Err(e) => tracing::error!(?scope, error = %e, "appointment fetch failed"),
    }
    result
}

/// Tagged result handed to presenters. "No appointments" and "couldn't load
/// appointments" are different variants.
#[derive(Debug)]
pub enum FetchOutcome<T> {
    Loaded(T),
    Empty,
    Failed(FetchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeState {
    Loaded,
    Empty,
    Failed,
}

impl<T> FetchOutcome<Vec<T>> {
    pub fn from_rows(result: Result<Vec<T>, FetchError>) -> Self {
        match result {
            Ok(rows) if rows.is_empty() => FetchOutcome::Empty,
            Ok(rows) => FetchOutcome::Loaded(rows),
            Err(e) => FetchOutcome::Failed(e),
        }
    }
}

impl<T> FetchOutcome<T> {
    pub fn state(&self) -> OutcomeState {
        match self {
            FetchOutcome::Loaded(_) => OutcomeState::Loaded,
            FetchOutcome::Empty => OutcomeState::Empty,
            FetchOutcome::Failed(_) => OutcomeState::Failed,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Loaded(v) => FetchOutcome::Loaded(f(v)),
            FetchOutcome::Empty => FetchOutcome::Empty,
            FetchOutcome::Failed(e) => FetchOutcome::Failed(e),
        }
    }
}
