// src/store/memory.rs
//
// In-process store for tests. Mirrors the push-down semantics of the Postgres
// query: a date bound excludes rows with no date.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use super::{AppointmentStore, FetchError, FetchFilters};
use crate::appointments::{AppointmentStatus, RawAppointment};

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<RawAppointment>>,
    failing: AtomicBool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<RawAppointment>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.rows
            .lock()
            .map(|rows| rows.iter().map(|r| r.id).collect())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn select(
        &self,
        owner: impl Fn(&RawAppointment) -> bool + Send,
        filters: &FetchFilters,
    ) -> Result<Vec<RawAppointment>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Unavailable("memory store set to fail".into()));
        }

        let rows = self.rows.lock().map_err(|_| FetchError::Unavailable("lock poisoned".into()))?;
        Ok(rows
            .iter()
            .filter(|r| owner(*r))
            .filter(|r| match filters.status {
                None => true,
                Some(s) => r.status.as_deref() == Some(s.as_str()),
            })
            .filter(|r| match (filters.date_from, r.appointment_date) {
                (None, _) => true,
                (Some(from), Some(d)) => d >= from,
                (Some(_), None) => false,
            })
            .filter(|r| match (filters.date_to, r.appointment_date) {
                (None, _) => true,
                (Some(to), Some(d)) => d <= to,
                (Some(_), None) => false,
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn fetch_by_patient(
        &self,
        patient_id: Uuid,
        filters: &FetchFilters,
    ) -> Result<Vec<RawAppointment>, FetchError> {
        self.select(|r| r.patient_id == patient_id, filters).await
    }

    async fn fetch_by_clinic(
        &self,
        clinic_id: Uuid,
        filters: &FetchFilters,
    ) -> Result<Vec<RawAppointment>, FetchError> {
        self.select(|r| r.clinic_id == clinic_id, filters).await
    }

    async fn fetch_by_doctor(
        &self,
        doctor_id: Uuid,
        filters: &FetchFilters,
    ) -> Result<Vec<RawAppointment>, FetchError> {
        self.select(|r| r.doctor_id == Some(doctor_id), filters).await
    }

    async fn fetch_one(&self, appointment_id: Uuid) -> Result<Option<RawAppointment>, FetchError> {
        let mut rows = self
            .select(|r| r.id == appointment_id, &FetchFilters::default())
            .await?;
        Ok(rows.pop())
    }

    async fn update_status(
        &self,
        appointment_id: Uuid,
        expected: AppointmentStatus,
        next: AppointmentStatus,
    ) -> Result<Option<RawAppointment>, FetchError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FetchError::Unavailable("memory store set to fail".into()));
        }
        let mut rows = self.rows.lock().map_err(|_| FetchError::Unavailable("lock poisoned".into()))?;
        let Some(row) = rows
            .iter_mut()
            .find(|r| r.id == appointment_id && r.status.as_deref() == Some(expected.as_str()))
        else {
            return Ok(None);
        };
        row.status = Some(next.as_str().to_string());
        Ok(Some(row.clone()))
    }
}
