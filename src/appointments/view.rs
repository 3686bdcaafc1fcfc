// src/appointments/view.rs
//
// Per-screen appointment state with last-request-wins fetch handling.

use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::Mutex;

use super::aggregate::{aggregate, AppointmentSummary};
use super::bucket::{bucket_for_clinic, bucket_for_patient, BucketOrder, ClinicBuckets, PatientBuckets};
use super::filter::{filter, FilterCriteria};
use super::record::{validate_rows, RawAppointment, RecordSet};
use crate::store::{fetch_with_timeout, AppointmentStore, FetchError, FetchFilters, FetchOutcome, Scope};

/// Identifies one fetch. Only the most recently issued ticket may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Records owned by one screen. Nothing here is shared across views.
#[derive(Debug, Default)]
pub struct AppointmentView {
    issued: u64,
    applied: Option<FetchTicket>,
    outcome: Option<FetchOutcome<RecordSet>>,
}

impl AppointmentView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Applies a fetch result. Returns `false` and drops the result when a
    /// newer fetch has been issued since `ticket`.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<RawAppointment>, FetchError>,
    ) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, latest = self.issued, "discarding stale appointment fetch");
            return false;
        }
        self.outcome = Some(FetchOutcome::from_rows(result).map(validate_rows));
        self.applied = Some(ticket);
        true
    }

    pub fn applied_ticket(&self) -> Option<FetchTicket> {
        self.applied
    }

    /// `None` until the first fetch lands.
    pub fn outcome(&self) -> Option<&FetchOutcome<RecordSet>> {
        self.outcome.as_ref()
    }

    fn records(&self) -> &[super::record::AppointmentRecord] {
        match &self.outcome {
            Some(FetchOutcome::Loaded(set)) => &set.records,
            _ => &[],
        }
    }

    pub fn patient_buckets(&self, criteria: &FilterCriteria, today: NaiveDate, order: BucketOrder) -> PatientBuckets<'_> {
        bucket_for_patient(filter(self.records(), criteria), today, order)
    }

    pub fn clinic_buckets(&self, criteria: &FilterCriteria, today: NaiveDate, order: BucketOrder) -> ClinicBuckets<'_> {
        bucket_for_clinic(filter(self.records(), criteria), today, order)
    }

    pub fn summary(&self, criteria: &FilterCriteria, today: NaiveDate, window_days: i64) -> AppointmentSummary {
        aggregate(filter(self.records(), criteria), today, window_days)
    }
}

/// Runs one fetch cycle for a view. The lock is released while the store is
/// queried, so a later refresh can overtake this one; whichever was issued
/// last wins. Returns whether this call's result was applied.
pub async fn refresh(
    view: &Mutex<AppointmentView>,
    store: &dyn AppointmentStore,
    scope: Scope,
    filters: &FetchFilters,
    timeout: Duration,
) -> bool {
    let ticket = view.lock().await.begin_fetch();
    let result = fetch_with_timeout(store, scope, filters, timeout).await;
    view.lock().await.complete_fetch(ticket, result)
}
