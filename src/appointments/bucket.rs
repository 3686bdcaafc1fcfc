// src/appointments/bucket.rs
//
// Partitions appointments against an injected "today". Nothing here reads the
// system clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::{AppointmentRecord, AppointmentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Display order inside each bucket. `today` uses the upcoming direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketOrder {
    pub upcoming: SortDirection,
    pub past: SortDirection,
}

impl Default for BucketOrder {
    fn default() -> Self {
        Self {
            upcoming: SortDirection::Ascending,
            past: SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatientBucket {
    Upcoming,
    Past,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicBucket {
    Today,
    Upcoming,
    Past,
}

/// Patient view rule: upcoming unless the date has passed or the visit was
/// cancelled/completed. A no-show dated today or later stays upcoming.
pub fn classify_for_patient(rec: &AppointmentRecord, today: NaiveDate) -> PatientBucket {
    let closed = matches!(rec.status, AppointmentStatus::Cancelled | AppointmentStatus::Completed);
    if rec.appointment_date >= today && !closed {
        PatientBucket::Upcoming
    } else {
        PatientBucket::Past
    }
}

/// Clinic view rule. The terminal-status check runs before any date check, so
/// a same-day cancelled appointment is `Past`, never `Today`.
pub fn classify_for_clinic(rec: &AppointmentRecord, today: NaiveDate) -> ClinicBucket {
    if rec.status.is_terminal() || rec.appointment_date < today {
        ClinicBucket::Past
    } else if rec.appointment_date == today {
        ClinicBucket::Today
    } else {
        ClinicBucket::Upcoming
    }
}

#[derive(Debug, Default, Serialize)]
pub struct PatientBuckets<'a> {
    pub upcoming: Vec<&'a AppointmentRecord>,
    pub past: Vec<&'a AppointmentRecord>,
}

#[derive(Debug, Default, Serialize)]
pub struct ClinicBuckets<'a> {
    pub today: Vec<&'a AppointmentRecord>,
    pub upcoming: Vec<&'a AppointmentRecord>,
    pub past: Vec<&'a AppointmentRecord>,
}

impl ClinicBuckets<'_> {
    pub fn len(&self) -> usize {
        self.today.len() + self.upcoming.len() + self.past.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PatientBuckets<'_> {
    pub fn len(&self) -> usize {
        self.upcoming.len() + self.past.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn bucket_for_patient<'a, I>(records: I, today: NaiveDate, order: BucketOrder) -> PatientBuckets<'a>
where
    I: IntoIterator<Item = &'a AppointmentRecord>,
{
    let mut out = PatientBuckets::default();
    for rec in records {
        match classify_for_patient(rec, today) {
            PatientBucket::Upcoming => out.upcoming.push(rec),
            PatientBucket::Past => out.past.push(rec),
        }
    }
    sort_by_when(&mut out.upcoming, order.upcoming);
    sort_by_when(&mut out.past, order.past);
    out
}

pub fn bucket_for_clinic<'a, I>(records: I, today: NaiveDate, order: BucketOrder) -> ClinicBuckets<'a>
where
    I: IntoIterator<Item = &'a AppointmentRecord>,
{
    let mut out = ClinicBuckets::default();
    for rec in records {
        match classify_for_clinic(rec, today) {
            ClinicBucket::Today => out.today.push(rec),
            ClinicBucket::Upcoming => out.upcoming.push(rec),
            ClinicBucket::Past => out.past.push(rec),
        }
    }
    sort_by_when(&mut out.today, order.upcoming);
    sort_by_when(&mut out.upcoming, order.upcoming);
    sort_by_when(&mut out.past, order.past);
    out
}

// stable: equal (date, time) keeps fetch order
fn sort_by_when(list: &mut [&AppointmentRecord], dir: SortDirection) {
    match dir {
        SortDirection::Ascending => list.sort_by_key(|r| r.when()),
        SortDirection::Descending => list.sort_by(|a, b| b.when().cmp(&a.when())),
    }
}
