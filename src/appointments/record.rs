// src/appointments/record.rs

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/* ============================================================
   Enumerations
   ============================================================ */

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
    /// Only produced by the mobile booking flow.
    Rescheduled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 7] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
        AppointmentStatus::Rescheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
            AppointmentStatus::Rescheduled => "rescheduled",
        }
    }

    /// No further transition is expected once an appointment reaches one of these.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }

    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    pub fn allowed_transitions(&self) -> &'static [AppointmentStatus] {
        use AppointmentStatus::*;
        match self {
            Scheduled => &[Confirmed, Cancelled, NoShow, Rescheduled],
            Confirmed => &[InProgress, Cancelled, NoShow, Rescheduled],
            Rescheduled => &[Confirmed, Cancelled, NoShow],
            InProgress => &[Completed, Cancelled],
            Completed | Cancelled | NoShow => &[],
        }
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Display-only; drives badge color, never behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Normal, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    #[default]
    General,
    Consultation,
    FollowUp,
    Specialist,
    Procedure,
    Checkup,
    Emergency,
    Vaccination,
    Laboratory,
    Therapy,
}

impl AppointmentType {
    pub const ALL: [AppointmentType; 10] = [
        AppointmentType::General,
        AppointmentType::Consultation,
        AppointmentType::FollowUp,
        AppointmentType::Specialist,
        AppointmentType::Procedure,
        AppointmentType::Checkup,
        AppointmentType::Emergency,
        AppointmentType::Vaccination,
        AppointmentType::Laboratory,
        AppointmentType::Therapy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentType::General => "general",
            AppointmentType::Consultation => "consultation",
            AppointmentType::FollowUp => "follow_up",
            AppointmentType::Specialist => "specialist",
            AppointmentType::Procedure => "procedure",
            AppointmentType::Checkup => "checkup",
            AppointmentType::Emergency => "emergency",
            AppointmentType::Vaccination => "vaccination",
            AppointmentType::Laboratory => "laboratory",
            AppointmentType::Therapy => "therapy",
        }
    }
}

impl FromStr for AppointmentType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentType::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value `{0}`")]
pub struct UnknownVariant(pub String);

/* ============================================================
   Records
   ============================================================ */

/// Clinic display fields copied onto the appointment at fetch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClinicSummary {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// A validated appointment. Construct it from a [`RawAppointment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub clinic_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: AppointmentStatus,
    pub priority: Priority,
    pub appointment_type: AppointmentType,
    pub doctor_name: Option<String>,
    pub doctor_specialty: Option<String>,
    pub patient_name: Option<String>,
    pub clinic: ClinicSummary,
    pub patient_notes: Option<String>,
    pub diagnosis: Option<String>,
}

impl AppointmentRecord {
    /// Sort key shared by every bucket ordering.
    pub fn when(&self) -> (NaiveDate, NaiveTime) {
        (self.appointment_date, self.appointment_time)
    }

    /// Denormalized display fields searched by free text.
    pub fn search_fields(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.clinic.name.as_str()),
            self.doctor_name.as_deref(),
            self.doctor_specialty.as_deref(),
            self.patient_name.as_deref(),
            self.patient_notes.as_deref(),
            self.diagnosis.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Row as returned by a store, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct RawAppointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub clinic_id: Uuid,
    pub doctor_id: Option<Uuid>,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<NaiveTime>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub appointment_type: Option<String>,
    pub doctor_name: Option<String>,
    pub doctor_specialty: Option<String>,
    pub patient_name: Option<String>,
    pub clinic_name: Option<String>,
    pub clinic_city: Option<String>,
    pub clinic_state: Option<String>,
    pub patient_notes: Option<String>,
    pub diagnosis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("appointment {id}: missing {field}")]
    MissingField { id: Uuid, field: &'static str },
    #[error("appointment {id}: {field} has unknown value `{value}`")]
    UnknownValue {
        id: Uuid,
        field: &'static str,
        value: String,
    },
}

impl RecordError {
    pub fn id(&self) -> Uuid {
        match self {
            RecordError::MissingField { id, .. } | RecordError::UnknownValue { id, .. } => *id,
        }
    }
}

fn parse_field<T: FromStr<Err = UnknownVariant>>(
    id: Uuid,
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<T>, RecordError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(v) => v.parse::<T>().map(Some).map_err(|UnknownVariant(value)| RecordError::UnknownValue {
            id,
            field,
            value,
        }),
    }
}

impl TryFrom<RawAppointment> for AppointmentRecord {
    type Error = RecordError;

    fn try_from(raw: RawAppointment) -> Result<Self, Self::Error> {
        let id = raw.id;
        let missing = |field| RecordError::MissingField { id, field };

        let appointment_date = raw.appointment_date.ok_or_else(|| missing("appointment_date"))?;
        let appointment_time = raw.appointment_time.ok_or_else(|| missing("appointment_time"))?;
        let status = parse_field::<AppointmentStatus>(id, "status", raw.status.as_deref())?
            .ok_or_else(|| missing("status"))?;
        let priority = parse_field::<Priority>(id, "priority", raw.priority.as_deref())?.unwrap_or_default();
        let appointment_type =
            parse_field::<AppointmentType>(id, "appointment_type", raw.appointment_type.as_deref())?
                .unwrap_or_default();

        Ok(AppointmentRecord {
            id,
            patient_id: raw.patient_id,
            clinic_id: raw.clinic_id,
            doctor_id: raw.doctor_id,
            appointment_date,
            appointment_time,
            status,
            priority,
            appointment_type,
            doctor_name: raw.doctor_name,
            doctor_specialty: raw.doctor_specialty,
            patient_name: raw.patient_name,
            clinic: ClinicSummary {
                name: raw.clinic_name.unwrap_or_default(),
                city: raw.clinic_city,
                state: raw.clinic_state,
            },
            patient_notes: raw.patient_notes,
            diagnosis: raw.diagnosis,
        })
    }
}

/// Validated records plus the ones that were dropped.
#[derive(Debug, Default)]
pub struct RecordSet {
    pub records: Vec<AppointmentRecord>,
    pub skipped: Vec<RecordError>,
}

/// Validates fetched rows. Malformed rows are logged and left out; one bad row
/// never aborts the list.
pub fn validate_rows(rows: Vec<RawAppointment>) -> RecordSet {
    let mut set = RecordSet {
        records: Vec::with_capacity(rows.len()),
        skipped: Vec::new(),
    };

    for row in rows {
        match AppointmentRecord::try_from(row) {
            Ok(rec) => set.records.push(rec),
            Err(err) => {
                tracing::warn!(appointment_id = %err.id(), reason = %err, "skipping malformed appointment");
                set.skipped.push(err);
            }
        }
    }

    set
}
