// src/routes/appointment_routes.rs

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    appointments::{
        aggregate, bucket_for_clinic, bucket_for_patient, filter, group_by_month, label_table,
        validate_rows, AppointmentRecord, AppointmentStatus, AppointmentSummary, FilterCriteria,
        LabelTable, RecordSet,
    },
    error::ApiError,
    middleware::auth_context::AuthContext,
    models::{ApiOk, AppState, Role},
    store::{fetch_with_timeout, with_deadline, FetchFilters, FetchOutcome, OutcomeState, Scope},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/patients/{patient_id}/appointments", get(list_patient_appointments))
        .route("/patients/{patient_id}/history", get(get_patient_history))
        .route("/clinics/{clinic_id}/appointments", get(list_clinic_appointments))
        .route("/doctors/{doctor_id}/appointments", get(list_doctor_appointments))
        .route("/appointments/labels", get(get_labels))
        .route("/appointments/{appointment_id}/status", post(change_status))
}

/* ============================================================
   Query params
   ============================================================ */

/// Raw list filters. Blank values and `status=all` impose no constraint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    fn criteria(&self) -> Result<FilterCriteria, ApiError> {
        Ok(FilterCriteria::from_query(
            self.status.as_deref(),
            self.date_from.as_deref(),
            self.date_to.as_deref(),
            self.search.as_deref(),
        )?)
    }
}

/* ============================================================
   Response DTOs
   ============================================================ */

#[derive(Debug, Serialize)]
pub struct PatientAppointmentsDto {
    pub state: OutcomeState,
    pub today: NaiveDate,
    pub upcoming: Vec<AppointmentRecord>,
    pub past: Vec<AppointmentRecord>,
    pub summary: AppointmentSummary,
    /// Rows dropped because they were malformed.
    pub skipped: usize,
}

#[derive(Debug, Serialize)]
pub struct ScheduleAppointmentsDto {
    pub state: OutcomeState,
    pub today_date: NaiveDate,
    pub today: Vec<AppointmentRecord>,
    pub upcoming: Vec<AppointmentRecord>,
    pub past: Vec<AppointmentRecord>,
    pub summary: AppointmentSummary,
    pub skipped: usize,
}

#[derive(Debug, Serialize)]
pub struct HistoryMonthDto {
    pub month: String,
    pub appointments: Vec<AppointmentRecord>,
}

#[derive(Debug, Serialize)]
pub struct PatientHistoryDto {
    pub state: OutcomeState,
    pub today: NaiveDate,
    pub months: Vec<HistoryMonthDto>,
    pub summary: AppointmentSummary,
    pub skipped: usize,
}

fn owned(list: Vec<&AppointmentRecord>) -> Vec<AppointmentRecord> {
    list.into_iter().cloned().collect()
}

/* ============================================================
   Fetch → validate
   ============================================================ */

/// A failed fetch becomes an error response; it is never turned into an
/// empty list.
async fn load(state: &AppState, scope: Scope, criteria: &FilterCriteria) -> Result<(OutcomeState, RecordSet), ApiError> {
    let result = fetch_with_timeout(
        state.appointments.as_ref(),
        scope,
        &FetchFilters::from(criteria),
        state.fetch_timeout,
    )
    .await;

    match FetchOutcome::from_rows(result) {
        FetchOutcome::Failed(e) => Err(e.into()),
        FetchOutcome::Empty => Ok((OutcomeState::Empty, RecordSet::default())),
        FetchOutcome::Loaded(rows) => Ok((OutcomeState::Loaded, validate_rows(rows))),
    }
}

/* ============================================================
   GET /patients/{id}/appointments
   ============================================================ */

pub async fn list_patient_appointments(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(patient_id): Path<Uuid>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ApiOk<PatientAppointmentsDto>>, ApiError> {
    let scope = Scope::Patient(patient_id);
    auth.ensure_view(scope)?;
    let criteria = q.criteria()?;

    let (outcome, set) = load(&state, scope, &criteria).await?;
    let today = state.clock.today();
    let matched = filter(&set.records, &criteria);
    let summary = aggregate(matched.iter().copied(), today, state.recent_window_days);
    let buckets = bucket_for_patient(matched, today, state.bucket_order);

    Ok(Json(ApiOk {
        data: PatientAppointmentsDto {
            state: outcome,
            today,
            upcoming: owned(buckets.upcoming),
            past: owned(buckets.past),
            summary,
            skipped: set.skipped.len(),
        },
    }))
}

/* ============================================================
   GET /patients/{id}/history
   ============================================================ */

pub async fn get_patient_history(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(patient_id): Path<Uuid>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ApiOk<PatientHistoryDto>>, ApiError> {
    let scope = Scope::Patient(patient_id);
    auth.ensure_view(scope)?;
    let criteria = q.criteria()?;

    let (outcome, set) = load(&state, scope, &criteria).await?;
    let today = state.clock.today();
    let matched = filter(&set.records, &criteria);
    let summary = aggregate(matched.iter().copied(), today, state.recent_window_days);
    let past = bucket_for_patient(matched, today, state.bucket_order).past;

    let months = group_by_month(past)
        .into_iter()
        .map(|g| HistoryMonthDto {
            month: g.month,
            appointments: owned(g.appointments),
        })
        .collect();

    Ok(Json(ApiOk {
        data: PatientHistoryDto {
            state: outcome,
            today,
            months,
            summary,
            skipped: set.skipped.len(),
        },
    }))
}

/* ============================================================
   GET /clinics/{id}/appointments, GET /doctors/{id}/appointments
   ============================================================ */

async fn schedule_view(state: &AppState, auth: &AuthContext, scope: Scope, q: &ListQuery) -> Result<ScheduleAppointmentsDto, ApiError> {
    auth.ensure_view(scope)?;
    let criteria = q.criteria()?;

    let (outcome, set) = load(state, scope, &criteria).await?;
    let today = state.clock.today();
    let matched = filter(&set.records, &criteria);
    let summary = aggregate(matched.iter().copied(), today, state.recent_window_days);
    let buckets = bucket_for_clinic(matched, today, state.bucket_order);

    Ok(ScheduleAppointmentsDto {
        state: outcome,
        today_date: today,
        today: owned(buckets.today),
        upcoming: owned(buckets.upcoming),
        past: owned(buckets.past),
        summary,
        skipped: set.skipped.len(),
    })
}

pub async fn list_clinic_appointments(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(clinic_id): Path<Uuid>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ApiOk<ScheduleAppointmentsDto>>, ApiError> {
    let data = schedule_view(&state, &auth, Scope::Clinic(clinic_id), &q).await?;
    Ok(Json(ApiOk { data }))
}

pub async fn list_doctor_appointments(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(doctor_id): Path<Uuid>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ApiOk<ScheduleAppointmentsDto>>, ApiError> {
    let data = schedule_view(&state, &auth, Scope::Doctor(doctor_id), &q).await?;
    Ok(Json(ApiOk { data }))
}

/* ============================================================
   GET /appointments/labels
   ============================================================ */

pub async fn get_labels(_auth: AuthContext) -> Json<ApiOk<LabelTable>> {
    Json(ApiOk { data: label_table() })
}

/* ============================================================
   POST /appointments/{id}/status
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: AppointmentStatus,
}

/*
   admin   any transition
   clinic  own clinic's appointments
   doctor  own appointments; in_progress, completed, no_show
   patient own appointments; cancelled
*/
fn ensure_status_change(auth: &AuthContext, rec: &AppointmentRecord, next: AppointmentStatus) -> Result<(), ApiError> {
    let allowed = match auth.role {
        Role::Admin => true,
        Role::Clinic => auth.clinic_id == Some(rec.clinic_id),
        Role::Doctor => {
            rec.doctor_id.is_some()
                && auth.doctor_id == rec.doctor_id
                && matches!(
                    next,
                    AppointmentStatus::InProgress | AppointmentStatus::Completed | AppointmentStatus::NoShow
                )
        }
        Role::Patient => auth.patient_id == Some(rec.patient_id) && next == AppointmentStatus::Cancelled,
    };

    if allowed {
        Ok(())
    } else {
        Err(ApiError::forbidden("You do not have permission to change this appointment"))
    }
}

pub async fn change_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(appointment_id): Path<Uuid>,
    Json(req): Json<StatusChangeRequest>,
) -> Result<Json<ApiOk<AppointmentRecord>>, ApiError> {
    let raw = with_deadline(state.fetch_timeout, state.appointments.fetch_one(appointment_id))
        .await?
        .ok_or_else(|| ApiError::NotFound("NOT_FOUND", "appointment not found".into()))?;

    let current = AppointmentRecord::try_from(raw)
        .map_err(|e| ApiError::Conflict("MALFORMED_APPOINTMENT", e.to_string()))?;

    ensure_status_change(&auth, &current, req.status)?;

    if !current.status.can_transition_to(req.status) {
        return Err(ApiError::Conflict(
            "INVALID_TRANSITION",
            format!("cannot move appointment from {} to {}", current.status, req.status),
        ));
    }

    let updated = with_deadline(
        state.fetch_timeout,
        state
            .appointments
            .update_status(appointment_id, current.status, req.status),
    )
    .await?
    .ok_or_else(|| {
            ApiError::Conflict(
                "STATUS_CHANGED",
                "appointment changed since it was loaded; reload and retry".into(),
            )
        })?;

    let record = AppointmentRecord::try_from(updated)
        .map_err(|e| ApiError::Internal(format!("updated row invalid: {e}")))?;

    tracing::info!(
        %appointment_id,
        from = %current.status,
        to = %record.status,
        user_id = %auth.user_id,
        "appointment status changed"
    );

    Ok(Json(ApiOk { data: record }))
}
