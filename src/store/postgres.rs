// src/store/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{AppointmentStore, FetchError, FetchFilters};
use crate::appointments::{AppointmentStatus, RawAppointment};

/*
   One SELECT shared by every listing. Joins copy the clinic/doctor/patient
   display fields onto the row; a missing join leaves the field NULL.
*/
const SELECT_APPOINTMENTS: &str = r#"
    SELECT
      a.id,
      a.patient_id,
      a.clinic_id,
      a.doctor_id,
      a.appointment_date,
      a.appointment_time,
      a.status,
      a.priority,
      a.appointment_type,

      d.full_name      AS doctor_name,
      d.specialization AS doctor_specialty,

      NULLIF(TRIM(CONCAT_WS(' ', p.first_name, p.last_name)), '') AS patient_name,

      c.clinic_name,
      c.city  AS clinic_city,
      c.state AS clinic_state,

      a.patient_notes,
      a.diagnosis

    FROM appointments a
    LEFT JOIN clinics  c ON c.id = a.clinic_id
    LEFT JOIN patients p ON p.id = a.patient_id
    LEFT JOIN doctors  d ON d.id = a.doctor_id
"#;

const PUSHED_DOWN_FILTERS: &str = r#"
      AND ($2::text IS NULL OR a.status = $2)
      AND ($3::date IS NULL OR a.appointment_date >= $3)
      AND ($4::date IS NULL OR a.appointment_date <= $4)
    ORDER BY a.appointment_date ASC, a.appointment_time ASC
"#;

#[derive(Clone)]
pub struct PgAppointmentStore {
    pool: PgPool,
}

impl PgAppointmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_by(
        &self,
        owner_column: &'static str,
        owner_id: Uuid,
        filters: &FetchFilters,
    ) -> Result<Vec<RawAppointment>, FetchError> {
        let sql = format!("{SELECT_APPOINTMENTS} WHERE a.{owner_column} = $1 {PUSHED_DOWN_FILTERS}");

        let rows = sqlx::query_as::<_, RawAppointment>(&sql)
            .bind(owner_id)
            .bind(filters.status.map(|s| s.as_str()))
            .bind(filters.date_from)
            .bind(filters.date_to)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn fetch_by_patient(
        &self,
        patient_id: Uuid,
        filters: &FetchFilters,
    ) -> Result<Vec<RawAppointment>, FetchError> {
        self.list_by("patient_id", patient_id, filters).await
    }

    async fn fetch_by_clinic(
        &self,
        clinic_id: Uuid,
        filters: &FetchFilters,
    ) -> Result<Vec<RawAppointment>, FetchError> {
        self.list_by("clinic_id", clinic_id, filters).await
    }

    async fn fetch_by_doctor(
        &self,
        doctor_id: Uuid,
        filters: &FetchFilters,
    ) -> Result<Vec<RawAppointment>, FetchError> {
        self.list_by("doctor_id", doctor_id, filters).await
    }

    async fn fetch_one(&self, appointment_id: Uuid) -> Result<Option<RawAppointment>, FetchError> {
        let sql = format!("{SELECT_APPOINTMENTS} WHERE a.id = $1");

        let row = sqlx::query_as::<_, RawAppointment>(&sql)
            .bind(appointment_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn update_status(
        &self,
        appointment_id: Uuid,
        expected: AppointmentStatus,
        next: AppointmentStatus,
    ) -> Result<Option<RawAppointment>, FetchError> {
        let updated: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE appointments
            SET status = $3,
                updated_at = now()
            WHERE id = $1
              AND status = $2
            RETURNING id
            "#,
        )
        .bind(appointment_id)
        .bind(expected.as_str())
        .bind(next.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(id) => self.fetch_one(id).await,
            None => Ok(None),
        }
    }
}
