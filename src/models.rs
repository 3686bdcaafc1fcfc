use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::appointments::BucketOrder;
use crate::clock::Clock;
use crate::store::AppointmentStore;

#[derive(Clone)]
pub struct AppState {
    /// Session lookups only; appointment reads go through `appointments`.
    pub db: sqlx::PgPool,
    pub appointments: Arc<dyn AppointmentStore>,
    pub clock: Clock,
    pub bucket_order: BucketOrder,
    pub recent_window_days: i64,
    pub fetch_timeout: Duration,
}

/* -------------------------
   API envelopes
--------------------------*/

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct OkData {
    pub ok: bool,
}

/* -------------------------
   Roles
--------------------------*/

/// Stored as smallint in `app_user.role`:
/// 0 patient, 1 admin, 2 clinic, 3 doctor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Admin,
    Clinic,
    Doctor,
}

impl TryFrom<i16> for Role {
    type Error = i16;

    fn try_from(v: i16) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Role::Patient),
            1 => Ok(Role::Admin),
            2 => Ok(Role::Clinic),
            3 => Ok(Role::Doctor),
            other => Err(other),
        }
    }
}
