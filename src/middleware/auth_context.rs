use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use uuid::Uuid;

use crate::auth::hash_access_token;
use crate::error::ApiError;
use crate::models::{AppState, Role};
use crate::store::Scope;

/// Authenticated caller plus the profile row their role is bound to.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
    pub session_token_id: Uuid,
    pub patient_id: Option<Uuid>,
    pub clinic_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
}

#[derive(Debug, sqlx::FromRow)]
struct SessionLookupRow {
    session_token_id: Uuid,
    user_id: Uuid,
    role: i16,
    patient_id: Option<Uuid>,
    clinic_id: Option<Uuid>,
    doctor_id: Option<Uuid>,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this caller may list appointments for `scope`.
    pub fn can_view(&self, scope: Scope) -> bool {
        if self.is_admin() {
            return true;
        }
        match (self.role, scope) {
            (Role::Patient, Scope::Patient(id)) => self.patient_id == Some(id),
            (Role::Clinic, Scope::Clinic(id)) => self.clinic_id == Some(id),
            (Role::Doctor, Scope::Doctor(id)) => self.doctor_id == Some(id),
            _ => false,
        }
    }

    pub fn ensure_view(&self, scope: Scope) -> Result<(), ApiError> {
        if self.can_view(scope) {
            Ok(())
        } else {
            Err(ApiError::forbidden("You do not have permission to view these appointments"))
        }
    }
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            // Authorization: Bearer <token>
            let TypedHeader(authz): TypedHeader<Authorization<Bearer>> =
                TypedHeader::from_request_parts(parts, state)
                    .await
                    .map_err(|_| ApiError::session_expired())?;

            let token_hash = hash_access_token(authz.token());

            // live session + active user + the profile row for the user's role
            let row: SessionLookupRow = sqlx::query_as::<_, SessionLookupRow>(
                r#"
                SELECT
                  st.session_token_id,
                  st.user_id,
                  u.role,
                  p.id AS patient_id,
                  c.id AS clinic_id,
                  d.id AS doctor_id
                FROM session_token st
                JOIN app_user u ON u.user_id = st.user_id
                LEFT JOIN patients p ON p.user_id = u.user_id
                LEFT JOIN clinics  c ON c.user_id = u.user_id
                LEFT JOIN doctors  d ON d.user_id = u.user_id
                WHERE st.session_token_hash = $1
                  AND st.revoked_at IS NULL
                  AND st.expires_at > now()
                  AND u.is_active = true
                "#,
            )
            .bind(&token_hash)
            .fetch_optional(&state.db)
            .await
            .map_err(|e| ApiError::Internal(format!("db error: {e}")))?
            .ok_or_else(ApiError::session_expired)?;

            // best-effort
            let _ = sqlx::query(
                r#"
                UPDATE session_token
                SET last_seen_at = now()
                WHERE session_token_id = $1
                "#,
            )
            .bind(row.session_token_id)
            .execute(&state.db)
            .await;

            let role = Role::try_from(row.role).map_err(|v| {
                tracing::warn!(user_id = %row.user_id, role = v, "session for user with unknown role");
                ApiError::forbidden("Unknown account role")
            })?;

            Ok(AuthContext {
                user_id: row.user_id,
                role,
                session_token_id: row.session_token_id,
                patient_id: row.patient_id,
                clinic_id: row.clinic_id,
                doctor_id: row.doctor_id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: Role) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            role,
            session_token_id: Uuid::new_v4(),
            patient_id: None,
            clinic_id: None,
            doctor_id: None,
        }
    }

    #[test]
    fn patient_sees_only_own_appointments() {
        let me = Uuid::new_v4();
        let auth = AuthContext {
            patient_id: Some(me),
            ..ctx(Role::Patient)
        };
        assert!(auth.can_view(Scope::Patient(me)));
        assert!(!auth.can_view(Scope::Patient(Uuid::new_v4())));
        assert!(!auth.can_view(Scope::Clinic(me)));
    }

    #[test]
    fn clinic_and_doctor_are_scoped_to_their_profile() {
        let clinic = Uuid::new_v4();
        let auth = AuthContext {
            clinic_id: Some(clinic),
            ..ctx(Role::Clinic)
        };
        assert!(auth.can_view(Scope::Clinic(clinic)));
        assert!(!auth.can_view(Scope::Doctor(clinic)));

        let doc = Uuid::new_v4();
        let auth = AuthContext {
            doctor_id: Some(doc),
            ..ctx(Role::Doctor)
        };
        assert!(auth.can_view(Scope::Doctor(doc)));
        assert!(auth.ensure_view(Scope::Doctor(Uuid::new_v4())).is_err());
    }

    #[test]
    fn admin_sees_everything() {
        let auth = ctx(Role::Admin);
        assert!(auth.can_view(Scope::Clinic(Uuid::new_v4())));
        assert!(auth.can_view(Scope::Patient(Uuid::new_v4())));
    }

    #[test]
    fn role_without_profile_sees_nothing() {
        let auth = ctx(Role::Patient);
        assert!(!auth.can_view(Scope::Patient(Uuid::new_v4())));
    }
}
