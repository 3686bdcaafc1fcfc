// src/appointments/filter.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::{AppointmentRecord, AppointmentStatus, UnknownVariant};

/// Criteria are ANDed; `None` means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub status: Option<AppointmentStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriteriaError {
    #[error("status must be one of scheduled, confirmed, in_progress, completed, cancelled, no_show, rescheduled or all (got `{0}`)")]
    Status(String),
    #[error("{field} must be YYYY-MM-DD (got `{value}`)")]
    Date { field: &'static str, value: String },
}

impl FilterCriteria {
    /// Builds criteria from raw query-string values. `"all"` and blank values
    /// impose no constraint.
    pub fn from_query(
        status: Option<&str>,
        date_from: Option<&str>,
        date_to: Option<&str>,
        search_text: Option<&str>,
    ) -> Result<Self, CriteriaError> {
        let status = match non_blank(status) {
            None => None,
            Some(s) if s.eq_ignore_ascii_case("all") => None,
            Some(s) => Some(
                s.parse::<AppointmentStatus>()
                    .map_err(|UnknownVariant(v)| CriteriaError::Status(v))?,
            ),
        };

        Ok(FilterCriteria {
            status,
            date_from: parse_date("date_from", date_from)?,
            date_to: parse_date("date_to", date_to)?,
            search_text: non_blank(search_text).map(str::to_string),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && non_blank(self.search_text.as_deref()).is_none()
    }

    /// An inverted range is a user-input edge case: it matches nothing.
    pub fn has_inverted_range(&self) -> bool {
        matches!((self.date_from, self.date_to), (Some(from), Some(to)) if from > to)
    }

    pub fn matches(&self, rec: &AppointmentRecord) -> bool {
        if let Some(status) = self.status {
            if rec.status != status {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if rec.appointment_date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if rec.appointment_date > to {
                return false;
            }
        }
        match non_blank(self.search_text.as_deref()) {
            None => true,
            Some(q) => {
                let needle = q.to_lowercase();
                rec.search_fields()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>, CriteriaError> {
    match non_blank(raw) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| CriteriaError::Date {
                field,
                value: v.to_string(),
            }),
    }
}

/// Stable filter: returns the records that satisfy every criterion, in input order.
pub fn filter<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a AppointmentRecord>
where
    I: IntoIterator<Item = &'a AppointmentRecord>,
{
    if criteria.has_inverted_range() {
        return Vec::new();
    }
    records.into_iter().filter(|r| criteria.matches(r)).collect()
}
