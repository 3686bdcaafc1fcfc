// src/appointments/aggregate.rs

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::record::{AppointmentRecord, AppointmentStatus};

pub const DEFAULT_RECENT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentSummary {
    pub total: usize,
    /// Every status is present, zero when nothing matched.
    pub by_status: BTreeMap<AppointmentStatus, usize>,
    pub recent_count: usize,
}

/// Counts in a single pass. `recent_count` covers
/// `[today - window_days, today + 1)`; a negative window counts today only
/// and a window reaching past the calendar's start is clamped to it.
pub fn aggregate<'a, I>(records: I, today: NaiveDate, window_days: i64) -> AppointmentSummary
where
    I: IntoIterator<Item = &'a AppointmentRecord>,
{
    let mut by_status: BTreeMap<AppointmentStatus, usize> =
        AppointmentStatus::ALL.into_iter().map(|s| (s, 0)).collect();

    let back = Days::new(u64::try_from(window_days).unwrap_or(0));
    let window_start = today.checked_sub_days(back).unwrap_or(NaiveDate::MIN);
    let mut total = 0;
    let mut recent_count = 0;

    for rec in records {
        total += 1;
        *by_status.entry(rec.status).or_insert(0) += 1;
        if rec.appointment_date >= window_start && rec.appointment_date <= today {
            recent_count += 1;
        }
    }

    AppointmentSummary {
        total,
        by_status,
        recent_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointments::record::ClinicSummary;
    use chrono::{Duration, NaiveTime};
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn rec(offset_days: i64, status: AppointmentStatus) -> AppointmentRecord {
        AppointmentRecord {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            clinic_id: Uuid::new_v4(),
            doctor_id: None,
            appointment_date: today() + Duration::days(offset_days),
            appointment_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            status,
            priority: Default::default(),
            appointment_type: Default::default(),
            doctor_name: None,
            doctor_specialty: None,
            patient_name: None,
            clinic: ClinicSummary::default(),
            patient_notes: None,
            diagnosis: None,
        }
    }

    #[test]
    fn empty_list_is_zero_filled() {
        let s = aggregate(&Vec::<AppointmentRecord>::new(), today(), DEFAULT_RECENT_WINDOW_DAYS);
        assert_eq!(s.total, 0);
        assert_eq!(s.by_status.len(), AppointmentStatus::ALL.len());
        assert!(s.by_status.values().all(|&n| n == 0));
    }

    #[test]
    fn counts_sum_to_total() {
        let list = vec![
            rec(0, AppointmentStatus::Confirmed),
            rec(1, AppointmentStatus::Confirmed),
            rec(-2, AppointmentStatus::Completed),
            rec(-40, AppointmentStatus::NoShow),
        ];
        let s = aggregate(&list, today(), DEFAULT_RECENT_WINDOW_DAYS);
        assert_eq!(s.total, 4);
        assert_eq!(s.by_status[&AppointmentStatus::Confirmed], 2);
        assert_eq!(s.by_status[&AppointmentStatus::Cancelled], 0);
        assert_eq!(s.by_status.values().sum::<usize>(), list.len());
    }

    #[test]
    fn recent_window_boundaries() {
        let list = vec![
            rec(-30, AppointmentStatus::Completed),
            rec(-31, AppointmentStatus::Completed),
            rec(0, AppointmentStatus::Scheduled),
            rec(1, AppointmentStatus::Scheduled),
        ];
        let s = aggregate(&list, today(), DEFAULT_RECENT_WINDOW_DAYS);
        // -30 and today are in; -31 and tomorrow are out
        assert_eq!(s.recent_count, 2);
    }

    #[test]
    fn huge_window_clamps_instead_of_overflowing() {
        let list = vec![rec(-40_000, AppointmentStatus::Completed), rec(1, AppointmentStatus::Scheduled)];
        let s = aggregate(&list, today(), 200_000_000);
        assert_eq!(s.total, 2);
        assert_eq!(s.recent_count, 1);

        let s = aggregate(&list, today(), i64::MAX);
        assert_eq!(s.recent_count, 1);
    }

    #[test]
    fn negative_window_counts_today_only() {
        let list = vec![rec(0, AppointmentStatus::Confirmed), rec(-1, AppointmentStatus::Completed)];
        let s = aggregate(&list, today(), -5);
        assert_eq!(s.recent_count, 1);
    }

    #[test]
    fn by_status_serializes_with_wire_names() {
        let list = vec![rec(0, AppointmentStatus::InProgress)];
        let json = serde_json::to_value(aggregate(&list, today(), 30)).unwrap();
        assert_eq!(json["by_status"]["in_progress"], 1);
        assert_eq!(json["by_status"]["no_show"], 0);
    }
}
