use chrono::{Duration, NaiveDate, NaiveTime};
use igabaycare_appointments::appointments::{
    aggregate, bucket_for_clinic, filter, AppointmentRecord, AppointmentStatus, BucketOrder,
    ClinicSummary, FilterCriteria, DEFAULT_RECENT_WINDOW_DAYS,
};
use std::collections::HashSet;
use uuid::Uuid;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn rec(offset_days: i64, hour: u32, status: AppointmentStatus) -> AppointmentRecord {
    AppointmentRecord {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        clinic_id: Uuid::new_v4(),
        doctor_id: None,
        appointment_date: today() + Duration::days(offset_days),
        appointment_time: NaiveTime::from_hms_opt(hour, 15, 0).unwrap(),
        status,
        priority: Default::default(),
        appointment_type: Default::default(),
        doctor_name: Some("Dr. Reyes".into()),
        doctor_specialty: Some("General Practice".into()),
        patient_name: Some("Juan Dela Cruz".into()),
        clinic: ClinicSummary {
            name: "Quezon City General".into(),
            city: Some("Quezon City".into()),
            state: Some("Metro Manila".into()),
        },
        patient_notes: None,
        diagnosis: None,
    }
}

/// Every status on every day in a two-week window around today.
fn mixed_list() -> Vec<AppointmentRecord> {
    let mut out = Vec::new();
    for offset in -7..=7 {
        for (i, status) in AppointmentStatus::ALL.into_iter().enumerate() {
            out.push(rec(offset, 8 + i as u32, status));
        }
    }
    out
}

#[test]
fn empty_criteria_returns_input_unchanged() {
    let list = mixed_list();
    let out = filter(&list, &FilterCriteria::default());
    let ids: Vec<Uuid> = out.iter().map(|r| r.id).collect();
    let expected: Vec<Uuid> = list.iter().map(|r| r.id).collect();
    assert_eq!(ids, expected);
}

#[test]
fn status_filter_returns_only_that_status() {
    let list = mixed_list();
    for status in AppointmentStatus::ALL {
        let c = FilterCriteria {
            status: Some(status),
            ..Default::default()
        };
        let out = filter(&list, &c);
        assert!(out.len() <= list.len());
        assert!(!out.is_empty());
        assert!(out.iter().all(|r| r.status == status));
    }
}

#[test]
fn clinic_buckets_partition_the_list() {
    let list = mixed_list();
    let b = bucket_for_clinic(&list, today(), BucketOrder::default());
    assert_eq!(b.today.len() + b.upcoming.len() + b.past.len(), list.len());

    let mut seen = HashSet::new();
    for r in b.today.iter().chain(&b.upcoming).chain(&b.past) {
        assert!(seen.insert(r.id), "record {} in two buckets", r.id);
    }
}

#[test]
fn cancelled_today_is_never_in_today_bucket() {
    let list = vec![rec(0, 9, AppointmentStatus::Cancelled)];
    let b = bucket_for_clinic(&list, today(), BucketOrder::default());
    assert!(b.today.is_empty());
    assert_eq!(b.past.len(), 1);
}

#[test]
fn aggregate_totals_match_list_length() {
    let list = mixed_list();
    let s = aggregate(&list, today(), DEFAULT_RECENT_WINDOW_DAYS);
    assert_eq!(s.total, list.len());
    assert_eq!(s.by_status.values().sum::<usize>(), list.len());
}

#[test]
fn recent_count_boundary_is_thirty_days() {
    let list = vec![
        rec(-30, 9, AppointmentStatus::Completed),
        rec(-31, 9, AppointmentStatus::Completed),
    ];
    let s = aggregate(&list, today(), DEFAULT_RECENT_WINDOW_DAYS);
    assert_eq!(s.recent_count, 1);
}

#[test]
fn clinic_three_record_scenario() {
    let list = vec![
        rec(0, 9, AppointmentStatus::Confirmed),
        rec(1, 9, AppointmentStatus::Scheduled),
        rec(-1, 9, AppointmentStatus::Completed),
    ];
    let b = bucket_for_clinic(&list, today(), BucketOrder::default());
    assert_eq!(b.today.len(), 1);
    assert_eq!(b.today[0].id, list[0].id);
    assert_eq!(b.upcoming.len(), 1);
    assert_eq!(b.upcoming[0].id, list[1].id);
    assert_eq!(b.past.len(), 1);
    assert_eq!(b.past[0].id, list[2].id);
}

#[test]
fn free_text_search_is_case_insensitive() {
    let mut list = vec![
        rec(2, 9, AppointmentStatus::Scheduled),
        rec(3, 9, AppointmentStatus::Scheduled),
        rec(4, 9, AppointmentStatus::Scheduled),
    ];
    list[1].doctor_specialty = Some("Cardiology".into());

    let c = FilterCriteria::from_query(None, None, None, Some("cardio")).unwrap();
    let out = filter(&list, &c);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].id, list[1].id);
}
