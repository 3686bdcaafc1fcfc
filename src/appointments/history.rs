// src/appointments/history.rs

use std::collections::BTreeMap;

use serde::Serialize;

use super::record::AppointmentRecord;

#[derive(Debug, Serialize)]
pub struct MonthGroup<'a> {
    /// `YYYY-MM`
    pub month: String,
    pub appointments: Vec<&'a AppointmentRecord>,
}

/// Groups visits by calendar month, most recent month first and most recent
/// visit first within a month.
pub fn group_by_month<'a, I>(records: I) -> Vec<MonthGroup<'a>>
where
    I: IntoIterator<Item = &'a AppointmentRecord>,
{
    let mut months: BTreeMap<String, Vec<&'a AppointmentRecord>> = BTreeMap::new();
    for rec in records {
        months
            .entry(rec.appointment_date.format("%Y-%m").to_string())
            .or_default()
            .push(rec);
    }

    months
        .into_iter()
        .rev()
        .map(|(month, mut appointments)| {
            appointments.sort_by(|a, b| b.when().cmp(&a.when()));
            MonthGroup { month, appointments }
        })
        .collect()
}
