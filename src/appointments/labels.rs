// src/appointments/labels.rs
//
// One label/color table for every presenter (web dashboards and the mobile
// shell read it from GET /api/v1/appointments/labels).

use serde::Serialize;

use super::record::{AppointmentStatus, AppointmentType, Priority};

impl AppointmentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::InProgress => "In Progress",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "No Show",
            AppointmentStatus::Rescheduled => "Rescheduled",
        }
    }

    pub fn badge_color(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "blue",
            AppointmentStatus::Confirmed => "green",
            AppointmentStatus::InProgress => "yellow",
            AppointmentStatus::Completed => "gray",
            AppointmentStatus::Cancelled => "red",
            AppointmentStatus::NoShow => "orange",
            AppointmentStatus::Rescheduled => "purple",
        }
    }
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Normal => "Normal",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn badge_color(&self) -> &'static str {
        match self {
            Priority::Low => "gray",
            Priority::Normal => "blue",
            Priority::Medium => "yellow",
            Priority::High => "red",
        }
    }
}

impl AppointmentType {
    pub fn label(&self) -> &'static str {
        match self {
            AppointmentType::General => "General Consultation",
            AppointmentType::Consultation => "Consultation",
            AppointmentType::FollowUp => "Follow-up",
            AppointmentType::Specialist => "Specialist Visit",
            AppointmentType::Procedure => "Procedure",
            AppointmentType::Checkup => "Check-up",
            AppointmentType::Emergency => "Emergency",
            AppointmentType::Vaccination => "Vaccination",
            AppointmentType::Laboratory => "Laboratory Test",
            AppointmentType::Therapy => "Therapy",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BadgeLabel {
    pub value: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PlainLabel {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LabelTable {
    pub statuses: Vec<BadgeLabel>,
    pub priorities: Vec<BadgeLabel>,
    pub appointment_types: Vec<PlainLabel>,
}

pub fn label_table() -> LabelTable {
    LabelTable {
        statuses: AppointmentStatus::ALL
            .iter()
            .map(|s| BadgeLabel {
                value: s.as_str(),
                label: s.label(),
                color: s.badge_color(),
            })
            .collect(),
        priorities: Priority::ALL
            .iter()
            .map(|p| BadgeLabel {
                value: p.as_str(),
                label: p.label(),
                color: p.badge_color(),
            })
            .collect(),
        appointment_types: AppointmentType::ALL
            .iter()
            .map(|t| PlainLabel {
                value: t.as_str(),
                label: t.label(),
            })
            .collect(),
    }
}
