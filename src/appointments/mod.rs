//! Appointment derivation: validate → filter → bucket → aggregate.
//!
//! Everything in this module is synchronous and pure. Callers pass "today"
//! explicitly; see [`crate::clock::Clock`] for how the HTTP layer derives it.

pub mod aggregate;
pub mod bucket;
pub mod filter;
pub mod history;
pub mod labels;
pub mod record;
pub mod view;

pub use aggregate::{aggregate, AppointmentSummary, DEFAULT_RECENT_WINDOW_DAYS};
pub use bucket::{
    bucket_for_clinic, bucket_for_patient, classify_for_clinic, classify_for_patient, BucketOrder,
    ClinicBucket, ClinicBuckets, PatientBucket, PatientBuckets, SortDirection,
};
pub use filter::{filter, CriteriaError, FilterCriteria};
pub use history::{group_by_month, MonthGroup};
pub use labels::{label_table, LabelTable};
pub use record::{
    validate_rows, AppointmentRecord, AppointmentStatus, AppointmentType, ClinicSummary, Priority,
    RawAppointment, RecordError, RecordSet,
};
pub use view::{AppointmentView, FetchTicket};
