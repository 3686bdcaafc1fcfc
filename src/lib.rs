//! Appointment views for the IgabayCare patient, clinic, and doctor screens.
//!
//! [`appointments`] holds the pure derivation pipeline (filter, bucket,
//! aggregate, history grouping); [`store`] fetches rows; [`routes`] serves the
//! derived views over HTTP.

pub mod appointments;
pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod store;
