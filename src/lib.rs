//! Attendance, leave and shift-scheduling engine for a single-site staff
//! backend.
//!
//! This crate records clock-in/clock-out events in a site-local attendance
//! ledger, runs the correction-request and leave workflows, keeps planned
//! shifts and derives attendance statistics. All date classification happens
//! in one configured site timezone.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod notify;
pub mod scheduling;
pub mod service;
pub mod stats;
pub mod store;
pub mod time;
