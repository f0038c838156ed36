//! HR operations engine
//!
//! This crate implements the rules behind attendance, leave and payroll:
//! check-in and check-out with lateness, working hours, overtime and status
//! derivation, monthly attendance summaries, leave durations and payroll
//! totals. An in-memory store and an axum REST API are built on top.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
