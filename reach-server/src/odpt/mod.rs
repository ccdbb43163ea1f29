//! ODPT (Open Data Challenge for Public Transportation in Tokyo) client.
//!
//! This module provides an HTTP client for the ODPT open-data API, which
//! publishes bus stop poles, stations and scheduled timetables.
//!
//! Key characteristics of ODPT:
//! - Authentication is a consumer key passed as the `acl:consumerKey` query
//!   parameter
//! - Times are "HH:MM" strings that keep counting past "24:00" for runs
//!   continuing after midnight
//! - Each timetable record carries either an arrival or a departure time,
//!   never both; train records may carry neither (pass-through points)

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{OdptClient, OdptConfig};
pub use convert::{ConversionError, TimetableObject, convert_run};
pub use error::OdptError;
pub use mock::MockOdptClient;
pub use types::{
    BusTimetableDto, BusTimetableObject, BusstopPoleDto, StationDto, TrainTimetableDto,
    TrainTimetableObject,
};
