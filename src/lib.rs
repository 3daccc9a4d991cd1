//! Weekly class timetable viewer.
//!
//! Fetches plans from the timetable retrieval service, filters entries by
//! class and lays them out as a day × period grid.

pub mod api;
pub mod config;
pub mod session;
pub mod timetable;
pub mod ui;
