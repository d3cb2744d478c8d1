//! Shared utilities

pub mod datetime;

pub use datetime::{StampDateTime, ZonedDateTime};
