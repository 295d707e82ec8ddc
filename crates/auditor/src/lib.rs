//! Capped-collection audit
//!
//! One pass over a collection catalog: classify every collection by name
//! and capped status, convert the uncapped realtime ones, and report
//! both the anomalies and the conversions.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod audit;
mod classification;

pub use audit::{audit_collections, AuditOptions, AuditReport, DEFAULT_CAP_SIZE_BYTES};
pub use classification::{classify, is_realtime, Classification, REALTIME_PATTERN};
