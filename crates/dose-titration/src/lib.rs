//! Dose-titration reassessment engine for injectable weight-loss therapy.
//!
//! The [`workflows::reassessment`] module holds the scoring and decision engine along with the
//! validator, submission sink, service, and HTTP router that surround it.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
