#![doc(test(attr(deny(warnings))))]

//! Semester Core keeps a client-side view of semester budgets in sync with the
//! dashboard backend and derives the statistics shown for the selected semester.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod remote;
pub mod utils;

pub use crate::core::{
    category_registry::CategoryRegistry,
    semester_cache::SemesterCache,
    session::{DeleteOutcome, LoadOutcome, Session, SessionState, TransactionLoad},
};
pub use errors::{DashboardError, ErrorKind, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Semester Core tracing initialized.");
    });
}
