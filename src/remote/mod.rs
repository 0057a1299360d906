//! Request/response access to the backend that owns semesters and transactions.

pub mod http_backend;

use crate::{
    domain::{Semester, SemesterDraft, SemesterId, SemesterUpdate, Transaction},
    errors::Result,
};

/// Abstraction over the remote store. Implementations never retry; every
/// failure is returned to the caller as-is.
pub trait RemoteStore: Send + Sync {
    fn list_semesters(&self) -> Result<Vec<Semester>>;
    fn create_semester(&self, draft: &SemesterDraft) -> Result<Semester>;
    fn update_semester(&self, id: &SemesterId, changes: &SemesterUpdate) -> Result<Semester>;
    fn delete_semester(&self, id: &SemesterId) -> Result<()>;
    fn list_transactions(&self, semester_id: &SemesterId) -> Result<Vec<Transaction>>;
    fn update_transaction(&self, transaction: &Transaction) -> Result<Transaction>;
}

pub use http_backend::HttpRemoteStore;
