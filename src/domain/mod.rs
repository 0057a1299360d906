//! Records exchanged with the backend and the values derived from them.

pub mod category;
pub mod common;
pub mod semester;
pub mod statistics;
pub mod transaction;

pub use category::{DEFAULT_CATEGORIES, UNCATEGORIZED};
pub use common::{Displayable, SemesterId, TransactionId};
pub use semester::{Semester, SemesterDraft, SemesterUpdate};
pub use statistics::{CategoryTotal, Statistics};
pub use transaction::Transaction;
