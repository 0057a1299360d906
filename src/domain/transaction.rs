//! Transaction records scoped to a single semester.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::category::default_category;
use crate::domain::common::{Displayable, SemesterId, TransactionId};

/// A dated, categorised monetary record.
///
/// `amount` is signed: positive values are income, negative values are expenses.
/// Fields the dashboard does not model are kept in `metadata` and written back
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub semester_id: SemesterId,
    pub amount: f64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Transaction {
    pub fn new(
        id: impl Into<TransactionId>,
        semester_id: impl Into<SemesterId>,
        amount: f64,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            semester_id: semester_id.into(),
            amount,
            category: category.into(),
            description: String::new(),
            date,
            notes: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        let description = if self.description.is_empty() {
            "(no description)"
        } else {
            self.description.as_str()
        };
        format!(
            "{} {:>10.2} [{}] {}",
            self.date, self.amount, self.category, description
        )
    }
}
