//! Summary figures derived from a semester and its transactions.

use serde::Serialize;

/// Aggregated total for one registry category.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    /// Fraction of the semester's absolute movement in this category, in `0.0..=1.0`.
    pub share: f64,
}

/// Figures shown on the dashboard for the selected semester.
///
/// Never cached: each value is computed from the transaction list it was
/// given and is stale as soon as that list changes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Statistics {
    pub starting_capital: f64,
    pub current_capital: f64,
    pub surplus: f64,
    pub active_house_size: u32,
    pub insurance_cost: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net: f64,
    pub transaction_count: usize,
    /// One entry per registry category, in registry order.
    pub per_category: Vec<CategoryTotal>,
}

impl Statistics {
    pub fn category_total(&self, category: &str) -> Option<f64> {
        self.per_category
            .iter()
            .find(|entry| entry.category == category)
            .map(|entry| entry.total)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.per_category.iter().map(|entry| entry.category.as_str())
    }
}
