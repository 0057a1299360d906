use std::collections::HashMap;

use crate::core::category_registry::CategoryRegistry;
use crate::domain::{CategoryTotal, Semester, Statistics, Transaction};

pub struct SummaryService;

impl SummaryService {
    /// Derives the dashboard figures for `semester` from `transactions`.
    ///
    /// Every registry category gets an entry, zero when nothing matches.
    /// Transactions whose category is not registered count toward
    /// `Uncategorized`; their stored category is not touched.
    pub fn compute_statistics(
        semester: &Semester,
        transactions: &[Transaction],
        categories: &CategoryRegistry,
    ) -> Statistics {
        let mut totals: HashMap<&str, f64> = HashMap::new();
        let mut movement: HashMap<&str, f64> = HashMap::new();
        let mut total_income = 0.0;
        let mut total_expenses = 0.0;

        for txn in transactions {
            let bucket = categories.resolve(&txn.category);
            *totals.entry(bucket).or_insert(0.0) += txn.amount;
            *movement.entry(bucket).or_insert(0.0) += txn.amount.abs();
            if txn.is_income() {
                total_income += txn.amount;
            } else if txn.is_expense() {
                total_expenses += txn.amount;
            }
        }

        let total_movement: f64 = movement.values().sum();
        let per_category = categories
            .iter()
            .map(|name| {
                let share = if total_movement > 0.0 {
                    movement.get(name).copied().unwrap_or(0.0) / total_movement
                } else {
                    0.0
                };
                CategoryTotal {
                    category: name.to_string(),
                    total: totals.get(name).copied().unwrap_or(0.0),
                    share,
                }
            })
            .collect();

        Statistics {
            starting_capital: semester.starting_capital,
            current_capital: semester.current_capital(),
            surplus: semester.surplus(),
            active_house_size: semester.active_house_size,
            insurance_cost: semester.insurance_cost,
            total_income,
            total_expenses,
            net: total_income + total_expenses,
            transaction_count: transactions.len(),
            per_category,
        }
    }
}
