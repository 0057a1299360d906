use crate::domain::Transaction;

/// Field-by-field, case-insensitive substring search over transactions.
pub struct SearchService;

impl SearchService {
    /// Keeps the transactions matching `query`, preserving order.
    pub fn filter<'a, I>(transactions: I, query: &str) -> Vec<&'a Transaction>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let needle = normalize(query);
        transactions
            .into_iter()
            .filter(|txn| matches_normalized(txn, &needle))
            .collect()
    }

    /// True when any searchable field of `transaction` contains `query`.
    /// An empty query matches everything; whitespace is matched as typed.
    pub fn matches(transaction: &Transaction, query: &str) -> bool {
        matches_normalized(transaction, &normalize(query))
    }
}

fn normalize(query: &str) -> String {
    query.to_lowercase()
}

fn matches_normalized(txn: &Transaction, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    searchable_fields(txn).any(|field| field.to_lowercase().contains(needle))
}

/// Text forms of the fields a user can search by. Amounts are offered both as
/// written (`12.5`) and with cents (`12.50`).
fn searchable_fields(txn: &Transaction) -> impl Iterator<Item = String> + '_ {
    let fixed = [
        txn.id.to_string(),
        txn.semester_id.to_string(),
        txn.category.clone(),
        txn.description.clone(),
        txn.date.format("%Y-%m-%d").to_string(),
        format!("{}", txn.amount),
        format!("{:.2}", txn.amount),
    ];
    let notes = txn.notes.iter().cloned();
    let metadata = txn.metadata.values().filter_map(|value| match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        serde_json::Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    });
    fixed.into_iter().chain(notes).chain(metadata)
}
