//! In-memory view of the backend's semesters and the loaded transaction lists.

use std::collections::HashMap;

use crate::{
    domain::{Semester, SemesterId, Transaction},
    errors::{DashboardError, Result},
};

/// Semesters in backend order plus the transaction lists loaded for them.
///
/// A transaction list only exists while its semester does: removing a
/// semester drops its list so a reused id starts from nothing.
#[derive(Debug, Clone, Default)]
pub struct SemesterCache {
    semesters: Vec<Semester>,
    transactions: HashMap<SemesterId, Vec<Transaction>>,
}

impl SemesterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `semester`, or replaces the whole record in place when its id is cached.
    pub fn upsert(&mut self, semester: Semester) {
        match self.position(&semester.id) {
            Some(index) => self.semesters[index] = semester,
            None => self.semesters.push(semester),
        }
    }

    /// Removes the semester and its transaction list.
    pub fn remove(&mut self, id: &SemesterId) -> Option<Semester> {
        self.transactions.remove(id);
        self.position(id).map(|index| self.semesters.remove(index))
    }

    /// Swaps in a fresh semester listing, dropping lists of semesters that disappeared.
    pub fn replace_all(&mut self, semesters: Vec<Semester>) {
        self.transactions
            .retain(|id, _| semesters.iter().any(|semester| &semester.id == id));
        self.semesters = semesters;
    }

    pub fn get(&self, id: &SemesterId) -> Option<&Semester> {
        self.semesters.iter().find(|semester| &semester.id == id)
    }

    pub fn contains(&self, id: &SemesterId) -> bool {
        self.position(id).is_some()
    }

    pub fn first(&self) -> Option<&Semester> {
        self.semesters.first()
    }

    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    /// Replaces the transaction list of a cached semester.
    pub fn set_transactions(
        &mut self,
        id: &SemesterId,
        transactions: Vec<Transaction>,
    ) -> Result<()> {
        if !self.contains(id) {
            return Err(DashboardError::NotFound(format!(
                "semester `{id}` is not cached"
            )));
        }
        self.transactions.insert(id.clone(), transactions);
        Ok(())
    }

    /// Loaded transactions for `id`; empty when none were loaded.
    pub fn transactions(&self, id: &SemesterId) -> &[Transaction] {
        self.transactions.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_transactions(&self, id: &SemesterId) -> bool {
        self.transactions.contains_key(id)
    }

    /// Replaces one transaction, matched by id, in the semester's loaded list.
    pub fn replace_transaction(
        &mut self,
        id: &SemesterId,
        transaction: Transaction,
    ) -> Result<()> {
        let slot = self
            .transactions
            .get_mut(id)
            .and_then(|list| list.iter_mut().find(|existing| existing.id == transaction.id))
            .ok_or_else(|| {
                DashboardError::NotFound(format!(
                    "transaction `{}` is not loaded for semester `{id}`",
                    transaction.id
                ))
            })?;
        *slot = transaction;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.semesters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.semesters.is_empty()
    }

    fn position(&self, id: &SemesterId) -> Option<usize> {
        self.semesters.iter().position(|semester| &semester.id == id)
    }
}
