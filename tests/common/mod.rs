#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::NaiveDate;
use semester_core::{
    core::clock::FixedClock,
    domain::{Semester, SemesterDraft, SemesterId, SemesterUpdate, Transaction},
    remote::RemoteStore,
    DashboardError, Result, Session,
};

/// Remote operations the double can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListSemesters,
    CreateSemester,
    UpdateSemester,
    DeleteSemester,
    ListTransactions,
    UpdateTransaction,
}

/// A recorded remote call with the identifier or name it targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListSemesters,
    CreateSemester(String),
    UpdateSemester(String),
    DeleteSemester(String),
    ListTransactions(String),
    UpdateTransaction(String),
}

#[derive(Default)]
struct State {
    semesters: Vec<Semester>,
    transactions: HashMap<SemesterId, Vec<Transaction>>,
    calls: Vec<Call>,
    failing: HashSet<Op>,
    created: u32,
}

/// In-memory backend shared between the test and the session under test.
#[derive(Clone, Default)]
pub struct MockStore {
    state: Arc<Mutex<State>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_semester(self, semester: Semester, transactions: Vec<Transaction>) -> Self {
        {
            let mut state = self.lock();
            state.transactions.insert(semester.id.clone(), transactions);
            state.semesters.push(semester);
        }
        self
    }

    pub fn fail(&self, op: Op) {
        self.lock().failing.insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.lock().failing.remove(&op);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn boxed(&self) -> Box<dyn RemoteStore> {
        Box::new(self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("mock store state")
    }

    fn record(&self, call: Call, op: Op) -> Result<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.failing.contains(&op) {
            return Err(DashboardError::Network(format!("simulated outage in {op:?}")));
        }
        Ok(state)
    }
}

impl RemoteStore for MockStore {
    fn list_semesters(&self) -> Result<Vec<Semester>> {
        let state = self.record(Call::ListSemesters, Op::ListSemesters)?;
        Ok(state.semesters.clone())
    }

    fn create_semester(&self, draft: &SemesterDraft) -> Result<Semester> {
        let mut state = self.record(
            Call::CreateSemester(draft.name.clone()),
            Op::CreateSemester,
        )?;
        state.created += 1;
        let mut semester = Semester::new(
            format!("new-{}", state.created),
            draft.name.clone(),
            draft.date,
        );
        semester.starting_capital = draft.starting_capital;
        semester.active_house_size = draft.active_house_size;
        semester.insurance_cost = draft.insurance_cost;
        state.semesters.push(semester.clone());
        Ok(semester)
    }

    fn update_semester(&self, id: &SemesterId, changes: &SemesterUpdate) -> Result<Semester> {
        let mut state = self.record(Call::UpdateSemester(id.to_string()), Op::UpdateSemester)?;
        let semester = state
            .semesters
            .iter_mut()
            .find(|semester| &semester.id == id)
            .ok_or_else(|| DashboardError::NotFound(format!("semester `{id}`")))?;
        if let Some(name) = &changes.name {
            semester.name = name.clone();
        }
        if let Some(value) = changes.starting_capital {
            semester.starting_capital = value;
        }
        if let Some(value) = changes.current_capital {
            semester.current_capital = Some(value);
        }
        if let Some(value) = changes.active_house_size {
            semester.active_house_size = value;
        }
        if let Some(value) = changes.insurance_cost {
            semester.insurance_cost = value;
        }
        Ok(semester.clone())
    }

    fn delete_semester(&self, id: &SemesterId) -> Result<()> {
        let mut state = self.record(Call::DeleteSemester(id.to_string()), Op::DeleteSemester)?;
        let before = state.semesters.len();
        state.semesters.retain(|semester| &semester.id != id);
        if state.semesters.len() == before {
            return Err(DashboardError::NotFound(format!("semester `{id}`")));
        }
        state.transactions.remove(id);
        Ok(())
    }

    fn list_transactions(&self, semester_id: &SemesterId) -> Result<Vec<Transaction>> {
        let state = self.record(
            Call::ListTransactions(semester_id.to_string()),
            Op::ListTransactions,
        )?;
        Ok(state.transactions.get(semester_id).cloned().unwrap_or_default())
    }

    fn update_transaction(&self, transaction: &Transaction) -> Result<Transaction> {
        let mut state = self.record(
            Call::UpdateTransaction(transaction.id.to_string()),
            Op::UpdateTransaction,
        )?;
        let slot = state
            .transactions
            .get_mut(&transaction.semester_id)
            .and_then(|list| list.iter_mut().find(|txn| txn.id == transaction.id))
            .ok_or_else(|| {
                DashboardError::NotFound(format!("transaction `{}`", transaction.id))
            })?;
        *slot = transaction.clone();
        Ok(transaction.clone())
    }
}

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 1).expect("valid date")
}

pub fn semester(id: &str, name: &str) -> Semester {
    Semester::new(id, name, date())
}

pub fn txn(id: &str, semester: &str, amount: f64, category: &str) -> Transaction {
    Transaction::new(id, semester, amount, category, date())
}

/// Two semesters: `s1` with a dues payment and an unregistered expense, `s2` with one event.
pub fn two_semester_store() -> MockStore {
    MockStore::new()
        .with_semester(
            semester("s1", "Fall 2024").with_capital(1000.0, Some(1080.0)),
            vec![
                txn("t1", "s1", 100.0, "Dues").with_description("September dues"),
                txn("t2", "s1", -20.0, "Snacks").with_description("Chips for chapter"),
            ],
        )
        .with_semester(
            semester("s2", "Spring 2025"),
            vec![txn("t3", "s2", -75.0, "Event").with_description("Formal deposit")],
        )
}

pub fn session_for(store: &MockStore) -> Session {
    Session::new(store.boxed()).with_clock(Box::new(FixedClock(
        NaiveDate::from_ymd_opt(2025, 1, 13).expect("valid date"),
    )))
}

pub fn id(raw: &str) -> SemesterId {
    SemesterId::new(raw)
}
