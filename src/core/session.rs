//! Orchestrates remote calls, the semester cache, and the current selection.

use tracing::{debug, info, warn};

use crate::{
    config::Config,
    core::{
        category_registry::CategoryRegistry,
        clock::{Clock, SystemClock},
        semester_cache::SemesterCache,
        services::{SearchService, SummaryService},
    },
    domain::{
        Semester, SemesterDraft, SemesterId, SemesterUpdate, Statistics, Transaction,
        TransactionId,
    },
    errors::{DashboardError, Result},
    remote::{HttpRemoteStore, RemoteStore},
};

/// Coarse lifecycle of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSemesters,
    SemestersLoaded,
    SemesterSelected,
}

/// Ticket for an in-flight transaction load, tagged with the semester it was
/// requested for. Only the most recently issued ticket can be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a load ticket does nothing until passed to `Session::complete_load`"]
pub struct TransactionLoad {
    semester_id: SemesterId,
    generation: u64,
}

impl TransactionLoad {
    pub fn semester_id(&self) -> &SemesterId {
        &self.semester_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a transaction-load response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was issued or the semester vanished before the response arrived.
    Discarded,
}

/// Result of a successful delete.
#[derive(Debug)]
pub struct DeleteOutcome {
    pub deleted: SemesterId,
    pub selected: Option<SemesterId>,
    /// Set when the semester selected in place of the deleted one could not
    /// load its transactions. The delete itself still happened.
    pub reload_error: Option<DashboardError>,
}

/// Client-side view of the dashboard backend.
///
/// Every operation either completes or leaves the cache and selection as they
/// were; remote errors are returned to the caller, never retried.
pub struct Session {
    store: Box<dyn RemoteStore>,
    clock: Box<dyn Clock>,
    cache: SemesterCache,
    categories: CategoryRegistry,
    selected: Option<SemesterId>,
    listed: bool,
    issued_loads: u64,
}

impl Session {
    pub fn new(store: Box<dyn RemoteStore>) -> Self {
        Self {
            store,
            clock: Box::new(SystemClock),
            cache: SemesterCache::new(),
            categories: CategoryRegistry::default(),
            selected: None,
            listed: false,
            issued_loads: 0,
        }
    }

    /// Connects to the configured backend with the configured categories.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = HttpRemoteStore::from_config(config)?;
        Ok(Self::new(Box::new(store))
            .with_categories(CategoryRegistry::from_names(&config.categories)))
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_categories(mut self, categories: CategoryRegistry) -> Self {
        self.categories = categories;
        self
    }

    pub fn state(&self) -> SessionState {
        if self.selected.is_some() {
            SessionState::SemesterSelected
        } else if self.listed && !self.cache.is_empty() {
            SessionState::SemestersLoaded
        } else {
            SessionState::NoSemesters
        }
    }

    /// Fetches the semester list and selects the first semester, if any.
    ///
    /// If the first semester's transactions cannot be loaded, the previous
    /// selection is kept when it is still listed.
    pub fn load(&mut self) -> Result<SessionState> {
        let semesters = self.store.list_semesters().map_err(|err| {
            warn!(error = %err, "failed to list semesters");
            err
        })?;
        info!(count = semesters.len(), "semesters loaded");
        self.cache.replace_all(semesters);
        self.listed = true;
        // The current view survives the reload until the first semester's
        // transactions are applied, unless its semester is gone.
        if let Some(current) = self.selected.take() {
            if self.cache.contains(&current) {
                self.selected = Some(current);
            }
        }
        // Anything still in flight belongs to the previous listing.
        self.issued_loads += 1;

        if let Some(first) = self.cache.first().map(|semester| semester.id.clone()) {
            self.select(&first)?;
        }
        Ok(self.state())
    }

    /// Selects a cached semester and loads its transactions.
    pub fn select(&mut self, id: &SemesterId) -> Result<LoadOutcome> {
        let ticket = self.begin_select(id)?;
        let result = self.store.list_transactions(ticket.semester_id());
        self.complete_load(ticket, result)
    }

    /// Issues a load ticket for `id`, superseding any earlier ticket.
    pub fn begin_select(&mut self, id: &SemesterId) -> Result<TransactionLoad> {
        if !self.cache.contains(id) {
            return Err(DashboardError::NotFound(format!("semester `{id}`")));
        }
        self.issued_loads += 1;
        debug!(semester = %id, generation = self.issued_loads, "transaction load issued");
        Ok(TransactionLoad {
            semester_id: id.clone(),
            generation: self.issued_loads,
        })
    }

    /// Applies the response of a transaction load if its ticket is still current.
    ///
    /// Stale responses are dropped whether they succeeded or failed. A current
    /// failure is returned and leaves the selection untouched.
    pub fn complete_load(
        &mut self,
        ticket: TransactionLoad,
        result: Result<Vec<Transaction>>,
    ) -> Result<LoadOutcome> {
        let TransactionLoad {
            semester_id,
            generation,
        } = ticket;
        if generation != self.issued_loads || !self.cache.contains(&semester_id) {
            debug!(semester = %semester_id, generation, "stale transaction load discarded");
            return Ok(LoadOutcome::Discarded);
        }

        let mut transactions = result.map_err(|err| {
            warn!(semester = %semester_id, error = %err, "failed to load transactions");
            err
        })?;
        let before = transactions.len();
        transactions.retain(|txn| txn.semester_id == semester_id);
        if transactions.len() != before {
            warn!(
                semester = %semester_id,
                dropped = before - transactions.len(),
                "backend returned transactions of another semester"
            );
        }

        info!(semester = %semester_id, count = transactions.len(), "semester selected");
        self.cache.set_transactions(&semester_id, transactions)?;
        self.selected = Some(semester_id);
        Ok(LoadOutcome::Applied)
    }

    /// Creates a semester named `name`, dated today, with zeroed figures.
    pub fn create(&mut self, name: &str) -> Result<SemesterId> {
        let draft = SemesterDraft::new(name, self.clock.today());
        self.create_from_draft(draft)
    }

    /// Creates a semester from `draft` and selects it.
    ///
    /// A blank name is rejected before any request is sent. A new semester has
    /// no transactions, so it is selected with an empty list and nothing else
    /// is fetched.
    pub fn create_from_draft(&mut self, mut draft: SemesterDraft) -> Result<SemesterId> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(DashboardError::Validation(
                "semester name must not be empty".into(),
            ));
        }
        draft.name = name.to_string();

        let semester = self.store.create_semester(&draft).map_err(|err| {
            warn!(name = %draft.name, error = %err, "failed to create semester");
            err
        })?;
        let id = semester.id.clone();
        info!(semester = %id, name = %semester.name, "semester created");
        self.cache.upsert(semester);
        self.listed = true;
        self.cache.set_transactions(&id, Vec::new())?;
        // Supersedes any transaction load still in flight.
        self.issued_loads += 1;
        self.selected = Some(id.clone());
        Ok(id)
    }

    /// Deletes the currently selected semester.
    pub fn delete_selected(&mut self) -> Result<DeleteOutcome> {
        let id = self
            .selected
            .clone()
            .ok_or_else(|| DashboardError::NotFound("no semester is selected".into()))?;
        self.delete(&id)
    }

    /// Deletes `id` on the backend, then drops it from the cache.
    ///
    /// Requires a selection. When the selected semester is deleted, the first
    /// remaining semester becomes selected, or none when the cache is empty.
    pub fn delete(&mut self, id: &SemesterId) -> Result<DeleteOutcome> {
        if self.selected.is_none() {
            return Err(DashboardError::NotFound("no semester is selected".into()));
        }
        if !self.cache.contains(id) {
            return Err(DashboardError::NotFound(format!("semester `{id}`")));
        }

        self.store.delete_semester(id).map_err(|err| {
            warn!(semester = %id, error = %err, "failed to delete semester");
            err
        })?;
        self.cache.remove(id);
        info!(semester = %id, "semester deleted");

        let mut reload_error = None;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
            if let Some(next) = self.cache.first().map(|semester| semester.id.clone()) {
                if let Err(err) = self.select(&next) {
                    self.cache.set_transactions(&next, Vec::new())?;
                    self.selected = Some(next);
                    reload_error = Some(err);
                }
            }
        }

        Ok(DeleteOutcome {
            deleted: id.clone(),
            selected: self.selected.clone(),
            reload_error,
        })
    }

    /// Sends summary changes for `id` and replaces the cached record with the backend's.
    pub fn update_summary(
        &mut self,
        id: &SemesterId,
        mut changes: SemesterUpdate,
    ) -> Result<&Semester> {
        if !self.cache.contains(id) {
            return Err(DashboardError::NotFound(format!("semester `{id}`")));
        }
        if changes.is_empty() {
            return Err(DashboardError::Validation(
                "no summary changes given".into(),
            ));
        }
        if let Some(name) = changes.name.as_mut() {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(DashboardError::Validation(
                    "semester name must not be empty".into(),
                ));
            }
            *name = trimmed.to_string();
        }

        let updated = self.store.update_semester(id, &changes).map_err(|err| {
            warn!(semester = %id, error = %err, "failed to update semester");
            err
        })?;
        if &updated.id != id {
            return Err(DashboardError::Network(format!(
                "backend answered update of `{id}` with semester `{}`",
                updated.id
            )));
        }
        info!(semester = %id, "semester summary updated");
        self.cache.upsert(updated);
        self.cache
            .get(id)
            .ok_or_else(|| DashboardError::NotFound(format!("semester `{id}`")))
    }

    /// Moves a transaction of the selected semester to another registered category.
    pub fn set_transaction_category(
        &mut self,
        transaction_id: &TransactionId,
        category: &str,
    ) -> Result<()> {
        if !self.categories.is_valid(category) {
            return Err(DashboardError::Validation(format!(
                "`{category}` is not a known category"
            )));
        }
        let semester_id = self
            .selected
            .clone()
            .ok_or_else(|| DashboardError::NotFound("no semester is selected".into()))?;
        let mut updated = self
            .cache
            .transactions(&semester_id)
            .iter()
            .find(|txn| &txn.id == transaction_id)
            .cloned()
            .ok_or_else(|| {
                DashboardError::NotFound(format!("transaction `{transaction_id}`"))
            })?;
        updated.category = category.to_string();

        let saved = self.store.update_transaction(&updated).map_err(|err| {
            warn!(transaction = %transaction_id, error = %err, "failed to update transaction");
            err
        })?;
        self.cache.replace_transaction(&semester_id, saved)?;
        info!(transaction = %transaction_id, category, "transaction recategorized");
        Ok(())
    }

    pub fn selected_id(&self) -> Option<&SemesterId> {
        self.selected.as_ref()
    }

    pub fn selected_semester(&self) -> Option<&Semester> {
        self.selected.as_ref().and_then(|id| self.cache.get(id))
    }

    /// Cached semesters in backend order.
    pub fn semesters(&self) -> &[Semester] {
        self.cache.semesters()
    }

    /// Transactions of the selected semester; empty without a selection.
    pub fn transactions(&self) -> &[Transaction] {
        match &self.selected {
            Some(id) => self.cache.transactions(id),
            None => &[],
        }
    }

    /// Transactions of the selected semester matching `query`. Never mutates the cache.
    pub fn search(&self, query: &str) -> Vec<&Transaction> {
        SearchService::filter(self.transactions(), query)
    }

    /// Statistics for the selected semester, recomputed on every call.
    pub fn statistics(&self) -> Option<Statistics> {
        self.selected_semester().map(|semester| {
            SummaryService::compute_statistics(semester, self.transactions(), &self.categories)
        })
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn add_category(&mut self, name: &str) -> bool {
        self.categories.add(name)
    }

    pub fn remove_category(&mut self, name: &str) -> bool {
        self.categories.remove(name)
    }

    pub fn cache(&self) -> &SemesterCache {
        &self.cache
    }
}
