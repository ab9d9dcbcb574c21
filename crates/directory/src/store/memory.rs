//! In-process company store.
//!
//! Backs tests and local tooling. All mutations run under a single lock, so the
//! default-exclusivity rule is applied atomically.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use facturo_core::{CompanyId, UserId};

use super::{CompanyRow, CompanyStore, CompanyWrite, StoreError};

#[derive(Debug, Default)]
struct State {
    rows: Vec<CompanyRow>,
    fail_next: Option<String>,
}

impl State {
    fn take_failure(&mut self) -> Result<(), StoreError> {
        self.fail_next.take().map_or(Ok(()), |msg| Err(StoreError::Backend(msg)))
    }

    fn demote_others(&mut self, user_id: UserId, keep: CompanyId) {
        let now = Utc::now();
        for row in self
            .rows
            .iter_mut()
            .filter(|r| r.user_id == user_id && r.id != keep && r.is_default == Some(true))
        {
            row.is_default = Some(false);
            row.updated_at = now;
        }
    }

    fn position(&self, user_id: UserId, id: CompanyId) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| r.user_id == user_id && r.id == id)
    }
}

/// Company store kept in memory, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCompanyStore {
    state: Mutex<State>,
    calls: AtomicUsize,
}

impl InMemoryCompanyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next store call fail with `message`, as a backend error would.
    pub async fn fail_next(&self, message: impl Into<String>) {
        self.state.lock().await.fail_next = Some(message.into());
    }

    /// Number of store calls made so far, failed ones included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Raw rows of every user, bypassing scoping.
    pub async fn snapshot(&self) -> Vec<CompanyRow> {
        self.state.lock().await.rows.clone()
    }

    /// Insert a row as-is, without any invariant enforcement.
    ///
    /// Used to seed legacy or inconsistent data.
    pub async fn seed(&self, row: CompanyRow) {
        self.state.lock().await.rows.push(row);
    }

    async fn begin(&self) -> Result<tokio::sync::MutexGuard<'_, State>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().await;
        state.take_failure()?;
        Ok(state)
    }
}

#[async_trait]
impl CompanyStore for InMemoryCompanyStore {
    async fn list_companies(&self, user_id: UserId) -> Result<Vec<CompanyRow>, StoreError> {
        let state = self.begin().await?;
        Ok(state
            .rows
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_company(
        &self,
        user_id: UserId,
        id: CompanyId,
    ) -> Result<Option<CompanyRow>, StoreError> {
        let state = self.begin().await?;
        Ok(state
            .position(user_id, id)
            .and_then(|i| state.rows.get(i))
            .cloned())
    }

    async fn insert_company(
        &self,
        user_id: UserId,
        company: &CompanyWrite,
    ) -> Result<CompanyRow, StoreError> {
        let mut state = self.begin().await?;
        let now = Utc::now();
        let row = CompanyRow::from_write(CompanyId::random(), user_id, company, now, now);
        if company.is_default {
            state.demote_others(user_id, row.id);
        }
        state.rows.push(row.clone());
        Ok(row)
    }

    async fn update_company(
        &self,
        user_id: UserId,
        id: CompanyId,
        company: &CompanyWrite,
    ) -> Result<Option<CompanyRow>, StoreError> {
        let mut state = self.begin().await?;
        let Some(index) = state.position(user_id, id) else {
            return Ok(None);
        };
        if company.is_default {
            state.demote_others(user_id, id);
        }
        let Some(slot) = state.rows.get_mut(index) else {
            return Ok(None);
        };
        *slot = CompanyRow::from_write(id, user_id, company, slot.created_at, Utc::now());
        Ok(Some(slot.clone()))
    }

    async fn delete_company(&self, user_id: UserId, id: CompanyId) -> Result<bool, StoreError> {
        let mut state = self.begin().await?;
        let before = state.rows.len();
        state.rows.retain(|r| !(r.user_id == user_id && r.id == id));
        Ok(state.rows.len() < before)
    }

    async fn set_default_company(
        &self,
        user_id: UserId,
        id: CompanyId,
    ) -> Result<Option<CompanyRow>, StoreError> {
        let mut state = self.begin().await?;
        let Some(index) = state.position(user_id, id) else {
            return Ok(None);
        };
        state.demote_others(user_id, id);
        let Some(slot) = state.rows.get_mut(index) else {
            return Ok(None);
        };
        slot.is_default = Some(true);
        slot.updated_at = Utc::now();
        Ok(Some(slot.clone()))
    }
}
