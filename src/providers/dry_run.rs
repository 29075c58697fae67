use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{BoardApi, Form, RawResponse};
use crate::error::TrelloError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Create,
    Update,
}

/// A write that a dry run held back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWrite {
    pub kind: WriteKind,
    pub resource: String,
    pub form: Form,
}

/// Passes reads through to `inner` and records writes instead of sending them.
pub struct DryRun<A> {
    inner: A,
    planned: Mutex<Vec<PlannedWrite>>,
}

impl<A: BoardApi> DryRun<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            planned: Mutex::new(Vec::new()),
        }
    }

    pub fn planned(&self) -> Vec<PlannedWrite> {
        self.lock().clone()
    }

    /// Each push is a single operation, so a poisoned list is still whole.
    fn lock(&self) -> MutexGuard<'_, Vec<PlannedWrite>> {
        self.planned.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, kind: WriteKind, resource: &str, form: &Form) -> RawResponse {
        tracing::info!(?kind, %resource, "dry run: holding back write");
        self.lock().push(PlannedWrite {
            kind,
            resource: resource.to_string(),
            form: form.clone(),
        });
        RawResponse {
            status: 200,
            body: String::new(),
        }
    }
}

#[async_trait]
impl<A: BoardApi> BoardApi for DryRun<A> {
    async fn fetch(&self, resource: &str) -> Result<serde_json::Value, TrelloError> {
        self.inner.fetch(resource).await
    }

    async fn create(&self, resource: &str, form: &Form) -> Result<RawResponse, TrelloError> {
        Ok(self.record(WriteKind::Create, resource, form))
    }

    async fn update(&self, resource: &str, form: &Form) -> Result<RawResponse, TrelloError> {
        Ok(self.record(WriteKind::Update, resource, form))
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use super::*;
    use crate::providers::tests::{value_form, MockApi};

    #[tokio::test]
    async fn keeps_recording_after_a_poisoned_lock() {
        let api = DryRun::new(MockApi::new());
        api.update("cards/c1/due", &value_form("2024-01-02T00:00:00.000Z"))
            .await
            .unwrap();
        let _ = panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = api.planned.lock().unwrap();
            panic!("writer died");
        }));
        assert!(api.planned.is_poisoned());

        api.update("cards/c1/idList", &value_form("l1")).await.unwrap();
        let planned = api.planned();
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[1].resource, "cards/c1/idList");
    }
}
