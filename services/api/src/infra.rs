use interview_orchestrator::workflows::interview::{Session, SessionId, SessionStore, StoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local session records. A poisoned lock surfaces as an unavailable store.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    records: Arc<Mutex<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    fn records(&self) -> Result<MutexGuard<'_, HashMap<SessionId, Session>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("session store mutex poisoned".to_string()))
    }

    pub(crate) fn len(&self) -> usize {
        self.records().map(|guard| guard.len()).unwrap_or_default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(&self, session: &Session) -> Result<(), StoreError> {
        let mut guard = self.records()?;
        if guard.contains_key(&session.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn update(&self, session: &Session) -> Result<(), StoreError> {
        let mut guard = self.records()?;
        guard.insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        let guard = self.records()?;
        Ok(guard.get(id).cloned())
    }
}
