//! Active vehicle sessions keyed by vehicle id.

use std::collections::HashMap;

use serde::Serialize;

use crate::category::Category;
use crate::pool::Slot;

/// Entry time in whole seconds. Callers supply non-decreasing values.
pub type Timestamp = u64;

/// One vehicle currently parked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub vehicle_id: String,
    pub category: Category,
    pub slot: Slot,
    pub entered_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("vehicle '{0}' already has an active session")]
    Duplicate(String),
}

/// Registry of active sessions. At most one per vehicle id.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new session. A second session for the same vehicle is rejected and
    /// the existing one kept.
    pub fn put(&mut self, session: Session) -> Result<(), RegistryError> {
        if self.sessions.contains_key(&session.vehicle_id) {
            return Err(RegistryError::Duplicate(session.vehicle_id));
        }
        self.sessions.insert(session.vehicle_id.clone(), session);
        Ok(())
    }

    pub fn get(&self, vehicle_id: &str) -> Option<&Session> {
        self.sessions.get(vehicle_id)
    }

    pub fn contains(&self, vehicle_id: &str) -> bool {
        self.sessions.contains_key(vehicle_id)
    }

    /// Remove and return the session for `vehicle_id`.
    pub fn take(&mut self, vehicle_id: &str) -> Option<Session> {
        self.sessions.remove(vehicle_id)
    }

    /// Active sessions of one category.
    pub fn count(&self, category: Category) -> usize {
        self.sessions
            .values()
            .filter(|s| s.category == category)
            .count()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
