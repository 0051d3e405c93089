//! Process-wide note service session.

use std::sync::{Arc, RwLock};

/// Identity established with the note service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteSession {
    pub is_authenticated: bool,
    pub display_name: Option<String>,
}

impl NoteSession {
    pub fn authenticated(display_name: impl Into<String>) -> Self {
        Self {
            is_authenticated: true,
            display_name: Some(display_name.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Shared, mutable session slot. Cloning shares the same slot.
#[derive(Debug, Clone, Default)]
pub struct SharedNoteSession {
    inner: Arc<RwLock<NoteSession>>,
}

impl SharedNoteSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> NoteSession {
        self.inner.read().expect("note session lock poisoned").clone()
    }

    pub fn set(&self, session: NoteSession) {
        *self.inner.write().expect("note session lock poisoned") = session;
    }

    pub fn reset(&self) {
        self.set(NoteSession::anonymous());
    }
}
