use log::debug;

use crate::error::Result;
use crate::persistence::KeyValueStore;
use crate::session::EditSession;

const SESSION_PREFIX: &str = "session:";

/// Loads and saves edit sessions keyed by post id
pub struct SessionRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> SessionRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Session for a post, or a fresh one if none was saved
    pub fn load(&self, post_id: &str) -> Result<EditSession> {
        match self.store.get(&session_key(post_id))? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => {
                debug!("No saved session for post {}", post_id);
                Ok(EditSession::new())
            }
        }
    }

    pub fn save(&self, post_id: &str, session: &EditSession) -> Result<()> {
        let raw = serde_json::to_string(session)?;
        self.store.set(&session_key(post_id), &raw)
    }

    /// Drop a post's session, returning whether one existed
    pub fn discard(&self, post_id: &str) -> Result<bool> {
        self.store.remove(&session_key(post_id))
    }
}

fn session_key(post_id: &str) -> String {
    format!("{}{}", SESSION_PREFIX, post_id.trim())
}
