/// Maps client-provided session IDs (e.g. "task-1") to the Gemini CLI's
/// internal session IDs (e.g. "54e41765-...").
///
/// The CLI never reports the ID of a conversation it just created, so the
/// first use of a client ID starts a conversation and infers the new ID by
/// diffing `--list-sessions` before and after. Mappings live in memory for
/// the lifetime of the `SessionManager` (normally the whole process) and
/// are lost on restart.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use super::error::SessionMappingError;

define_debug_log!("session");

pub struct SessionManager {
    /// client id → Gemini session id; entries are never replaced or removed
    sessions: Mutex<HashMap<String, String>>,
    /// Held from the "before" snapshot to the insert, so only one new
    /// conversation is ever being created at a time.
    creation_lock: tokio::sync::Mutex<()>,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            creation_lock: tokio::sync::Mutex::new(()),
        }
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get the Gemini internal session ID for a given client ID.
    pub fn get_session_id(&self, client_id: &str) -> Option<String> {
        self.lock_sessions().get(client_id).cloned()
    }

    /// Set the mapping manually. An existing mapping is kept as-is.
    pub fn set_session_id(&self, client_id: &str, real_id: &str) {
        self.lock_sessions()
            .entry(client_id.to_string())
            .or_insert_with(|| real_id.to_string());
    }

    /// Snapshot of all current mappings, ordered by client ID.
    pub fn all_mappings(&self) -> BTreeMap<String, String> {
        self.lock_sessions()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Resolve a client session ID to a real Gemini session ID.
    ///
    /// If the mapping exists it is returned without calling either function.
    /// Otherwise `start_session` runs between two `list_sessions` snapshots
    /// and the first ID that appears only in the second becomes the mapping.
    /// Errors from either function are returned unchanged.
    pub async fn resolve_session<E, L, LFut, S, SFut>(
        &self,
        client_id: &str,
        mut list_sessions: L,
        start_session: S,
    ) -> Result<String, E>
    where
        L: FnMut() -> LFut,
        LFut: Future<Output = Result<Vec<String>, E>>,
        S: FnOnce() -> SFut,
        SFut: Future<Output = Result<(), E>>,
        E: From<SessionMappingError>,
    {
        if let Some(existing) = self.get_session_id(client_id) {
            return Ok(existing);
        }

        let _creating = self.creation_lock.lock().await;

        // Another call may have mapped this client while we waited.
        if let Some(existing) = self.get_session_id(client_id) {
            debug_log(&format!("'{}' mapped while waiting -> {}", client_id, existing));
            return Ok(existing);
        }

        let before: HashSet<String> = list_sessions().await?.into_iter().collect();
        debug_log(&format!("'{}': {} sessions before start", client_id, before.len()));

        // Must start a fresh conversation (no resume flag).
        start_session().await?;

        let after = list_sessions().await?;
        let mut new_ids = after.into_iter().filter(|id| !before.contains(id));

        let Some(new_id) = new_ids.next() else {
            debug_log(&format!("'{}': no new session observed", client_id));
            return Err(SessionMappingError::NoNewSession {
                client_id: client_id.to_string(),
            }
            .into());
        };

        let extra: Vec<String> = new_ids.collect();
        if !extra.is_empty() {
            debug_log(&format!(
                "'{}': {} additional new sessions ignored: {:?}",
                client_id, extra.len(), extra
            ));
        }

        self.lock_sessions().insert(client_id.to_string(), new_id.clone());
        debug_log(&format!("'{}' -> {}", client_id, new_id));

        Ok(new_id)
    }
}
