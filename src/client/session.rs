//! Client-side session: the current user, access token and last error.
//!
//! `Session` is a cheap-clone handle shared by the API client, the router and
//! the UI hooks. Every change to `token` or `user` is written to memory and to
//! the backing [`KeyValueStore`] in the same call, so the two never diverge:
//! - set a value: memory updated, storage key written
//! - clear a value (or set an empty token): memory cleared, storage key removed
//!
//! `error` is display state for the current view and is never persisted.
//!
//! Listeners registered with [`Session::subscribe`] see a fresh snapshot after
//! every change, whoever made it.

use crate::User;
use crate::client::jwt::token_is_expired;
use crate::client::storage::{KeyValueStore, TOKEN_KEY, USER_KEY};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Snapshot of the session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    /// Record of the logged-in user
    pub user: Option<User>,
    /// Access token; its presence is what "authenticated" means
    pub token: Option<String>,
    /// Message from the last failed auth action
    pub error: Option<String>,
}

impl SessionState {
    /// True if and only if a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

type Listener = Rc<dyn Fn(&SessionState)>;

/// Shared session handle backed by persistent storage.
#[derive(Clone)]
pub struct Session {
    state: Rc<RefCell<SessionState>>,
    storage: Rc<dyn KeyValueStore>,
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Session")
            .field("authenticated", &state.is_authenticated())
            .field("user", &state.user)
            .field("error", &state.error)
            .finish()
    }
}

impl Session {
    /// Restores the session persisted in `storage`.
    ///
    /// This should be called once at app start. An empty storage yields an
    /// anonymous session. A stored user that is not a JSON object, or a JWT
    /// token that has already expired, is removed from storage as well.
    pub fn restore(storage: Rc<dyn KeyValueStore>) -> Self {
        tracing::trace!("Restoring session from storage");

        let token = match storage.get_item(TOKEN_KEY).filter(|t| !t.is_empty()) {
            Some(token) if token_is_expired(&token) => {
                tracing::warn!("Stored access token has expired, clearing");
                storage.remove_item(TOKEN_KEY);
                None
            }
            token => token,
        };

        let user = storage.get_item(USER_KEY).and_then(|raw| {
            match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Stored user record is unreadable ({}), clearing", e);
                    storage.remove_item(USER_KEY);
                    None
                }
            }
        });

        tracing::trace!(
            "Session restored: authenticated={}, user={}",
            token.is_some(),
            user.is_some()
        );

        Self {
            state: Rc::new(RefCell::new(SessionState {
                user,
                token,
                error: None,
            })),
            storage,
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Registers `listener` to be called with the new state after each change.
    pub fn subscribe(&self, listener: impl Fn(&SessionState) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn notify(&self) {
        // Listeners may read the session or subscribe again.
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        if listeners.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Sets or clears the access token, in memory and storage.
    ///
    /// An empty string clears, like `None`.
    pub fn set_token(&self, token: Option<String>) {
        let token = token.filter(|t| !t.is_empty());

        match &token {
            Some(value) => self.storage.set_item(TOKEN_KEY, value),
            None => self.storage.remove_item(TOKEN_KEY),
        }
        self.state.borrow_mut().token = token;
        self.notify();
    }

    /// Sets or clears the user record, in memory and storage.
    pub fn set_user(&self, user: Option<User>) {
        match &user {
            Some(record) => match serde_json::to_string(record) {
                Ok(json) => self.storage.set_item(USER_KEY, &json),
                Err(e) => {
                    // Keep storage consistent with memory even if this ever fails.
                    tracing::error!("Failed to serialize user record: {}", e);
                    self.storage.remove_item(USER_KEY);
                }
            },
            None => self.storage.remove_item(USER_KEY),
        }
        self.state.borrow_mut().user = user;
        self.notify();
    }

    /// Sets or clears the displayed error message.
    pub fn set_error(&self, error: Option<String>) {
        self.state.borrow_mut().error = error;
        self.notify();
    }

    /// Ends the session: token, user and error cleared, storage keys removed.
    pub fn clear(&self) {
        tracing::trace!("Clearing session");
        self.set_token(None);
        self.set_user(None);
        self.set_error(None);
    }

    /// Drops the credentials after the server rejected them (HTTP 401).
    ///
    /// Token and user are cleared; `error` is left for the current view.
    /// Calling it on an anonymous session is a no-op.
    pub fn expire(&self) {
        if self.is_authenticated() {
            tracing::warn!("Session expired, clearing credentials");
        }
        self.set_token(None);
        self.set_user(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::jwt::current_timestamp;
    use crate::client::jwt::tests::create_test_jwt;
    use crate::client::storage::MemoryStorage;
    use serde_json::json;

    fn user(value: serde_json::Value) -> User {
        User::from_value(value).unwrap()
    }

    fn session_with(storage: &MemoryStorage) -> Session {
        Session::restore(Rc::new(storage.clone()))
    }

    #[test]
    fn test_restore_empty_storage() {
        let storage = MemoryStorage::new();
        let session = session_with(&storage);

        assert_eq!(session.snapshot(), SessionState::default());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_restore_persisted_session() {
        let storage = MemoryStorage::new();
        storage.set_item(TOKEN_KEY, "T1");
        storage.set_item(USER_KEY, r#"{"id":1,"email":"a@b.com"}"#);

        let session = session_with(&storage);

        assert_eq!(session.token().as_deref(), Some("T1"));
        assert_eq!(session.user(), Some(user(json!({"id": 1, "email": "a@b.com"}))));
        assert!(session.error().is_none());
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_restore_drops_corrupt_user() {
        let storage = MemoryStorage::new();
        storage.set_item(TOKEN_KEY, "T1");
        storage.set_item(USER_KEY, "{not json");

        let session = session_with(&storage);

        assert!(session.user().is_none());
        assert!(storage.get_item(USER_KEY).is_none());
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_restore_treats_empty_token_as_absent() {
        let storage = MemoryStorage::new();
        storage.set_item(TOKEN_KEY, "");

        let session = session_with(&storage);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_restore_drops_expired_jwt() {
        let storage = MemoryStorage::new();
        storage.set_item(TOKEN_KEY, &create_test_jwt(r#"{"exp":1}"#));

        let session = session_with(&storage);

        assert!(!session.is_authenticated());
        assert!(storage.get_item(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_restore_keeps_live_jwt() {
        let token = create_test_jwt(&format!(r#"{{"exp":{}}}"#, current_timestamp() + 600));
        let storage = MemoryStorage::new();
        storage.set_item(TOKEN_KEY, &token);

        let session = session_with(&storage);
        assert_eq!(session.token(), Some(token));
    }

    #[test]
    fn test_set_token_writes_through() {
        let storage = MemoryStorage::new();
        let session = session_with(&storage);

        session.set_token(Some("T1".to_string()));
        assert_eq!(storage.get_item(TOKEN_KEY).as_deref(), Some("T1"));
        assert!(session.is_authenticated());

        session.set_token(None);
        assert!(storage.get_item(TOKEN_KEY).is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_set_empty_token_clears() {
        let storage = MemoryStorage::new();
        let session = session_with(&storage);
        session.set_token(Some("T1".to_string()));

        session.set_token(Some(String::new()));

        assert!(session.token().is_none());
        assert!(storage.get_item(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_user_round_trips_through_storage() {
        let storage = MemoryStorage::new();
        let record = user(json!({"id": 1, "photos": [], "phone": null}));

        session_with(&storage).set_user(Some(record.clone()));
        let restored = session_with(&storage);

        assert_eq!(restored.user(), Some(record));
    }

    #[test]
    fn test_token_round_trips_through_storage() {
        let storage = MemoryStorage::new();
        session_with(&storage).set_token(Some("T1".to_string()));

        assert_eq!(session_with(&storage).token().as_deref(), Some("T1"));
    }

    #[test]
    fn test_error_is_not_persisted() {
        let storage = MemoryStorage::new();
        let session = session_with(&storage);

        session.set_error(Some("bad creds".to_string()));

        assert_eq!(session.error().as_deref(), Some("bad creds"));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_clear() {
        let storage = MemoryStorage::new();
        let session = session_with(&storage);
        session.set_token(Some("T1".to_string()));
        session.set_user(Some(user(json!({"id": 1}))));
        session.set_error(Some("old".to_string()));

        session.clear();

        assert_eq!(session.snapshot(), SessionState::default());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_expire_keeps_error() {
        let storage = MemoryStorage::new();
        let session = session_with(&storage);
        session.set_token(Some("T1".to_string()));
        session.set_user(Some(user(json!({"id": 1}))));
        session.set_error(Some("shown".to_string()));

        session.expire();
        session.expire();

        assert!(session.token().is_none());
        assert!(session.user().is_none());
        assert_eq!(session.error().as_deref(), Some("shown"));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let storage = MemoryStorage::new();
        let session = session_with(&storage);
        let other = session.clone();

        session.set_token(Some("T1".to_string()));
        assert!(other.is_authenticated());
    }

    #[test]
    fn test_authenticated_iff_token() {
        let mut state = SessionState::default();
        assert!(!state.is_authenticated());

        state.user = Some(user(json!({"id": 1})));
        assert!(!state.is_authenticated());

        state.token = Some("T1".to_string());
        assert!(state.is_authenticated());
    }

    #[test]
    fn test_listeners_see_every_change() {
        let storage = MemoryStorage::new();
        let session = session_with(&storage);
        let seen = Rc::new(RefCell::new(Vec::new()));
        session.subscribe({
            let seen = seen.clone();
            move |state: &SessionState| seen.borrow_mut().push(state.is_authenticated())
        });

        session.set_token(Some("T1".to_string()));
        session.expire();

        assert_eq!(*seen.borrow(), vec![true, false, false]);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_listener_may_read_session() {
        let storage = MemoryStorage::new();
        let session = session_with(&storage);
        let tokens = Rc::new(RefCell::new(Vec::new()));
        session.subscribe({
            let tokens = tokens.clone();
            let session = session.clone();
            move |_: &SessionState| tokens.borrow_mut().push(session.token())
        });

        session.set_token(Some("T1".to_string()));

        assert_eq!(*tokens.borrow(), vec![Some("T1".to_string())]);
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let storage = MemoryStorage::new();
        let session = session_with(&storage);
        session.set_token(Some("secret-token".to_string()));

        assert!(!format!("{:?}", session).contains("secret-token"));
    }
}
