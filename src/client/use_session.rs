//! Dioxus hooks exposing the session to the component tree.
//!
//! `use_session_provider` is called once at the root; it restores the session
//! from storage, wires up the API client and auth actions, and mirrors the
//! session state into a signal so components re-render when it changes.
//! The signal follows every session change, including a 401 seen by any
//! request made through [`SessionContext::api`].

use crate::client::auth::{AuthService, LoginCredentials, Registration};
use crate::client::http_client::ApiClient;
use crate::client::navigation::default_navigator;
use crate::client::router::{Navigation, RouteTable};
use crate::client::session::{Session, SessionState};
use crate::client::storage::default_storage;
use crate::{ApiConfig, ClientError, User};
use dioxus::prelude::*;

/// Provides the session context to the component tree.
///
/// This hook must be called once at the root of your application (e.g., in `App`).
///
/// # Example
///
/// ```ignore
/// #[component]
/// pub fn App() -> Element {
///     use_session_provider(ApiConfig::from_env_or_local());
///     // ... rest of app
/// }
/// ```
pub fn use_session_provider(config: ApiConfig) -> SessionContext {
    let auth = use_hook(move || {
        let session = Session::restore(default_storage());
        AuthService::new(ApiClient::new(config, session, default_navigator()))
    });

    let state = use_signal({
        let session = auth.session().clone();
        move || session.snapshot()
    });

    use_hook({
        let session = auth.session().clone();
        move || {
            session.subscribe(move |snapshot: &SessionState| {
                let mut state = state;
                match state.try_write() {
                    Ok(mut current) => *current = snapshot.clone(),
                    Err(e) => tracing::warn!("Session signal not updated: {:?}", e),
                }
            })
        }
    });

    use_context_provider(move || SessionContext {
        auth,
        state,
        routes: RouteTable::default(),
    })
}

/// Returns the session context set up by [`use_session_provider`].
///
/// # Panics
///
/// Panics if no ancestor component called `use_session_provider()`.
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}

/// Session state and auth actions for components.
#[derive(Clone)]
pub struct SessionContext {
    auth: AuthService,
    state: Signal<SessionState>,
    routes: RouteTable,
}

impl SessionContext {
    /// Current session state. Reading it subscribes the component.
    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Client for resource calls made by views.
    pub fn api(&self) -> &ApiClient {
        self.auth.client()
    }

    /// Guard decision for navigating to `path`, taken on the live session.
    pub fn check(&self, path: &str) -> Navigation {
        self.routes.check(path, self.auth.session().is_authenticated())
    }

    pub async fn login(&self, credentials: LoginCredentials) -> Result<(), ClientError> {
        self.auth.login(&credentials).await
    }

    pub async fn register(&self, registration: Registration) -> Result<(), ClientError> {
        self.auth.register(&registration).await
    }

    pub fn logout(&self) {
        self.auth.logout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::router::LOGIN_PATH;
    use std::cell::RefCell;

    thread_local! {
        static SEEN: RefCell<Vec<(bool, Navigation)>> = const { RefCell::new(Vec::new()) };
        static CONTEXT: RefCell<Option<SessionContext>> = const { RefCell::new(None) };
    }

    fn provider() -> Element {
        let session = use_session_provider(ApiConfig::local());
        CONTEXT.with(|context| *context.borrow_mut() = Some(session));
        rsx! {}
    }

    fn mounted() -> (VirtualDom, SessionContext) {
        let mut dom = VirtualDom::new(provider);
        dom.rebuild_in_place();
        let session = CONTEXT
            .with(|context| context.borrow().clone())
            .expect("provider did not render");
        (dom, session)
    }

    #[component]
    fn Child() -> Element {
        let session = use_session();
        SEEN.with(|seen| {
            seen.borrow_mut()
                .push((session.is_authenticated(), session.check("/bookings")))
        });
        rsx! {}
    }

    fn app() -> Element {
        let session = use_session_provider(ApiConfig::local());
        SEEN.with(|seen| {
            seen.borrow_mut()
                .push((session.is_authenticated(), session.check(LOGIN_PATH)))
        });
        rsx! {
            Child {}
        }
    }

    #[test]
    fn test_provider_and_child_share_anonymous_session() {
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();

        let seen = SEEN.with(|seen| seen.borrow().clone());
        assert_eq!(
            seen,
            vec![
                (false, Navigation::Allow),
                (false, Navigation::Redirect(LOGIN_PATH)),
            ]
        );
    }

    #[test]
    fn test_state_follows_expired_session() {
        let (dom, session) = mounted();

        dom.in_runtime(|| {
            session.api().session().set_token(Some("T1".to_string()));
            assert!(session.is_authenticated());
            assert_eq!(session.check("/bookings"), Navigation::Allow);

            session.api().handle_unauthorized();

            assert!(!session.api().session().is_authenticated());
            assert!(!session.is_authenticated());
            assert_eq!(session.check("/bookings"), Navigation::Redirect(LOGIN_PATH));
            assert_eq!(session.state(), SessionState::default());
        });
    }

    #[test]
    fn test_logout_resets_state() {
        let (dom, session) = mounted();

        dom.in_runtime(|| {
            let live = session.api().session();
            live.set_token(Some("T1".to_string()));
            live.set_user(User::from_value(serde_json::json!({"id": 1})));
            live.set_error(Some("old".to_string()));
            assert_eq!(session.user(), User::from_value(serde_json::json!({"id": 1})));
            assert_eq!(session.error().as_deref(), Some("old"));

            session.logout();

            assert_eq!(session.state(), SessionState::default());
            assert_eq!(session.check(LOGIN_PATH), Navigation::Allow);
        });
    }
}
