//! Client-side session, routing and API access.
//!
//! This module provides:
//! - Persistent key-value storage for the session (`localStorage` in the browser)
//! - The session object shared by everything below
//! - An HTTP client that injects the bearer token and handles expired sessions
//! - Login, registration and logout actions
//! - The route table and navigation guard
//! - Dioxus hooks exposing all of it to components
//!
//! # Example
//!
//! ```rust,ignore
//! use dogsitter_client::ApiConfig;
//! use dogsitter_client::client::{use_session_provider, use_session, LoginCredentials};
//!
//! #[component]
//! fn App() -> Element {
//!     use_session_provider(ApiConfig::from_env_or_local());
//!     // ... router and pages
//! }
//!
//! #[component]
//! fn LoginPage() -> Element {
//!     let session = use_session();
//!     // spawn(async move { session.login(LoginCredentials::new(email, password)).await });
//! }
//! ```

pub mod auth;
pub mod http_client;
pub mod jwt;
pub mod navigation;
pub mod router;
pub mod session;
pub mod storage;
pub mod use_session;

// Re-export commonly used types and functions
pub use auth::{AuthService, LoginCredentials, Registration};
pub use http_client::ApiClient;
pub use jwt::{AccessTokenClaims, decode_access_token};
pub use navigation::{BrowserNavigator, MemoryNavigator, Navigator};
pub use router::{Navigation, Page, ResolvedRoute, RouteTable, Router, guard};
pub use session::{Session, SessionState};
pub use storage::{BrowserStorage, KeyValueStore, MemoryStorage};
pub use use_session::{SessionContext, use_session, use_session_provider};
