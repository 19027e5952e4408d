//! # dogsitter-client
//!
//! Browser-side plumbing for the dog-sitter booking web client: the session,
//! the API client and the page guard.
//!
//! ## Overview
//!
//! - **Shared types** (`ApiConfig`, `User`, `ClientError`)
//! - **Session** - current user, access token and last error, mirrored into
//!   `localStorage` on every change
//! - **API client** - one wrapper for every request: JSON headers, bearer
//!   token, and a forced return to `/login` when the server answers 401
//! - **Auth actions** - `login`, `register`, `logout`
//! - **Router** - route table plus the guard that keeps anonymous users out of
//!   protected pages and authenticated users out of `/login` and `/register`
//! - **Hooks** - `use_session_provider` / `use_session` for Dioxus components
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use dogsitter_client::ApiConfig;
//! use dogsitter_client::client::{
//!     ApiClient, AuthService, BrowserNavigator, BrowserStorage, LoginCredentials, Session,
//! };
//!
//! let session = Session::restore(Rc::new(BrowserStorage));
//! let client = ApiClient::new(ApiConfig::from_env_or_local(), session, Rc::new(BrowserNavigator));
//! let auth = AuthService::new(client.clone());
//!
//! auth.login(&LoginCredentials::new("a@b.com", "secret")).await?;
//! let sitters: serde_json::Value = client.get_json("dogsitters/").await?;
//! ```
//!
//! ## Platform Compatibility
//!
//! Browser storage and navigation exist only on `wasm32`. Elsewhere
//! `BrowserStorage` and `BrowserNavigator` are inert, and the defaults used by
//! the hooks fall back to `MemoryStorage` and `MemoryNavigator`, which is what
//! the tests run against.

pub mod client;
pub mod config;
pub mod error;
pub mod user;

pub use config::{ApiConfig, Messages};
pub use error::ClientError;
pub use user::User;
