//! Shared fixtures for integration tests.

#![allow(dead_code)]

use dogsitter_client::ApiConfig;
use dogsitter_client::client::{
    ApiClient, AuthService, KeyValueStore, MemoryNavigator, MemoryStorage, Session,
};
use std::rc::Rc;
use wiremock::MockServer;

/// A client wired to a mock API, with handles to inspect its side effects.
pub struct TestClient {
    pub server: MockServer,
    pub storage: MemoryStorage,
    pub navigator: MemoryNavigator,
    pub client: ApiClient,
    pub auth: AuthService,
}

impl TestClient {
    pub async fn start() -> Self {
        Self::start_with(MemoryStorage::new()).await
    }

    /// Starts with `storage` as the persisted state at app start.
    pub async fn start_with(storage: MemoryStorage) -> Self {
        let server = MockServer::start().await;
        let config = ApiConfig::new(
            format!("{}/api", server.uri()),
            format!("{}/media", server.uri()),
        );
        let navigator = MemoryNavigator::new();
        let session = Session::restore(Rc::new(storage.clone()));
        let client = ApiClient::new(config, session, Rc::new(navigator.clone()));
        let auth = AuthService::new(client.clone());

        Self {
            server,
            storage,
            navigator,
            client,
            auth,
        }
    }

    /// Starts with a persisted, authenticated session holding `token`.
    pub async fn authenticated(token: &str) -> Self {
        let storage = MemoryStorage::new();
        storage.set_item("token", token);
        storage.set_item("user", r#"{"id":1}"#);
        Self::start_with(storage).await
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }
}
