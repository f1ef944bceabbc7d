//! One-shot dashboard load: filtered data, then translated data

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{DivergenceError, Result};
use crate::models::{TranslatedData, UserData};
use crate::normalize::{normalize_translated_data, normalize_user_data};
use crate::session::{AuthStore, Navigator, SessionProvider};

/// Data endpoints. Status codes other than 200 come back as
/// [`DivergenceError::Unauthorized`], [`DivergenceError::NotReady`] or
/// [`DivergenceError::Http`].
#[async_trait(?Send)]
pub trait DashboardApi {
    async fn fetch_filtered_data(&self) -> Result<Value>;

    async fn fetch_translated_data(&self) -> Result<Value>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardLoad {
    Loaded {
        user_data: UserData,
        translated: Option<TranslatedData>,
    },
    /// Backend has nothing for this user yet
    NoData { translated: Option<TranslatedData> },
    /// Token was rejected; the session has been cleared
    SignedOut,
    /// Request failed; callers keep whatever they already show
    Failed { message: String },
}

pub async fn load_dashboard<A, P, N>(api: &A, store: &AuthStore<P>, navigator: &N) -> DashboardLoad
where
    A: DashboardApi + ?Sized,
    P: SessionProvider,
    N: Navigator + ?Sized,
{
    let user_data = match api.fetch_filtered_data().await {
        Ok(raw) => Some(normalize_user_data(Some(&raw))),
        Err(DivergenceError::Unauthorized) => {
            warn!("Token rejected, signing out");
            store.sign_out(navigator);
            return DashboardLoad::SignedOut;
        }
        Err(DivergenceError::NotReady) => {
            debug!("No filtered data yet");
            None
        }
        Err(e) => {
            warn!("Failed to load dashboard data: {}", e);
            return DashboardLoad::Failed { message: e.to_string() };
        }
    };

    let translated = match api.fetch_translated_data().await {
        Ok(raw) => Some(normalize_translated_data(Some(&raw))),
        Err(e) => {
            debug!("Translated data not available: {}", e);
            None
        }
    };

    match user_data {
        Some(user_data) => DashboardLoad::Loaded { user_data, translated },
        None => DashboardLoad::NoData { translated },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySession;
    use serde_json::json;
    use std::cell::{Cell, RefCell};

    struct FakeApi {
        filtered: Result<Value>,
        translated: Result<Value>,
        translated_calls: Cell<u32>,
    }

    impl FakeApi {
        fn new(filtered: Result<Value>, translated: Result<Value>) -> Self {
            Self { filtered, translated, translated_calls: Cell::new(0) }
        }
    }

    #[async_trait(?Send)]
    impl DashboardApi for FakeApi {
        async fn fetch_filtered_data(&self) -> Result<Value> {
            self.filtered.clone()
        }

        async fn fetch_translated_data(&self) -> Result<Value> {
            self.translated_calls.set(self.translated_calls.get() + 1);
            self.translated.clone()
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        visited: RefCell<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str) {
            self.visited.borrow_mut().push(path.to_string());
        }
    }

    fn signed_in_store() -> AuthStore<MemorySession> {
        let store = AuthStore::new(MemorySession::new());
        store.set_auth_state("octocat", "tok", Some("1")).unwrap();
        store
    }

    #[tokio::test]
    async fn unauthorized_clears_session_and_redirects() {
        let api = FakeApi::new(Err(DivergenceError::Unauthorized), Ok(json!({})));
        let store = signed_in_store();
        let nav = RecordingNavigator::default();

        let load = load_dashboard(&api, &store, &nav).await;

        assert_eq!(load, DashboardLoad::SignedOut);
        assert!(!store.get_auth_state().is_authenticated);
        assert_eq!(*nav.visited.borrow(), vec!["/".to_string()]);
        assert_eq!(api.translated_calls.get(), 0);
    }

    #[tokio::test]
    async fn loads_both_datasets() {
        let api = FakeApi::new(
            Ok(json!({ "profile": { "username": "octocat" } })),
            Ok(json!({ "languages": { "Rust": 100.0 } })),
        );
        let store = signed_in_store();

        let load = load_dashboard(&api, &store, &RecordingNavigator::default()).await;

        let DashboardLoad::Loaded { user_data, translated } = load else {
            panic!("expected data, got {:?}", load);
        };
        assert_eq!(user_data.profile.username, "octocat");
        assert_eq!(translated.unwrap().languages.len(), 1);
        assert!(store.get_auth_state().is_authenticated);
    }

    #[tokio::test]
    async fn missing_translation_is_not_fatal() {
        let api = FakeApi::new(
            Ok(json!({})),
            Err(DivergenceError::Http { status: 500, body: String::new() }),
        );
        let load = load_dashboard(&api, &signed_in_store(), &RecordingNavigator::default()).await;
        assert!(matches!(load, DashboardLoad::Loaded { translated: None, .. }));
    }

    #[tokio::test]
    async fn not_ready_reports_no_data() {
        let api = FakeApi::new(Err(DivergenceError::NotReady), Err(DivergenceError::NotReady));
        let load = load_dashboard(&api, &signed_in_store(), &RecordingNavigator::default()).await;
        assert_eq!(load, DashboardLoad::NoData { translated: None });
    }

    #[tokio::test]
    async fn network_failure_keeps_session() {
        let api = FakeApi::new(Err(DivergenceError::Network("offline".to_string())), Ok(json!({})));
        let store = signed_in_store();
        let nav = RecordingNavigator::default();

        let load = load_dashboard(&api, &store, &nav).await;

        assert!(matches!(load, DashboardLoad::Failed { .. }));
        assert!(store.get_auth_state().is_authenticated);
        assert!(nav.visited.borrow().is_empty());
    }
}
