//! HTTP client for the backend REST API
//!
//! Uses gloo-net for browser fetch API

use std::time::Duration;

use async_trait::async_trait;
use divergence_core::polling::Sleeper;
use divergence_core::{
    continue_scoping_url, create_ai_context_url, filtered_data_url, generate_breakdown_url,
    project_chat_url, translated_data_url, AuthStore, ContinueScopingRequest,
    ContinueScopingResponse, CreateContextResponse, DashboardApi, DivergenceError,
    ProjectChatRequest, ProjectChatResponse, ProjectDescriptor, ResponseClass, Result,
};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::storage::LocalStorageSession;

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    store: AuthStore<LocalStorageSession>,
}

impl ApiClient {
    pub fn new(base_url: &str, store: AuthStore<LocalStorageSession>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    pub fn store(&self) -> &AuthStore<LocalStorageSession> {
        &self.store
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.store.auth_header() {
            Some((name, value)) => builder.header(name, &value),
            None => builder,
        }
    }

    fn user_urls(&self) -> Result<(String, String)> {
        let state = self.store.get_auth_state();
        let username = state.username.ok_or(DivergenceError::NotAuthenticated)?;
        let user_id = state.user_id.as_deref();
        Ok((
            filtered_data_url(&self.base_url, &username, user_id),
            translated_data_url(&self.base_url, &username, user_id),
        ))
    }

    /// Status class of the filtered-data endpoint, body discarded
    pub async fn check_filtered_data(&self) -> Result<ResponseClass> {
        let (url, _) = self.user_urls()?;
        let response = self
            .authorized(Request::get(&url))
            .send()
            .await
            .map_err(|e| DivergenceError::Network(e.to_string()))?;
        Ok(ResponseClass::from_status(response.status()))
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);
        let response = self
            .authorized(Request::get(url))
            .send()
            .await
            .map_err(|e| DivergenceError::Network(e.to_string()))?;
        read_json(response).await
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(&self, url: &str, body: &B) -> Result<R> {
        debug!("POST {}", url);
        let response = self
            .authorized(Request::post(url))
            .json(body)
            .map_err(|e| DivergenceError::InvalidData(e.to_string()))?
            .send()
            .await
            .map_err(|e| DivergenceError::Network(e.to_string()))?;
        read_json(response).await
    }

    pub async fn project_chat(&self, project_id: &str, request: &ProjectChatRequest) -> Result<ProjectChatResponse> {
        self.post_json(&project_chat_url(&self.base_url, project_id), request).await
    }

    pub async fn create_ai_context(&self, project: &ProjectDescriptor) -> Result<CreateContextResponse> {
        self.post_json(&create_ai_context_url(&self.base_url), project).await
    }

    pub async fn continue_scoping(&self, request: &ContinueScopingRequest) -> Result<ContinueScopingResponse> {
        self.post_json(&continue_scoping_url(&self.base_url), request).await
    }

    /// Kick off server-side breakdown generation. The response body is ignored.
    pub async fn generate_breakdown(&self, project_id: &str) -> Result<()> {
        let url = generate_breakdown_url(&self.base_url, project_id);
        let response = self
            .authorized(Request::post(&url))
            .send()
            .await
            .map_err(|e| DivergenceError::Network(e.to_string()))?;
        if ResponseClass::from_status(response.status()).is_ready() {
            Ok(())
        } else {
            Err(status_error(&response).await)
        }
    }
}

async fn status_error(response: &Response) -> DivergenceError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ResponseClass::from_status(status)
        .into_error(body.clone())
        .unwrap_or(DivergenceError::Http { status, body })
}

async fn read_json<R: DeserializeOwned>(response: Response) -> Result<R> {
    if !ResponseClass::from_status(response.status()).is_ready() {
        return Err(status_error(&response).await);
    }
    response
        .json::<R>()
        .await
        .map_err(|e| DivergenceError::InvalidData(e.to_string()))
}

#[async_trait(?Send)]
impl DashboardApi for ApiClient {
    async fn fetch_filtered_data(&self) -> Result<Value> {
        let (url, _) = self.user_urls()?;
        self.get_json(&url).await
    }

    async fn fetch_translated_data(&self) -> Result<Value> {
        let (_, url) = self.user_urls()?;
        self.get_json(&url).await
    }
}

/// `setTimeout`-backed sleeper for the poll loop
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerSleeper;

#[async_trait(?Send)]
impl Sleeper for TimerSleeper {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
