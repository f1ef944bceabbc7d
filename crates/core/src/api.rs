//! Backend HTTP contract: paths, status interpretation, request/response bodies

use serde::{Deserialize, Serialize};

use crate::error::DivergenceError;

// ============================================================================
// Endpoints
// ============================================================================

/// Browser redirect target that starts the GitHub OAuth flow
pub fn github_login_url(base: &str) -> String {
    format!("{}/auth/github", base)
}

pub fn filtered_data_url(base: &str, username: &str, user_id: Option<&str>) -> String {
    format!(
        "{}/get-filtered-data/{}?user_id={}",
        base,
        urlencoding::encode(username),
        urlencoding::encode(user_id.unwrap_or_default())
    )
}

pub fn translated_data_url(base: &str, username: &str, user_id: Option<&str>) -> String {
    format!(
        "{}/get-translated-data/{}?user_id={}",
        base,
        urlencoding::encode(username),
        urlencoding::encode(user_id.unwrap_or_default())
    )
}

pub fn project_chat_url(base: &str, project_id: &str) -> String {
    format!("{}/api/projects/{}/chat", base, urlencoding::encode(project_id))
}

pub fn create_ai_context_url(base: &str) -> String {
    format!("{}/api/projects/create-ai-context", base)
}

pub fn continue_scoping_url(base: &str) -> String {
    format!("{}/api/projects/continue-scoping", base)
}

pub fn generate_breakdown_url(base: &str, project_id: &str) -> String {
    format!(
        "{}/api/projects/{}/generate-breakdown",
        base,
        urlencoding::encode(project_id)
    )
}

// ============================================================================
// Status interpretation
// ============================================================================

/// What a data endpoint's status code means to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// 200: body holds the data
    Ready,
    /// 401: token rejected, session must be dropped
    Unauthorized,
    /// 404: backend is still processing
    NotReady,
    /// Anything else
    Other(u16),
}

impl ResponseClass {
    pub fn from_status(status: u16) -> Self {
        match status {
            200 => ResponseClass::Ready,
            401 => ResponseClass::Unauthorized,
            404 => ResponseClass::NotReady,
            other => ResponseClass::Other(other),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ResponseClass::Ready)
    }

    /// Error for any class other than `Ready`
    pub fn into_error(self, body: String) -> Option<DivergenceError> {
        match self {
            ResponseClass::Ready => None,
            ResponseClass::Unauthorized => Some(DivergenceError::Unauthorized),
            ResponseClass::NotReady => Some(DivergenceError::NotReady),
            ResponseClass::Other(status) => Some(DivergenceError::Http { status, body }),
        }
    }
}

// ============================================================================
// Project scoping bodies
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ProjectChatRequest {
    pub message: String,
    pub session_id: Option<String>,
}

/// Reply from `POST /api/projects/{id}/chat`. Older servers send `question`
/// instead of `message`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectChatResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ProjectChatResponse {
    pub fn text(&self) -> Option<&str> {
        self.message.as_deref().or(self.question.as_deref())
    }
}

/// Project descriptor sent to start an AI scoping thread
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDescriptor {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub goals: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateContextResponse {
    pub thread_id: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContinueScopingRequest {
    pub thread_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContinueScopingResponse {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub complete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classes() {
        assert_eq!(ResponseClass::from_status(200), ResponseClass::Ready);
        assert_eq!(ResponseClass::from_status(401), ResponseClass::Unauthorized);
        assert_eq!(ResponseClass::from_status(404), ResponseClass::NotReady);
        assert_eq!(ResponseClass::from_status(500), ResponseClass::Other(500));
        assert_eq!(
            ResponseClass::from_status(401).into_error(String::new()),
            Some(DivergenceError::Unauthorized)
        );
        assert_eq!(ResponseClass::Ready.into_error(String::new()), None);
    }

    #[test]
    fn data_urls_escape_path_and_query() {
        assert_eq!(
            filtered_data_url("http://localhost:8000", "octo cat", Some("42")),
            "http://localhost:8000/get-filtered-data/octo%20cat?user_id=42"
        );
        assert_eq!(
            translated_data_url("http://localhost:8000", "octocat", None),
            "http://localhost:8000/get-translated-data/octocat?user_id="
        );
    }

    #[test]
    fn chat_reply_accepts_question_field() {
        let reply: ProjectChatResponse = serde_json::from_str(
            r#"{"question": "Which database?", "confidence": 0.4, "complete": false}"#,
        )
        .unwrap();
        assert_eq!(reply.text(), Some("Which database?"));
        assert_eq!(reply.session_id, None);
    }

    #[test]
    fn chat_reply_prefers_message() {
        let reply: ProjectChatResponse = serde_json::from_str(
            r#"{"message": "Got it", "question": "ignored", "confidence": 0.9, "complete": true, "session_id": "s1"}"#,
        )
        .unwrap();
        assert_eq!(reply.text(), Some("Got it"));
        assert!(reply.complete);
    }
}
