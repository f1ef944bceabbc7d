//! Client-held authentication state
//!
//! The token, username and user id live in a key/value store owned by the
//! platform (browser `localStorage` on the web). [`AuthStore`] is the only
//! code that knows the key names.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const TOKEN_KEY: &str = "auth_token";
pub const USERNAME_KEY: &str = "username";
pub const USER_ID_KEY: &str = "user_id";

/// Snapshot of the current session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub username: Option<String>,
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub is_authenticated: bool,
}

/// Key/value storage backing the session
pub trait SessionProvider {
    fn read(&self, key: &str) -> Option<String>;

    fn write(&self, key: &str, value: &str) -> Result<()>;

    fn clear(&self, key: &str);
}

/// Session storage that lives only as long as the value itself
#[derive(Debug, Default)]
pub struct MemorySession {
    values: RefCell<HashMap<String, String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl SessionProvider for MemorySession {
    fn read(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

/// Page navigation, owned by the platform
pub trait Navigator {
    fn navigate(&self, path: &str);
}

/// Auth operations over any [`SessionProvider`]
#[derive(Debug, Clone)]
pub struct AuthStore<P: SessionProvider> {
    provider: P,
}

impl<P: SessionProvider> AuthStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Persist a new session. Without a user id any previously stored id is removed.
    pub fn set_auth_state(&self, username: &str, token: &str, user_id: Option<&str>) -> Result<()> {
        self.provider.write(USERNAME_KEY, username)?;
        self.provider.write(TOKEN_KEY, token)?;
        match user_id {
            Some(id) => self.provider.write(USER_ID_KEY, id)?,
            None => self.provider.clear(USER_ID_KEY),
        }
        tracing::info!("Stored session for {}", username);
        Ok(())
    }

    pub fn get_auth_state(&self) -> AuthState {
        let read = |key| self.provider.read(key).filter(|v: &String| !v.is_empty());
        let token = read(TOKEN_KEY);
        AuthState {
            username: read(USERNAME_KEY),
            is_authenticated: token.is_some(),
            token,
            user_id: read(USER_ID_KEY),
        }
    }

    pub fn clear_auth_state(&self) {
        self.provider.clear(TOKEN_KEY);
        self.provider.clear(USERNAME_KEY);
        self.provider.clear(USER_ID_KEY);
        tracing::info!("Session cleared");
    }

    /// Drop the session and send the user back to the landing page
    pub fn sign_out<N: Navigator + ?Sized>(&self, navigator: &N) {
        self.clear_auth_state();
        navigator.navigate(crate::routes::LANDING_PATH);
    }

    /// `("Authorization", "Bearer <token>")`, or `None` without a token
    pub fn auth_header(&self) -> Option<(&'static str, String)> {
        self.get_auth_state()
            .token
            .map(|token| ("Authorization", format!("Bearer {}", token)))
    }
}
