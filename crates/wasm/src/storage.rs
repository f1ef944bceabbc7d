//! Browser storage, location and configuration helpers

use divergence_core::normalize::deep_merge;
use divergence_core::{ClientConfig, DivergenceError, Result, SessionProvider};
use gloo_storage::{LocalStorage, Storage};
use tracing::{debug, warn};
use wasm_bindgen::JsValue;

/// Runtime override for [`ClientConfig`], a JSON object
pub const CONFIG_KEY: &str = "divergence_config";

// ============================================================================
// Session storage
// ============================================================================

/// `localStorage`, unencoded so keys stay readable by other scripts
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageSession;

impl SessionProvider for LocalStorageSession {
    fn read(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| DivergenceError::Storage(format!("{:?}", e)))
    }

    fn clear(&self, key: &str) {
        let _ = LocalStorage::raw().remove_item(key);
    }
}

// ============================================================================
// Location
// ============================================================================

pub fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

pub fn current_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// Change the address bar without reloading the page
pub fn push_history(path: &str) {
    let pushed = web_sys::window()
        .and_then(|w| w.history().ok())
        .map(|h| h.push_state_with_url(&JsValue::NULL, "", Some(path)));
    if !matches!(pushed, Some(Ok(()))) {
        warn!("Could not push history entry for {}", path);
    }
}

/// Swap the current entry, dropping its query string
pub fn replace_history(path: &str) {
    let replaced = web_sys::window()
        .and_then(|w| w.history().ok())
        .map(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(path)));
    if !matches!(replaced, Some(Ok(()))) {
        warn!("Could not replace history entry with {}", path);
    }
}

/// Leave the app (OAuth redirect)
pub fn redirect(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(url) {
            warn!("Redirect to {} failed: {:?}", url, e);
        }
    }
}

pub fn open_in_new_tab(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.open_with_url_and_target(url, "_blank");
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Defaults, then the build-time `DIVERGENCE_API_URL`, then the stored override
pub fn load_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    if let Some(url) = option_env!("DIVERGENCE_API_URL").filter(|u| !u.is_empty()) {
        config = config.with_base_url(url);
    }

    let stored = LocalStorage::raw().get_item(CONFIG_KEY).ok().flatten();
    if let Some(json) = stored {
        match apply_override(&config, &json) {
            Ok(merged) => {
                debug!("Using stored client config");
                config = merged;
            }
            Err(e) => warn!("Ignoring stored client config: {}", e),
        }
    }
    config
}

fn apply_override(config: &ClientConfig, json: &str) -> Result<ClientConfig> {
    let overrides: serde_json::Value = serde_json::from_str(json)?;
    let mut merged = serde_json::to_value(config)?;
    deep_merge(&mut merged, overrides);
    ClientConfig::from_json(&merged.to_string())
}
