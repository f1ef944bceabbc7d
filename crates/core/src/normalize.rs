//! Backend JSON -> view model
//!
//! The filtered-data endpoint has shipped two item layouts over time:
//!
//! - legacy: flat keys tagged with the list they belong to, e.g.
//!   `{"nameTop": "repo", "languageTop": "Rust", "languageColorTop": "#dea584"}`
//! - normalized: `{"name": "repo", "language": {"name": "Rust", "color": "#dea584"}}`
//!
//! The layout is detected once here and mapped to the normalized form. The
//! result is merged over the default dataset in [`crate::mock`] so every
//! field of the view model has a value.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::mock::{
    mock_translated_data, mock_translated_data_value, mock_user_data, mock_user_data_value,
};
use crate::models::{TranslatedData, UserData};

/// Item fields that carry a list suffix in the legacy layout
const LEGACY_FIELDS: &[&str] = &[
    "name",
    "description",
    "language",
    "languageColor",
    "stars",
    "size",
    "url",
    "updatedAt",
];

/// Lists that hold legacy items: (path, suffix)
const LEGACY_LISTS: &[(&[&str], &str)] = &[
    (&["projects", "top"], "Top"),
    (&["projects", "new"], "New"),
    (&["recentWorks"], "Recent"),
];

/// Translated-data sections keyed by names chosen by the backend. These
/// replace the defaults wholesale instead of merging key by key.
const NAMED_MAPS: &[&str] = &["skills", "languages", "frameworks", "libraries"];

// ============================================================================
// Shape detection
// ============================================================================

/// Filtered data as received, resolved to one of the known layouts
#[derive(Debug, Clone, PartialEq)]
pub enum RawUserData {
    /// Absent, `null`, or not a JSON object
    Missing,
    Legacy(Map<String, Value>),
    Normalized(Map<String, Value>),
}

impl RawUserData {
    pub fn detect(raw: Option<&Value>) -> Self {
        let Some(Value::Object(map)) = raw else {
            return RawUserData::Missing;
        };

        let legacy = LEGACY_LISTS.iter().any(|(path, suffix)| {
            list_at(map, path)
                .map(|items| items.iter().any(|item| is_legacy_item(item, suffix)))
                .unwrap_or(false)
        });

        if legacy {
            RawUserData::Legacy(map.clone())
        } else {
            RawUserData::Normalized(map.clone())
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RawUserData::Missing => "missing",
            RawUserData::Legacy(_) => "legacy",
            RawUserData::Normalized(_) => "normalized",
        }
    }

    /// The data in normalized layout, or `None` when nothing usable was sent
    pub fn into_normalized(self) -> Option<Map<String, Value>> {
        match self {
            RawUserData::Missing => None,
            RawUserData::Normalized(map) => Some(map),
            RawUserData::Legacy(mut map) => {
                for (path, suffix) in LEGACY_LISTS {
                    if let Some(items) = list_at_mut(&mut map, path) {
                        for item in items.iter_mut() {
                            if let Value::Object(fields) = item {
                                *fields = remap_legacy_item(std::mem::take(fields), suffix);
                            }
                        }
                    }
                }
                Some(map)
            }
        }
    }
}

fn list_at<'a>(map: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Vec<Value>> {
    let (last, parents) = path.split_last()?;
    let mut current = map;
    for key in parents {
        current = current.get(*key)?.as_object()?;
    }
    current.get(*last)?.as_array()
}

fn list_at_mut<'a>(map: &'a mut Map<String, Value>, path: &[&str]) -> Option<&'a mut Vec<Value>> {
    let (last, parents) = path.split_last()?;
    let mut current = map;
    for key in parents {
        current = current.get_mut(*key)?.as_object_mut()?;
    }
    current.get_mut(*last)?.as_array_mut()
}

fn is_legacy_item(item: &Value, suffix: &str) -> bool {
    item.as_object()
        .map(|fields| {
            fields.keys().any(|key| {
                key.strip_suffix(suffix)
                    .map(|field| LEGACY_FIELDS.contains(&field))
                    .unwrap_or(false)
            })
        })
        .unwrap_or(false)
}

fn remap_legacy_item(item: Map<String, Value>, suffix: &str) -> Map<String, Value> {
    let mut out = Map::new();
    let mut language = None;
    let mut color = None;

    for (key, value) in item {
        match key.strip_suffix(suffix) {
            Some("language") => language = Some(value),
            Some("languageColor") => color = Some(value),
            Some(field) if LEGACY_FIELDS.contains(&field) => {
                out.insert(field.to_string(), value);
            }
            // Untagged keys pass through unless a tagged key already set them
            _ => {
                out.entry(key).or_insert(value);
            }
        }
    }

    match language {
        Some(Value::String(name)) => {
            let mut tag = Map::new();
            tag.insert("name".to_string(), Value::String(name));
            if let Some(color @ Value::String(_)) = color {
                tag.insert("color".to_string(), color);
            }
            out.insert("language".to_string(), Value::Object(tag));
        }
        Some(other) => {
            out.insert("language".to_string(), other);
        }
        None => {}
    }

    out
}

// ============================================================================
// Merging
// ============================================================================

/// Recursively overlay `overlay` onto `base`. Objects merge key by key,
/// `null` keeps the base value, everything else (arrays included) replaces.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                if value.is_null() {
                    continue;
                }
                match base.get_mut(&key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (slot, value) => *slot = value,
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Shape backend filtered data into [`UserData`], filling gaps from the defaults
pub fn normalize_user_data(raw: Option<&Value>) -> UserData {
    let shape = RawUserData::detect(raw);
    debug!(shape = shape.label(), "normalizing user data");

    let Some(data) = shape.into_normalized() else {
        return mock_user_data();
    };

    let mut merged = mock_user_data_value();
    deep_merge(&mut merged, Value::Object(data));

    match serde_json::from_value(merged) {
        Ok(user_data) => user_data,
        Err(e) => {
            warn!("Filtered data did not match the dashboard model, using defaults: {}", e);
            mock_user_data()
        }
    }
}

/// Shape backend translated data into [`TranslatedData`], filling gaps from the defaults
pub fn normalize_translated_data(raw: Option<&Value>) -> TranslatedData {
    let Some(Value::Object(data)) = raw else {
        return mock_translated_data();
    };

    let mut merged = mock_translated_data_value();
    let mut rest = Map::new();
    for (key, value) in data.clone() {
        if NAMED_MAPS.contains(&key.as_str()) {
            if let (Some(slot), Some(map)) = (merged.get_mut(&key), named_map(&key, value)) {
                *slot = map;
            }
        } else {
            rest.insert(key, value);
        }
    }
    deep_merge(&mut merged, Value::Object(rest));

    match serde_json::from_value(merged) {
        Ok(translated) => translated,
        Err(e) => {
            warn!("Translated data did not match the profile model, using defaults: {}", e);
            mock_translated_data()
        }
    }
}

/// Accept a name-keyed section as either an object or a plain list of names.
/// Lists count each name once; a language list splits 100% evenly. An explicit
/// `null` means the backend found nothing, so the section is empty.
fn named_map(key: &str, value: Value) -> Option<Value> {
    match value {
        Value::Object(map) => Some(Value::Object(map)),
        Value::Null => Some(Value::Object(Map::new())),
        Value::Array(items) => {
            let names: Vec<String> = items
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect();
            let weight = if key == "languages" && !names.is_empty() {
                Value::from(100.0 / names.len() as f64)
            } else {
                Value::from(1)
            };
            let mut map = Map::new();
            for name in names {
                map.insert(name, weight.clone());
            }
            Some(Value::Object(map))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalized_input() -> Value {
        json!({
            "profile": { "name": "Octo Cat", "username": "octocat" },
            "statsHome": { "projects": 8, "totalRating": 3.5, "qualityLevel": "Good", "languages": 3 },
            "projects": {
                "top": [
                    {
                        "name": "spoon-knife",
                        "description": "Fork me",
                        "language": { "name": "HTML", "color": "#e34c26" },
                        "stars": 12,
                        "size": 300
                    },
                    {
                        "name": "hello-world",
                        "language": { "name": "Rust" },
                        "stars": 2,
                        "size": 40
                    }
                ],
                "new": [
                    { "name": "linguist", "language": { "name": "Ruby", "color": "#701516" }, "stars": 0, "size": 9 }
                ]
            },
            "recentWorks": [
                { "name": "spoon-knife", "description": "Typo fix", "updatedAt": "2024-01-02" }
            ]
        })
    }

    fn legacy_input() -> Value {
        json!({
            "profile": { "name": "Octo Cat", "username": "octocat" },
            "statsHome": { "projects": 8, "totalRating": 3.5, "qualityLevel": "Good", "languages": 3 },
            "projects": {
                "top": [
                    {
                        "nameTop": "spoon-knife",
                        "descriptionTop": "Fork me",
                        "languageTop": "HTML",
                        "languageColorTop": "#e34c26",
                        "starsTop": 12,
                        "sizeTop": 300
                    },
                    {
                        "nameTop": "hello-world",
                        "languageTop": "Rust",
                        "starsTop": 2,
                        "sizeTop": 40
                    }
                ],
                "new": [
                    { "nameNew": "linguist", "languageNew": "Ruby", "languageColorNew": "#701516", "starsNew": 0, "sizeNew": 9 }
                ]
            },
            "recentWorks": [
                { "nameRecent": "spoon-knife", "descriptionRecent": "Typo fix", "updatedAtRecent": "2024-01-02" }
            ]
        })
    }

    #[test]
    fn detects_layouts() {
        assert_eq!(RawUserData::detect(None), RawUserData::Missing);
        assert_eq!(RawUserData::detect(Some(&Value::Null)), RawUserData::Missing);
        assert_eq!(RawUserData::detect(Some(&json!([1, 2]))), RawUserData::Missing);
        assert!(matches!(RawUserData::detect(Some(&legacy_input())), RawUserData::Legacy(_)));
        assert!(matches!(
            RawUserData::detect(Some(&normalized_input())),
            RawUserData::Normalized(_)
        ));
    }

    #[test]
    fn legacy_and_normalized_layouts_produce_the_same_model() {
        let from_legacy = normalize_user_data(Some(&legacy_input()));
        let from_normalized = normalize_user_data(Some(&normalized_input()));
        assert_eq!(from_legacy, from_normalized);

        let top = &from_legacy.projects.top[0];
        assert_eq!(top.name, "spoon-knife");
        let language = top.language.as_ref().unwrap();
        assert_eq!(language.name, "HTML");
        assert_eq!(language.color, "#e34c26");
    }

    #[test]
    fn missing_input_is_exactly_the_default_dataset() {
        assert_eq!(normalize_user_data(None), mock_user_data());
        assert_eq!(normalize_user_data(Some(&Value::Null)), mock_user_data());
        assert_eq!(normalize_user_data(Some(&json!({}))), mock_user_data());
        assert_eq!(normalize_user_data(Some(&json!("oops"))), mock_user_data());
    }

    #[test]
    fn partial_input_keeps_defaults_for_missing_fields() {
        let data = normalize_user_data(Some(&json!({
            "profile": { "username": "octocat", "bio": null }
        })));
        let mock = mock_user_data();
        assert_eq!(data.profile.username, "octocat");
        assert_eq!(data.profile.name, mock.profile.name);
        assert_eq!(data.profile.bio, mock.profile.bio);
        assert_eq!(data.stats_home, mock.stats_home);
    }

    #[test]
    fn lists_replace_defaults_wholesale() {
        let data = normalize_user_data(Some(&json!({
            "projects": { "top": [ { "name": "only-one", "size": 1 } ] }
        })));
        assert_eq!(data.projects.top.len(), 1);
        assert_eq!(data.projects.top[0].description, None);
        assert_eq!(data.projects.new, mock_user_data().projects.new);
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let data = normalize_user_data(Some(&json!({
            "statsHome": { "projects": "many" }
        })));
        assert_eq!(data, mock_user_data());
    }

    #[test]
    fn tagged_keys_win_over_untagged_duplicates() {
        let remapped = remap_legacy_item(
            json!({ "name": "stale", "nameTop": "fresh", "extra": true })
                .as_object()
                .cloned()
                .unwrap(),
            "Top",
        );
        assert_eq!(remapped["name"], "fresh");
        assert_eq!(remapped["extra"], true);
    }

    #[test]
    fn deep_merge_rules() {
        let mut base = json!({ "a": { "b": 1, "c": [1, 2] }, "d": "keep" });
        deep_merge(&mut base, json!({ "a": { "c": [3] }, "d": null, "e": 5 }));
        assert_eq!(base, json!({ "a": { "b": 1, "c": [3] }, "d": "keep", "e": 5 }));
    }

    #[test]
    fn translated_named_maps_replace_defaults() {
        let data = normalize_translated_data(Some(&json!({
            "languages": { "Rust": 100.0 },
            "technical_depth": { "level": "advanced" }
        })));
        assert_eq!(data.languages.len(), 1);
        assert_eq!(data.languages["Rust"], 100.0);
        assert_eq!(data.technical_depth.level, "advanced");
        // untouched numbers inside a struct section keep their defaults
        let mock = mock_translated_data();
        assert_eq!(data.technical_depth.depth_score, mock.technical_depth.depth_score);
        assert_eq!(data.frameworks, mock.frameworks);
    }

    #[test]
    fn translated_lists_become_counts() {
        let data = normalize_translated_data(Some(&json!({
            "frameworks": ["Docker", "Git"],
            "languages": ["Python", "Go"]
        })));
        assert_eq!(data.frameworks["Docker"], 1);
        assert_eq!(data.frameworks["Git"], 1);
        assert_eq!(data.languages["Python"], 50.0);
    }

    #[test]
    fn translated_null_section_is_empty() {
        let data = normalize_translated_data(Some(&json!({
            "frameworks": null,
            "languages": { "Python": 100.0 }
        })));
        assert!(data.frameworks.is_empty());
        assert_eq!(data.libraries, mock_translated_data().libraries);
        assert!(crate::view::framework_cloud(&data.frameworks).is_empty());
    }

    #[test]
    fn zero_rating_without_quality_level_has_no_caption() {
        let data = normalize_user_data(Some(&json!({
            "statsHome": { "projects": 3, "totalRating": 0, "languages": 2 }
        })));
        let cards = crate::view::stat_cards(&data.stats_home);
        assert_eq!(cards.projects, "3");
        assert_eq!(cards.rating.text, "0");
        assert_eq!(cards.rating.caption, None);
        assert_eq!(cards.rating.empty_stars, 5);
    }

    #[test]
    fn translated_missing_is_default() {
        assert_eq!(normalize_translated_data(None), mock_translated_data());
        assert_eq!(normalize_translated_data(Some(&Value::Null)), mock_translated_data());
    }
}
