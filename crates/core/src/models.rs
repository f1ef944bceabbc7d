//! Canonical view models consumed by the dashboard
//!
//! These are the shapes the normalizer produces. Render code only ever sees
//! these types, never the raw backend JSON.

use chrono::{DateTime, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const DEFAULT_LANGUAGE_COLOR: &str = "#8b949e";

fn default_language_color() -> String {
    DEFAULT_LANGUAGE_COLOR.to_string()
}

// ============================================================================
// Filtered data (GET /get-filtered-data)
// ============================================================================

/// Aggregated GitHub analytics for one user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserData {
    pub profile: Profile,
    pub stats_home: StatsHome,
    pub projects: ProjectLists,
    pub recent_works: Vec<RecentWork>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub username: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub followers: u32,
    pub following: u32,
    pub public_repos: u32,
    pub joined: Option<String>,
}

impl Profile {
    /// Name to show in headers; falls back to the login when no display name is set
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}

/// Numbers shown on the home dashboard stat cards
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsHome {
    pub projects: u32,
    /// 0.0 - 5.0 star rating
    pub total_rating: f64,
    pub quality_level: Option<String>,
    pub languages: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLists {
    pub top: Vec<Project>,
    pub new: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageTag {
    pub name: String,
    #[serde(default = "default_language_color")]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<LanguageTag>,
    pub stars: u32,
    /// Repository size in KB
    pub size: u64,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecentWork {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<LanguageTag>,
    pub updated_at: Option<String>,
}

impl RecentWork {
    /// Short date for list rows. Unparseable timestamps are shown as sent.
    pub fn updated_display(&self) -> Option<String> {
        let raw = self.updated_at.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.format("%Y-%m-%d").to_string());
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date.format("%Y-%m-%d").to_string());
        }
        Some(raw.to_string())
    }
}

// ============================================================================
// Translated data (GET /get-translated-data)
// ============================================================================

/// Developer profile derived from the filtered data
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatedData {
    /// Skill category -> score in 0.0..=1.0
    pub skills: IndexMap<String, f64>,
    /// Language -> share of code in percent
    pub languages: IndexMap<String, f64>,
    /// Framework -> number of repositories using it
    pub frameworks: IndexMap<String, u32>,
    /// Library -> usage count
    pub libraries: IndexMap<String, u32>,
    pub technical_depth: TechnicalDepth,
    pub habits: Option<Habits>,
    pub composition: Option<Composition>,
    pub quality: Option<Quality>,
    pub metadata: Option<AnalysisMetadata>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalDepth {
    pub depth_score: f64,
    pub level: String,
    #[serde(alias = "avg_repo_size")]
    pub avg_repo_size_kb: Option<f64>,
    #[serde(alias = "max_repo_size")]
    pub max_repo_size_kb: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Habits {
    /// Commits per week
    pub frequency: f64,
    pub consistency: f64,
    pub avg_commit_size_kb: f64,
    pub commit_pattern: String,
}

/// Share of frontend / backend / data files, each 0.0..=1.0
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Composition {
    pub frontend: f64,
    pub backend: f64,
    pub data: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Quality {
    pub avg_test_coverage: f64,
    pub quality_score: f64,
    pub rating: String,
}

impl Quality {
    /// "needs_improvement" -> "needs improvement"
    pub fn rating_label(&self) -> String {
        self.rating.replace('_', " ")
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisMetadata {
    pub total_repositories: u32,
    pub total_commits: u32,
    pub analysis_timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_username() {
        let profile = Profile {
            name: "  ".to_string(),
            username: "octocat".to_string(),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), "octocat");
    }

    #[test]
    fn recent_work_date_formats() {
        let mut work = RecentWork {
            updated_at: Some("2024-03-05T10:20:30Z".to_string()),
            ..Default::default()
        };
        assert_eq!(work.updated_display().as_deref(), Some("2024-03-05"));

        work.updated_at = Some("last week".to_string());
        assert_eq!(work.updated_display().as_deref(), Some("last week"));

        work.updated_at = None;
        assert_eq!(work.updated_display(), None);
    }

    #[test]
    fn technical_depth_accepts_short_size_keys() {
        let depth: TechnicalDepth = serde_json::from_value(serde_json::json!({
            "depth_score": 0.5,
            "level": "intermediate",
            "avg_repo_size": 250.0,
            "max_repo_size": 900.0
        }))
        .unwrap();
        assert_eq!(depth.avg_repo_size_kb, Some(250.0));
        assert_eq!(depth.max_repo_size_kb, Some(900.0));
    }

    #[test]
    fn language_color_defaults_when_missing() {
        let tag: LanguageTag = serde_json::from_value(serde_json::json!({"name": "Rust"})).unwrap();
        assert_eq!(tag.color, DEFAULT_LANGUAGE_COLOR);
    }

    #[test]
    fn quality_rating_label_drops_underscores() {
        let q = Quality { rating: "needs_improvement".to_string(), ..Default::default() };
        assert_eq!(q.rating_label(), "needs improvement");
    }
}
