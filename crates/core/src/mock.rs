//! Default dataset
//!
//! Every field of the view models has its default value here and nowhere
//! else. The normalizer merges backend data over these literals, so a field
//! the backend leaves out shows the value below.

use serde_json::{json, Value};

use crate::models::{TranslatedData, UserData};

pub fn mock_user_data_value() -> Value {
    json!({
        "profile": {
            "name": "Alex Developer",
            "username": "alexdev",
            "avatarUrl": "https://avatars.githubusercontent.com/u/583231",
            "bio": "Full-stack developer who enjoys tooling and data pipelines.",
            "location": "San Francisco, CA",
            "followers": 128,
            "following": 42,
            "publicRepos": 24,
            "joined": "2019-04-12"
        },
        "statsHome": {
            "projects": 24,
            "totalRating": 4.5,
            "languages": 6
        },
        "projects": {
            "top": [
                {
                    "name": "data-pipeline",
                    "description": "Streaming ETL jobs for event analytics",
                    "language": { "name": "Python", "color": "#3572A5" },
                    "stars": 86,
                    "size": 4820,
                    "url": "https://github.com/alexdev/data-pipeline"
                },
                {
                    "name": "web-dashboard",
                    "description": "React dashboard for pipeline metrics",
                    "language": { "name": "TypeScript", "color": "#3178c6" },
                    "stars": 54,
                    "size": 3210,
                    "url": "https://github.com/alexdev/web-dashboard"
                },
                {
                    "name": "cli-tools",
                    "description": "Small command line helpers",
                    "language": { "name": "Go", "color": "#00ADD8" },
                    "stars": 31,
                    "size": 960,
                    "url": "https://github.com/alexdev/cli-tools"
                },
                {
                    "name": "dotfiles",
                    "description": "Shell and editor configuration",
                    "language": { "name": "Shell", "color": "#89e051" },
                    "stars": 12,
                    "size": 140,
                    "url": "https://github.com/alexdev/dotfiles"
                }
            ],
            "new": [
                {
                    "name": "llm-notes",
                    "description": "Experiments with local language models",
                    "language": { "name": "Python", "color": "#3572A5" },
                    "stars": 3,
                    "size": 220,
                    "url": "https://github.com/alexdev/llm-notes"
                },
                {
                    "name": "rust-playground",
                    "description": "Learning Rust one crate at a time",
                    "language": { "name": "Rust", "color": "#dea584" },
                    "stars": 1,
                    "size": 75,
                    "url": "https://github.com/alexdev/rust-playground"
                }
            ]
        },
        "recentWorks": [
            {
                "name": "data-pipeline",
                "description": "Added backfill support for late events",
                "language": { "name": "Python", "color": "#3572A5" },
                "updatedAt": "2024-05-02T14:11:00Z"
            },
            {
                "name": "web-dashboard",
                "description": "Dark mode and chart tooltips",
                "language": { "name": "TypeScript", "color": "#3178c6" },
                "updatedAt": "2024-04-27T09:30:00Z"
            }
        ]
    })
}

pub fn mock_translated_data_value() -> Value {
    json!({
        "skills": {
            "web_development": 0.7,
            "cloud_devops": 0.45,
            "ai_ml": 0.3,
            "data_engineering": 0.5,
            "devtools_automation": 0.6
        },
        "languages": {
            "Python": 42.5,
            "TypeScript": 28.0,
            "Go": 12.5,
            "Shell": 9.0,
            "Rust": 5.0,
            "HTML": 3.0
        },
        "frameworks": {
            "React": 4,
            "FastAPI": 3,
            "Docker": 3,
            "GitHub Actions": 2,
            "pytest": 2
        },
        "libraries": {
            "requests": 9,
            "pandas": 7,
            "numpy": 6,
            "axios": 4,
            "pydantic": 3,
            "cobra": 1
        },
        "technical_depth": {
            "depth_score": 0.62,
            "level": "intermediate",
            "avg_repo_size_kb": 310.0,
            "max_repo_size_kb": 4820.0
        },
        "habits": {
            "frequency": 3.4,
            "consistency": 0.41,
            "avg_commit_size_kb": 12.8,
            "commit_pattern": "regular"
        },
        "composition": {
            "frontend": 0.32,
            "backend": 0.55,
            "data": 0.13
        },
        "quality": {
            "avg_test_coverage": 46.0,
            "quality_score": 0.46,
            "rating": "good"
        },
        "metadata": {
            "total_repositories": 24,
            "total_commits": 812,
            "analysis_timestamp": null
        }
    })
}

/// The default dashboard dataset as a view model
pub fn mock_user_data() -> UserData {
    serde_json::from_value(mock_user_data_value()).unwrap_or_default()
}

/// The default skills dataset as a view model
pub fn mock_translated_data() -> TranslatedData {
    serde_json::from_value(mock_translated_data_value()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_user_data_is_complete() {
        let data: UserData = serde_json::from_value(mock_user_data_value()).unwrap();
        assert_eq!(data.profile.username, "alexdev");
        assert_eq!(data.projects.top.len(), 4);
        assert!(data.projects.top.iter().all(|p| p.language.is_some()));
        assert_eq!(data, mock_user_data());
    }

    #[test]
    fn mock_translated_data_is_complete() {
        let data: TranslatedData = serde_json::from_value(mock_translated_data_value()).unwrap();
        assert_eq!(data.languages.keys().next().map(String::as_str), Some("Python"));
        assert!(data.habits.is_some());
        assert!(data.quality.is_some());
        assert_eq!(data, mock_translated_data());
    }
}
