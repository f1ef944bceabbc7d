//! View models for the dashboard widgets
//!
//! Pure functions from the canonical data to what a widget draws. The egui
//! renderers in `ui` only lay these out.

use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::models::{Project, StatsHome};

pub const TOP_PROJECTS_LIMIT: usize = 5;
pub const LANGUAGE_BARS_LIMIT: usize = 8;
pub const FRAMEWORK_CLOUD_LIMIT: usize = 10;
pub const LIBRARY_CLOUD_LIMIT: usize = 15;
pub const MAX_STARS: u8 = 5;

// ============================================================================
// Stat cards
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RatingStat {
    /// The number printed on the card
    pub text: String,
    pub full_stars: u8,
    pub half_star: bool,
    pub empty_stars: u8,
    /// Quality level shown under the number
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatCards {
    pub projects: String,
    pub rating: RatingStat,
    pub languages: String,
}

pub fn stat_cards(stats: &StatsHome) -> StatCards {
    StatCards {
        projects: stats.projects.to_string(),
        rating: rating_stat(stats.total_rating, stats.quality_level.as_deref()),
        languages: stats.languages.to_string(),
    }
}

pub fn rating_stat(total_rating: f64, quality_level: Option<&str>) -> RatingStat {
    let rating = if total_rating.is_finite() {
        total_rating.clamp(0.0, MAX_STARS as f64)
    } else {
        0.0
    };
    let full_stars = rating.floor() as u8;
    let half_star = rating - rating.floor() >= 0.5;
    let empty_stars = MAX_STARS - full_stars - u8::from(half_star);

    RatingStat {
        text: format_number(rating),
        full_stars,
        half_star,
        empty_stars,
        caption: quality_level
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .map(str::to_string),
    }
}

/// Whole numbers without decimals, everything else with one
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value))
}

// ============================================================================
// Projects
// ============================================================================

/// Largest projects first, at most [`TOP_PROJECTS_LIMIT`]
pub fn top_projects(projects: &[Project]) -> Vec<&Project> {
    let mut ranked: Vec<&Project> = projects.iter().collect();
    ranked.sort_by(|a, b| b.size.cmp(&a.size));
    ranked.truncate(TOP_PROJECTS_LIMIT);
    ranked
}

// ============================================================================
// Skills and languages
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SkillBar {
    pub label: String,
    pub percent: u32,
}

pub fn skill_bars(skills: &IndexMap<String, f64>) -> Vec<SkillBar> {
    skills
        .iter()
        .map(|(key, score)| SkillBar {
            label: humanize_key(key),
            percent: (score.clamp(0.0, 1.0) * 100.0).round() as u32,
        })
        .collect()
}

/// "web_development" -> "Web Development"
pub fn humanize_key(key: &str) -> String {
    key.split(|c| c == '_' || c == '-')
        .filter(|word| !word.is_empty())
        .map(|word| match word {
            "ai" | "ml" => word.to_uppercase(),
            _ => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq)]
pub struct LanguageBar {
    pub name: String,
    pub percent: f64,
}

impl LanguageBar {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, format_percent(self.percent))
    }
}

/// Highest share first (ties keep the backend's order), at most [`LANGUAGE_BARS_LIMIT`]
pub fn language_bars(languages: &IndexMap<String, f64>) -> Vec<LanguageBar> {
    let mut bars: Vec<LanguageBar> = languages
        .iter()
        .map(|(name, percent)| LanguageBar { name: name.clone(), percent: *percent })
        .collect();
    bars.sort_by(|a, b| b.percent.partial_cmp(&a.percent).unwrap_or(Ordering::Equal));
    bars.truncate(LANGUAGE_BARS_LIMIT);
    bars
}

// ============================================================================
// Tag clouds
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub count: u32,
}

/// Non-zero counts, most used first (ties keep the backend's order), at most `limit`
pub fn tag_cloud(counts: &IndexMap<String, u32>, limit: usize) -> Vec<Tag> {
    let mut tags: Vec<Tag> = counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(name, count)| Tag { name: name.clone(), count: *count })
        .collect();
    tags.sort_by(|a, b| b.count.cmp(&a.count));
    tags.truncate(limit);
    tags
}

pub fn framework_cloud(frameworks: &IndexMap<String, u32>) -> Vec<Tag> {
    tag_cloud(frameworks, FRAMEWORK_CLOUD_LIMIT)
}

pub fn library_cloud(libraries: &IndexMap<String, u32>) -> Vec<Tag> {
    tag_cloud(libraries, LIBRARY_CLOUD_LIMIT)
}

/// Relative weight 0.0..=1.0 of a tag within its cloud, for font sizing
pub fn tag_weight(tag: &Tag, cloud: &[Tag]) -> f32 {
    let max = cloud.iter().map(|t| t.count).max().unwrap_or(0);
    let min = cloud.iter().map(|t| t.count).min().unwrap_or(0);
    if max == min {
        return 1.0;
    }
    (tag.count - min) as f32 / (max - min) as f32
}

// ============================================================================
// Radar chart
// ============================================================================

/// Polygon vertices for a radar chart of skill scores, starting at 12 o'clock
/// and going clockwise. Each point is `[x, y]` on the unit circle scaled by
/// the score.
pub fn radar_points(skills: &IndexMap<String, f64>) -> Vec<(String, [f64; 2])> {
    let n = skills.len();
    skills
        .iter()
        .enumerate()
        .map(|(i, (key, score))| {
            let angle = std::f64::consts::FRAC_PI_2 - std::f64::consts::TAU * i as f64 / n as f64;
            let r = score.clamp(0.0, 1.0);
            (humanize_key(key), [r * angle.cos(), r * angle.sin()])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordered<V: Copy>(pairs: &[(&str, V)]) -> IndexMap<String, V> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn language_bars_sorted_descending() {
        let bars = language_bars(&ordered(&[("Python", 55.0), ("Go", 20.0), ("Rust", 25.0)]));
        let labels: Vec<String> = bars.iter().map(LanguageBar::label).collect();
        assert_eq!(labels, vec!["Python (55%)", "Rust (25%)", "Go (20%)"]);
    }

    #[test]
    fn language_bars_keep_first_seen_order_on_ties_and_cap_at_eight() {
        let langs: Vec<(String, f64)> = (0..10).map(|i| (format!("L{}", i), 10.0)).collect();
        let map: IndexMap<String, f64> = langs.into_iter().collect();
        let bars = language_bars(&map);
        assert_eq!(bars.len(), 8);
        assert_eq!(bars[0].name, "L0");
        assert_eq!(bars[7].name, "L7");
    }

    #[test]
    fn zero_rating_without_quality_level() {
        let stat = rating_stat(0.0, None);
        assert_eq!(stat.text, "0");
        assert_eq!(stat.caption, None);
        assert_eq!((stat.full_stars, stat.half_star, stat.empty_stars), (0, false, 5));
    }

    #[test]
    fn fractional_rating_has_half_star() {
        let stat = rating_stat(3.5, Some("Advanced"));
        assert_eq!(stat.text, "3.5");
        assert_eq!((stat.full_stars, stat.half_star, stat.empty_stars), (3, true, 1));
        assert_eq!(stat.caption.as_deref(), Some("Advanced"));
    }

    #[test]
    fn blank_quality_level_has_no_caption() {
        assert_eq!(rating_stat(4.0, Some("  ")).caption, None);
        assert_eq!(rating_stat(9.0, None).text, "5");
    }

    #[test]
    fn top_projects_by_size() {
        let projects: Vec<Project> = [10u64, 300, 50, 300, 7, 90, 1]
            .iter()
            .enumerate()
            .map(|(i, size)| Project { name: format!("p{}", i), size: *size, ..Default::default() })
            .collect();
        let names: Vec<&str> = top_projects(&projects).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["p1", "p3", "p5", "p2", "p0"]);
    }

    #[test]
    fn skill_bar_percentages_round() {
        let bars = skill_bars(&ordered(&[("ai_ml", 0.333), ("web_development", 0.705)]));
        assert_eq!(bars[0], SkillBar { label: "AI ML".to_string(), percent: 33 });
        assert_eq!(bars[1], SkillBar { label: "Web Development".to_string(), percent: 71 });
    }

    #[test]
    fn tag_clouds_filter_sort_and_cap() {
        let frameworks = ordered(&[("Git", 1u32), ("Docker", 3), ("MCP", 0), ("pytest", 3)]);
        let cloud = framework_cloud(&frameworks);
        let names: Vec<&str> = cloud.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Docker", "pytest", "Git"]);

        let libraries: IndexMap<String, u32> = (1..=20).map(|i| (format!("lib{}", i), i)).collect();
        let cloud = library_cloud(&libraries);
        assert_eq!(cloud.len(), 15);
        assert_eq!(cloud[0].name, "lib20");
    }

    #[test]
    fn tag_weights_span_unit_range() {
        let cloud = vec![
            Tag { name: "a".into(), count: 9 },
            Tag { name: "b".into(), count: 5 },
            Tag { name: "c".into(), count: 1 },
        ];
        assert_eq!(tag_weight(&cloud[0], &cloud), 1.0);
        assert_eq!(tag_weight(&cloud[1], &cloud), 0.5);
        assert_eq!(tag_weight(&cloud[2], &cloud), 0.0);
    }

    #[test]
    fn radar_first_point_is_straight_up() {
        let points = radar_points(&ordered(&[("ai_ml", 1.0), ("cloud_devops", 0.5)]));
        let [x, y] = points[0].1;
        assert!(x.abs() < 1e-9);
        assert!((y - 1.0).abs() < 1e-9);
        let [x, y] = points[1].1;
        assert!(x.abs() < 1e-9);
        assert!((y + 0.5).abs() < 1e-9);
    }
}
