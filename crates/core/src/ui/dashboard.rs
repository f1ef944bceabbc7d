//! Home dashboard sections - profile header, stat cards, project lists
//!
//! Renders straight from [`UserData`]; every value comes from the view
//! models in [`crate::view`].

use egui::{self, Color32, RichText, Ui};
use egui_phosphor::regular;

use crate::view::{stat_cards, top_projects, RatingStat};
use crate::{Profile, Project, RecentWork, StatsHome, UserData};

pub const ACCENT: Color32 = Color32::from_rgb(88, 166, 255);
pub const GOLD: Color32 = Color32::from_rgb(255, 215, 0);
pub const MUTED: Color32 = Color32::from_rgb(139, 148, 158);

/// Platform-specific operations needed by the dashboard
pub trait DashboardPlatform {
    /// Resolve an avatar URL to an ImageSource
    fn avatar_source(&self, url: &str) -> egui::ImageSource<'static>;

    /// Open a link (repository page) the way the platform does
    fn open_url(&self, url: &str);
}

/// Parse `#rrggbb`, falling back to gray
pub fn language_color(hex: &str) -> Color32 {
    Color32::from_hex(hex).unwrap_or(MUTED)
}

/// Render the full dashboard body (inside a scroll area)
pub fn render_dashboard<P: DashboardPlatform>(ui: &mut Ui, platform: &P, data: &UserData) {
    render_profile_header(ui, platform, &data.profile);
    ui.add_space(16.0);
    render_stat_cards(ui, &data.stats_home);
    ui.add_space(16.0);

    ui.columns(2, |columns| {
        render_project_list(&mut columns[0], platform, "Top Projects", &top_projects(&data.projects.top));
        let newest: Vec<&Project> = data.projects.new.iter().collect();
        render_project_list(&mut columns[1], platform, "New Projects", &newest);
    });

    ui.add_space(16.0);
    render_recent_works(ui, &data.recent_works);
}

pub fn render_profile_header<P: DashboardPlatform>(ui: &mut Ui, platform: &P, profile: &Profile) {
    ui.horizontal(|ui| {
        if let Some(url) = profile.avatar_url.as_deref().filter(|u| !u.is_empty()) {
            ui.add(
                egui::Image::new(platform.avatar_source(url))
                    .fit_to_exact_size(egui::vec2(72.0, 72.0))
                    .corner_radius(36.0),
            );
        } else {
            ui.label(RichText::new(regular::USER_CIRCLE).size(72.0).color(MUTED));
        }

        ui.add_space(12.0);

        ui.vertical(|ui| {
            ui.heading(profile.display_name());
            ui.label(RichText::new(format!("@{}", profile.username)).color(MUTED));
            if let Some(bio) = profile.bio.as_deref().filter(|b| !b.is_empty()) {
                ui.label(bio);
            }
            ui.horizontal(|ui| {
                if let Some(location) = profile.location.as_deref().filter(|l| !l.is_empty()) {
                    ui.label(RichText::new(format!("{} {}", regular::MAP_PIN, location)).small().color(MUTED));
                }
                ui.label(
                    RichText::new(format!(
                        "{} {} followers · {} following",
                        regular::USERS,
                        profile.followers,
                        profile.following
                    ))
                    .small()
                    .color(MUTED),
                );
                if let Some(joined) = profile.joined.as_deref().filter(|j| !j.is_empty()) {
                    ui.label(RichText::new(format!("{} Joined {}", regular::CALENDAR, joined)).small().color(MUTED));
                }
            });
        });
    });
}

fn card_frame(ui: &Ui) -> egui::Frame {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .corner_radius(6.0)
        .inner_margin(12.0)
}

pub fn render_stat_cards(ui: &mut Ui, stats: &StatsHome) {
    let cards = stat_cards(stats);

    ui.columns(3, |columns| {
        card_frame(&columns[0]).show(&mut columns[0], |ui| {
            ui.label(RichText::new(format!("{} Projects", regular::FOLDERS)).color(MUTED));
            ui.label(RichText::new(&cards.projects).size(28.0).strong());
        });

        card_frame(&columns[1]).show(&mut columns[1], |ui| {
            ui.label(RichText::new(format!("{} Rating", regular::STAR)).color(MUTED));
            render_rating(ui, &cards.rating);
        });

        card_frame(&columns[2]).show(&mut columns[2], |ui| {
            ui.label(RichText::new(format!("{} Languages", regular::CODE)).color(MUTED));
            ui.label(RichText::new(&cards.languages).size(28.0).strong());
        });
    });
}

pub fn render_rating(ui: &mut Ui, rating: &RatingStat) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(&rating.text).size(28.0).strong());
        ui.spacing_mut().item_spacing.x = 1.0;
        for _ in 0..rating.full_stars {
            ui.label(RichText::new(regular::STAR).color(GOLD));
        }
        if rating.half_star {
            ui.label(RichText::new(regular::STAR_HALF).color(GOLD));
        }
        for _ in 0..rating.empty_stars {
            ui.label(RichText::new(regular::STAR).color(MUTED));
        }
    });
    if let Some(caption) = &rating.caption {
        ui.label(RichText::new(caption).small().color(ACCENT));
    }
}

pub fn render_project_list<P: DashboardPlatform>(
    ui: &mut Ui,
    platform: &P,
    title: &str,
    projects: &[&Project],
) {
    ui.heading(title);
    ui.separator();

    if projects.is_empty() {
        ui.label(RichText::new("No projects yet.").color(MUTED));
        return;
    }

    for (rank, project) in projects.iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{}.", rank + 1)).color(MUTED));
            let name = RichText::new(&project.name).color(ACCENT).strong();
            match project.url.as_deref() {
                Some(url) => {
                    if ui.link(name).clicked() {
                        platform.open_url(url);
                    }
                }
                None => {
                    ui.label(name);
                }
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(format!("{} {}", regular::STAR, project.stars)).small());
                ui.label(RichText::new(format!("{} KB", project.size)).small().color(MUTED));
            });
        });
        ui.horizontal(|ui| {
            if let Some(language) = &project.language {
                ui.label(RichText::new(regular::CIRCLE).small().color(language_color(&language.color)));
                ui.label(RichText::new(&language.name).small());
            }
            if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
                ui.label(RichText::new(description).small().color(MUTED));
            }
        });
        ui.add_space(6.0);
    }
}

pub fn render_recent_works(ui: &mut Ui, works: &[RecentWork]) {
    ui.heading(format!("{} Recent Work", regular::CLOCK_COUNTER_CLOCKWISE));
    ui.separator();

    if works.is_empty() {
        ui.label(RichText::new("No recent activity.").color(MUTED));
        return;
    }

    let alt_bg = Color32::from_rgba_unmultiplied(255, 255, 255, 8);
    for (i, work) in works.iter().enumerate() {
        let row_rect = ui.available_rect_before_wrap();
        let row_rect = egui::Rect::from_min_size(row_rect.min, egui::vec2(row_rect.width(), 24.0));
        if i % 2 == 1 {
            ui.painter().rect_filled(row_rect, 2.0, alt_bg);
        }

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 6.0;
            if let Some(date) = work.updated_display() {
                ui.label(RichText::new(date).small().color(MUTED));
            }
            ui.label(RichText::new(&work.name).color(ACCENT));
            if let Some(language) = &work.language {
                ui.label(RichText::new(&language.name).small().color(language_color(&language.color)));
            }
            if let Some(description) = work.description.as_deref().filter(|d| !d.is_empty()) {
                ui.label(RichText::new(description).small());
            }
        });
    }
}
