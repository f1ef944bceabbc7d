//! Profile page sections - skills, languages, tag clouds, depth summary

use egui::{self, Color32, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints};
use egui_phosphor::regular;

use super::dashboard::{ACCENT, GOLD, MUTED};
use crate::view::{
    format_number, format_percent, framework_cloud, language_bars, library_cloud, radar_points,
    skill_bars, tag_weight, Tag,
};
use crate::TranslatedData;

const BAR_HEIGHT: f32 = 14.0;

/// Render every profile section (inside a scroll area)
pub fn render_skills_content(ui: &mut Ui, data: &TranslatedData) {
    ui.columns(2, |columns| {
        render_skill_radar(&mut columns[0], data);
        render_skill_bars(&mut columns[1], data);
    });
    ui.add_space(16.0);
    render_language_bars(ui, data);
    ui.add_space(16.0);
    render_tag_cloud(ui, &format!("{} Frameworks", regular::STACK), &framework_cloud(&data.frameworks));
    ui.add_space(12.0);
    render_tag_cloud(ui, &format!("{} Libraries", regular::PACKAGE), &library_cloud(&data.libraries));
    ui.add_space(16.0);
    render_depth_summary(ui, data);
}

pub fn render_skill_bars(ui: &mut Ui, data: &TranslatedData) {
    ui.heading("Skills");
    ui.separator();

    let bars = skill_bars(&data.skills);
    if bars.is_empty() {
        ui.label(RichText::new("No skill signals detected yet.").color(MUTED));
        return;
    }

    for bar in bars {
        ui.horizontal(|ui| {
            ui.label(&bar.label);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(format!("{}%", bar.percent)).strong());
            });
        });
        ui.add(
            egui::ProgressBar::new(bar.percent as f32 / 100.0)
                .desired_height(BAR_HEIGHT)
                .fill(ACCENT),
        );
        ui.add_space(4.0);
    }
}

/// Radar chart of skill scores. Drawn as closed lines: grid rings, spokes, then the score polygon.
pub fn render_skill_radar(ui: &mut Ui, data: &TranslatedData) {
    ui.heading("Skill Radar");
    ui.separator();

    let points = radar_points(&data.skills);
    if points.len() < 3 {
        ui.label(RichText::new("At least three skill areas are needed for the radar.").color(MUTED));
        return;
    }

    let grid_color = Color32::from_rgba_unmultiplied(139, 148, 158, 60);
    let n = points.len();

    let rings: Vec<Line> = [0.25, 0.5, 0.75, 1.0]
        .iter()
        .map(|scale| {
            let ring: PlotPoints = (0..=n)
                .map(|i| {
                    let angle = std::f64::consts::FRAC_PI_2 - std::f64::consts::TAU * (i % n) as f64 / n as f64;
                    [scale * angle.cos(), scale * angle.sin()]
                })
                .collect();
            Line::new(format!("ring {}", scale), ring).color(grid_color)
        })
        .collect();

    let spokes: Vec<Line> = (0..n)
        .map(|i| {
            let angle = std::f64::consts::FRAC_PI_2 - std::f64::consts::TAU * i as f64 / n as f64;
            let spoke: PlotPoints = vec![[0.0, 0.0], [angle.cos(), angle.sin()]].into();
            Line::new(format!("spoke {}", i), spoke).color(grid_color)
        })
        .collect();

    let mut outline: Vec<[f64; 2]> = points.iter().map(|(_, p)| *p).collect();
    outline.push(points[0].1);
    let scores = Line::new("Skills", PlotPoints::from(outline))
        .color(ACCENT)
        .width(2.0)
        .fill(0.0);

    Plot::new("skills_radar")
        .data_aspect(1.0)
        .height(220.0)
        .include_x(-1.1)
        .include_x(1.1)
        .include_y(-1.1)
        .include_y(1.1)
        .show_axes([false, false])
        .show_grid([false, false])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for ring in rings {
                plot_ui.line(ring);
            }
            for spoke in spokes {
                plot_ui.line(spoke);
            }
            plot_ui.line(scores);
        });

    ui.horizontal_wrapped(|ui| {
        for (label, _) in &points {
            ui.label(RichText::new(label).small().color(MUTED));
        }
    });
}

pub fn render_language_bars(ui: &mut Ui, data: &TranslatedData) {
    ui.heading(format!("{} Languages Distribution", regular::CODE));
    ui.separator();

    let bars = language_bars(&data.languages);
    if bars.is_empty() {
        ui.label(RichText::new("No languages detected.").color(MUTED));
        return;
    }

    for bar in bars {
        ui.horizontal(|ui| {
            ui.label(&bar.name);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(format_percent(bar.percent)).strong());
            });
        });
        ui.add(
            egui::ProgressBar::new((bar.percent / 100.0).clamp(0.0, 1.0) as f32)
                .desired_height(BAR_HEIGHT)
                .fill(GOLD),
        );
        ui.add_space(4.0);
    }
}

pub fn render_tag_cloud(ui: &mut Ui, title: &str, tags: &[Tag]) {
    ui.heading(title);
    ui.separator();

    if tags.is_empty() {
        ui.label(RichText::new("Nothing detected yet.").color(MUTED));
        return;
    }

    ui.horizontal_wrapped(|ui| {
        for tag in tags {
            let weight = tag_weight(tag, tags);
            let size = 12.0 + weight * 8.0;
            egui::Frame::new()
                .fill(ui.style().visuals.extreme_bg_color)
                .corner_radius(10.0)
                .inner_margin(egui::Margin::symmetric(8, 3))
                .show(ui, |ui| {
                    ui.label(RichText::new(&tag.name).size(size).color(ACCENT))
                        .on_hover_text(format!("{} uses", tag.count));
                });
        }
    });
}

pub fn render_depth_summary(ui: &mut Ui, data: &TranslatedData) {
    ui.heading(format!("{} Technical Profile", regular::GAUGE));
    ui.separator();

    let depth = &data.technical_depth;
    ui.horizontal(|ui| {
        ui.label("Technical depth:");
        ui.label(RichText::new(format_percent((depth.depth_score * 100.0).round())).color(GOLD).strong());
        if !depth.level.is_empty() {
            ui.label(RichText::new(format!("({})", depth.level)).color(MUTED));
        }
    });
    if let Some(avg) = depth.avg_repo_size_kb {
        ui.horizontal(|ui| {
            ui.label("Average repository size:");
            ui.label(RichText::new(format!("{} KB", format_number(avg.round()))).color(GOLD).strong());
        });
    }

    if let Some(habits) = &data.habits {
        ui.horizontal(|ui| {
            ui.label("Commit pattern:");
            ui.label(RichText::new(&habits.commit_pattern).color(GOLD).strong());
            ui.label(RichText::new(format!("{:.1} commits/week", habits.frequency)).color(MUTED));
        });
    }

    if let Some(quality) = &data.quality {
        ui.horizontal(|ui| {
            ui.label("Test coverage:");
            ui.label(RichText::new(format_percent(quality.avg_test_coverage.round())).color(GOLD).strong());
            ui.label(RichText::new(format!("({})", quality.rating_label())).color(MUTED));
        });
    }

    if let Some(composition) = &data.composition {
        ui.add_space(6.0);
        for (label, share) in [
            ("Frontend", composition.frontend),
            ("Backend", composition.backend),
            ("Data", composition.data),
        ] {
            ui.horizontal(|ui| {
                ui.label(label);
                ui.add(
                    egui::ProgressBar::new(share.clamp(0.0, 1.0) as f32)
                        .desired_height(BAR_HEIGHT)
                        .text(format_percent((share * 100.0).round())),
                );
            });
        }
    }

    if let Some(metadata) = &data.metadata {
        ui.add_space(6.0);
        ui.label(
            RichText::new(format!(
                "Based on {} repositories and {} commits",
                metadata.total_repositories, metadata.total_commits
            ))
            .small()
            .color(MUTED),
        );
    }
}
