//! Page rendering for WebApp

use divergence_core::mock::mock_translated_data;
use divergence_core::{
    github_login_url, render_chat_panel, render_dashboard, render_profile_header,
    render_skills_content, ChatAction, PollState, Project, Route, ACCENT, MUTED,
};
use eframe::egui;
use egui_phosphor::regular;

use crate::app::{ChatTarget, WebApp};
use crate::storage::redirect;

impl WebApp {
    // ========================================================================
    // Top Panel
    // ========================================================================

    pub fn render_top_panel(&mut self, ctx: &egui::Context) {
        let is_authenticated = self.is_authenticated();
        let username = self.store.get_auth_state().username.unwrap_or_default();
        let mut target = None;
        let mut sign_out = false;

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(egui::RichText::new(format!("{} Divergence", regular::GIT_FORK)).color(ACCENT));
                ui.separator();

                if is_authenticated {
                    for (route, label) in [
                        (Route::Home, format!("{} Home", regular::HOUSE)),
                        (Route::Profile, format!("{} Profile", regular::USER)),
                        (Route::Projects, format!("{} Projects", regular::KANBAN)),
                    ] {
                        if ui.selectable_label(self.route == route, label).clicked() {
                            target = Some(route);
                        }
                    }
                    ui.separator();
                }

                if self.loading {
                    ui.spinner();
                }
                if !self.status.is_empty() {
                    ui.label(egui::RichText::new(&self.status).color(MUTED));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if is_authenticated {
                        if ui.button(format!("{} Sign out", regular::SIGN_OUT)).clicked() {
                            sign_out = true;
                        }
                        ui.label(format!("{} {}", regular::GITHUB_LOGO, username));
                    } else if ui.button(format!("{} Sign in", regular::GITHUB_LOGO)).clicked() {
                        redirect(&github_login_url(&self.config.api_base_url));
                    }
                });
            });
        });

        if sign_out {
            self.sign_out();
        } else if let Some(route) = target {
            if route != self.route {
                self.go(route);
            }
        }
    }

    // ========================================================================
    // Landing
    // ========================================================================

    pub fn render_landing(&mut self, ctx: &egui::Context) {
        let is_authenticated = self.is_authenticated();
        let mut open_dashboard = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.25);
                ui.label(egui::RichText::new(regular::GIT_FORK).size(64.0).color(ACCENT));
                ui.heading(egui::RichText::new("Divergence").size(36.0));
                ui.label(
                    egui::RichText::new("See what your GitHub history says about you as a developer.")
                        .color(MUTED),
                );
                ui.add_space(24.0);

                if is_authenticated {
                    if ui
                        .add(egui::Button::new(format!("{} Go to dashboard", regular::ARROW_RIGHT)).min_size(egui::vec2(200.0, 36.0)))
                        .clicked()
                    {
                        open_dashboard = true;
                    }
                } else if ui
                    .add(egui::Button::new(format!("{} Sign in with GitHub", regular::GITHUB_LOGO)).min_size(egui::vec2(200.0, 36.0)))
                    .clicked()
                {
                    redirect(&github_login_url(&self.config.api_base_url));
                }
            });
        });

        if open_dashboard {
            self.go(Route::Home);
        }
    }

    // ========================================================================
    // Home
    // ========================================================================

    pub fn render_home(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.loading && !self.data_loaded {
                self.render_progress(ui);
                return;
            }
            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                render_dashboard(ui, &*self, &self.user_data);
            });
        });
    }

    fn render_progress(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.spinner();
            ui.add_space(8.0);
            let message = if self.status.is_empty() { "Loading..." } else { self.status.as_str() };
            ui.label(egui::RichText::new(message).size(18.0));
            if self.poll_state == PollState::Polling {
                ui.label(
                    egui::RichText::new("First-time analysis can take up to half a minute.")
                        .small()
                        .color(MUTED),
                );
            }
        });
    }

    // ========================================================================
    // Profile
    // ========================================================================

    pub fn render_profile(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.loading && !self.data_loaded {
                self.render_progress(ui);
                return;
            }
            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                render_profile_header(ui, &*self, &self.user_data.profile);
                ui.add_space(16.0);
                match &self.translated {
                    Some(translated) => render_skills_content(ui, translated),
                    None => {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} Skill analysis isn't available yet. Showing sample data.",
                                regular::INFO
                            ))
                            .color(MUTED),
                        );
                        ui.add_space(8.0);
                        render_skills_content(ui, &mock_translated_data());
                    }
                }
            });
        });
    }

    // ========================================================================
    // Projects
    // ========================================================================

    pub fn render_projects(&mut self, ctx: &egui::Context) {
        let mut scope_project: Option<String> = None;
        let mut start_scoping = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.columns(2, |columns| {
                let ui = &mut columns[0];
                ui.heading(format!("{} Your projects", regular::FOLDER));
                ui.separator();
                egui::ScrollArea::vertical().id_salt("project_list").show(ui, |ui| {
                    let projects = self.user_data.projects.top.iter().chain(self.user_data.projects.new.iter());
                    let mut any = false;
                    for project in projects {
                        any = true;
                        if render_project_row(ui, project) {
                            scope_project = Some(project.name.clone());
                        }
                    }
                    if !any {
                        ui.label(egui::RichText::new("No projects found.").color(MUTED));
                    }
                });

                let ui = &mut columns[1];
                ui.heading(format!("{} Start something new", regular::LIGHTBULB));
                ui.separator();
                let form = &mut self.new_project;
                egui::Grid::new("new_project_form").num_columns(2).spacing([8.0, 8.0]).show(ui, |ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut form.name);
                    ui.end_row();
                    ui.label("Description");
                    ui.text_edit_multiline(&mut form.description);
                    ui.end_row();
                    ui.label("Tech stack");
                    ui.add(egui::TextEdit::singleline(&mut form.tech_stack).hint_text("rust, postgres, ..."));
                    ui.end_row();
                    ui.label("Goals");
                    ui.text_edit_multiline(&mut form.goals);
                    ui.end_row();
                });
                ui.add_space(8.0);
                if ui
                    .add_enabled(form.is_valid(), egui::Button::new(format!("{} Scope with AI", regular::SPARKLE)))
                    .clicked()
                {
                    start_scoping = true;
                }
            });
        });

        if let Some(name) = scope_project {
            self.open_project_chat(&name);
        } else if start_scoping {
            self.start_scoping();
        }
    }

    // ========================================================================
    // Chat modal
    // ========================================================================

    pub fn render_chat_window(&mut self, ctx: &egui::Context) {
        let Some(modal) = self.chat.as_mut() else { return };

        let title = match &modal.target {
            ChatTarget::Project(name) => format!("{} Scope: {}", regular::CHATS, name),
            ChatTarget::NewProject(descriptor) => format!("{} New project: {}", regular::CHATS, descriptor.name),
        };
        let mut open = true;
        let mut action = ChatAction::None;
        egui::Window::new(title)
            .open(&mut open)
            .collapsible(false)
            .resizable(true)
            .default_width(520.0)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                action = render_chat_panel(ui, &modal.session, &mut modal.input);
            });

        if !open {
            self.chat = None;
            return;
        }
        match action {
            ChatAction::None => {}
            ChatAction::Send(text) => self.send_chat_message(&text),
            ChatAction::GenerateBreakdown => self.generate_breakdown(),
            ChatAction::Close => self.chat = None,
        }
    }
}

/// One project with its "scope" button. Returns true when the button was clicked.
fn render_project_row(ui: &mut egui::Ui, project: &Project) -> bool {
    let mut clicked = false;
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.strong(&project.name);
            if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
                ui.label(egui::RichText::new(description).small().color(MUTED));
            }
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            clicked = ui.button(format!("{} Scope", regular::CHAT_CIRCLE_DOTS)).clicked();
        });
    });
    ui.separator();
    clicked
}
