//! Project-scoping chat log and confidence bar

use egui::{self, Color32, RichText, Ui};
use egui_phosphor::regular;

use super::dashboard::{ACCENT, MUTED};
use crate::{ChatMessage, ChatSession};

/// What the user did in the chat panel this frame
#[derive(Debug, Clone, PartialEq)]
pub enum ChatAction {
    None,
    Send(String),
    GenerateBreakdown,
    Close,
}

pub fn render_confidence_bar(ui: &mut Ui, session: &ChatSession) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("Scope confidence").color(MUTED));
        ui.add(
            egui::ProgressBar::new(session.confidence() as f32)
                .text(format!("{}%", session.confidence_percent()))
                .fill(if session.is_complete() { Color32::from_rgb(63, 185, 80) } else { ACCENT }),
        );
    });
}

pub fn render_chat_log(ui: &mut Ui, session: &ChatSession) {
    egui::ScrollArea::vertical()
        .max_height(320.0)
        .stick_to_bottom(true)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for message in session.messages() {
                render_message(ui, message);
                ui.add_space(4.0);
            }
            if session.is_pending() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Thinking...").color(MUTED));
                });
            }
        });
}

fn render_message(ui: &mut Ui, message: &ChatMessage) {
    let (icon, color, fill) = match message {
        ChatMessage::User(_) => (regular::USER, Color32::WHITE, Color32::from_rgb(31, 111, 235)),
        ChatMessage::Assistant(_) => (regular::ROBOT, ui.style().visuals.text_color(), ui.style().visuals.extreme_bg_color),
        ChatMessage::System(_) => (regular::INFO, MUTED, Color32::TRANSPARENT),
        ChatMessage::Error(_) => (regular::WARNING, Color32::from_rgb(248, 81, 73), Color32::TRANSPARENT),
    };

    let layout = if message.is_from_user() {
        egui::Layout::right_to_left(egui::Align::TOP)
    } else {
        egui::Layout::left_to_right(egui::Align::TOP)
    };

    ui.with_layout(layout, |ui| {
        egui::Frame::new()
            .fill(fill)
            .corner_radius(8.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.8);
                ui.label(RichText::new(format!("{} {}", icon, message.content())).color(color));
            });
    });
}

/// Render the whole chat body: confidence, log, input row, actions
pub fn render_chat_panel(ui: &mut Ui, session: &ChatSession, input: &mut String) -> ChatAction {
    let mut action = ChatAction::None;

    render_confidence_bar(ui, session);
    ui.separator();
    render_chat_log(ui, session);
    ui.separator();

    if session.is_complete() {
        ui.horizontal(|ui| {
            if ui.button(format!("{} Generate breakdown", regular::LIST_CHECKS)).clicked() {
                action = ChatAction::GenerateBreakdown;
            }
            if ui.button(format!("{} Close", regular::X)).clicked() {
                action = ChatAction::Close;
            }
        });
        return action;
    }

    ui.horizontal(|ui| {
        let input_width = ui.available_width() - 90.0;
        let response = ui.add_enabled(
            !session.is_pending(),
            egui::TextEdit::singleline(input)
                .hint_text("Describe your project...")
                .desired_width(input_width),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let clicked = ui
            .add_enabled(
                !session.is_pending() && !input.trim().is_empty(),
                egui::Button::new(format!("{} Send", regular::PAPER_PLANE_RIGHT)),
            )
            .clicked();
        if (submitted || clicked) && !input.trim().is_empty() {
            action = ChatAction::Send(std::mem::take(input));
        }
    });

    action
}
