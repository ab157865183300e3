use eframe::egui;
use egui::{Color32, RichText};
use quillpad_core::APP_NAME;

const BADGE_COLOR: Color32 = Color32::from_rgb(0x4C, 0xAF, 0x50);
pub const TOOLKIT_LINE: &str = "Built with egui 0.25 and eframe";

const DESCRIPTION: &str = "A small rich-text notepad.\n\n\
    It demonstrates:\n\
    • Window management and layouts\n\
    • Menus, toolbars, and status bars\n\
    • File operations and dialogs\n\
    • Text editing and formatting\n\
    • Settings and preferences\n\
    • Custom dialogs and widgets";

/// Message shown by Help > About egui.
pub fn toolkit_message() -> String {
    format!(
        "{TOOLKIT_LINE}.\n\negui is an immediate mode GUI library written in Rust.\n\
         This program uses version 0.25."
    )
}

/// Renders the About window; returns `false` once it was dismissed.
pub fn show(ctx: &egui::Context) -> bool {
    let mut open = true;
    let mut dismissed = false;
    egui::Window::new(format!("About {APP_NAME}"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .fixed_size([400.0, 300.0])
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                egui::Frame::none()
                    .fill(BADGE_COLOR)
                    .rounding(5.0)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.label(RichText::new("Q").size(24.0).strong().color(Color32::WHITE));
                    });
                ui.label(RichText::new(APP_NAME).size(18.0).strong());
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .size(12.0)
                        .color(Color32::from_gray(0x66)),
                );
                ui.add_space(8.0);
                ui.label(DESCRIPTION);
                ui.add_space(8.0);
                ui.label(
                    RichText::new(TOOLKIT_LINE)
                        .size(10.0)
                        .color(Color32::from_gray(0x88)),
                );
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });
    open && !dismissed
}
