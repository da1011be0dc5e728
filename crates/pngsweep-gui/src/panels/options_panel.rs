/// Options panel: scan target and run options in the left sidebar.
use crate::state::{AppState, ScanTarget};
use crate::widgets;
use pngsweep_core::model::DEFAULT_EXTENSIONS;
use pngsweep_core::platform;

use egui::Ui;

/// Draw the options panel (left sidebar content).
pub fn options_panel(ui: &mut Ui, state: &mut AppState) {
    let enabled = !state.is_scanning();

    ui.heading("Scan location");
    ui.add_space(4.0);

    ui.add_enabled_ui(enabled, |ui| {
        ui.radio_value(
            &mut state.target,
            ScanTarget::AppDirectory,
            "Application folder",
        )
        .on_hover_text(platform::app_directory().display().to_string());

        ui.radio_value(&mut state.target, ScanTarget::Specific, "Specific folder");
        if state.target == ScanTarget::Specific {
            ui.indent("specific_dir", |ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut state.specific_dir)
                        .hint_text("C:\\Users\\me\\Pictures")
                        .desired_width(f32::INFINITY),
                );
            });
        }

        ui.radio_value(&mut state.target, ScanTarget::FullSystem, "Full system")
            .on_hover_text("Walk an entire drive. Can take a long time.");
    });

    if state.target == ScanTarget::FullSystem {
        ui.add_space(4.0);
        ui.indent("roots", |ui| {
            widgets::root_picker::root_picker(ui, state);
        });
    }

    ui.add_space(12.0);
    ui.separator();
    ui.add_space(8.0);

    ui.heading("Options");
    ui.add_space(4.0);

    ui.add_enabled_ui(enabled, |ui| {
        ui.checkbox(
            &mut state.delete_originals,
            "Delete originals after conversion",
        )
        .on_hover_text("Only files that were converted successfully are deleted");
    });

    ui.add_space(8.0);
    ui.label(
        egui::RichText::new("Output folder")
            .size(12.0)
            .color(ui.visuals().weak_text_color()),
    );
    ui.label(
        egui::RichText::new(state.output_dir.display().to_string())
            .size(12.0)
            .monospace(),
    );

    ui.add_space(8.0);
    ui.label(
        egui::RichText::new(format!("Matches: {}", DEFAULT_EXTENSIONS.join(", ")))
            .size(12.0)
            .color(ui.visuals().weak_text_color()),
    );
}
