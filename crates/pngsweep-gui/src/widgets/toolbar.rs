/// Top action bar -- start/stop controls, theme toggle, and branding.
use crate::state::AppState;
use egui::Ui;

/// Draw the toolbar.
pub fn toolbar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        // App title -- uses the egui accent/hyperlink colour so it adapts to
        // dark and light mode automatically.
        ui.label(
            egui::RichText::new("🖼 PngSweep")
                .size(18.0)
                .strong()
                .color(ui.visuals().hyperlink_color),
        );

        ui.separator();

        let can_start = !state.is_scanning() && state.pending_confirm.is_none();
        let start_btn = ui.add_enabled(
            can_start,
            egui::Button::new("▶ Start").min_size(egui::vec2(70.0, 28.0)),
        );
        if start_btn.clicked() {
            state.request_start();
        }

        // Stop button (only during scan, once).
        let can_stop = state.is_scanning() && !state.stop_requested;
        let stop_btn = ui.add_enabled(
            can_stop,
            egui::Button::new("⏹ Stop").min_size(egui::vec2(70.0, 28.0)),
        );
        if stop_btn.clicked() {
            state.cancel_scan();
        }

        ui.separator();

        if ui
            .add_enabled(state.last_outcome.is_some(), egui::Button::new("📋 Summary"))
            .on_hover_text("Show the summary of the last run")
            .clicked()
        {
            state.show_summary = true;
        }

        // Right-aligned controls.
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("ℹ").on_hover_text("About PngSweep").clicked() {
                state.show_about = true;
            }

            // ── Theme toggle (☀ light / 🌙 dark) ──────────────────
            let theme_label = if state.dark_mode { "☀" } else { "🌙" };
            let theme_tip = if state.dark_mode {
                "Switch to light mode"
            } else {
                "Switch to dark mode"
            };
            if ui.button(theme_label).on_hover_text(theme_tip).clicked() {
                state.dark_mode = !state.dark_mode;
            }

            ui.separator();

            // Elevation indicator.
            if state.is_elevated {
                ui.label(
                    egui::RichText::new("🛡 Admin")
                        .size(11.0)
                        .color(egui::Color32::from_rgb(0xa6, 0xe3, 0xa1)),
                );
            } else {
                ui.label(
                    egui::RichText::new("Standard user")
                        .size(11.0)
                        .color(ui.visuals().weak_text_color()),
                )
                .on_hover_text("Some protected folders may be skipped");
            }
        });
    });
}
