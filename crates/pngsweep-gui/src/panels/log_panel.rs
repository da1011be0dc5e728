/// Log panel: colour-coded, timestamped run log in the central area.
use crate::state::AppState;
use crate::theme::SweepTheme;
use egui::Ui;

/// Draw the log panel. Sticks to the bottom while new lines arrive.
pub fn log_panel(ui: &mut Ui, state: &AppState) {
    let theme = SweepTheme::for_mode(state.dark_mode);

    ui.horizontal(|ui| {
        ui.heading("Log");
        ui.label(
            egui::RichText::new(format!("{} lines", state.log.len()))
                .size(11.0)
                .color(theme.text_muted),
        );
    });
    ui.add_space(4.0);

    if state.log.is_empty() {
        ui.label(
            egui::RichText::new("Choose a location and press Start.")
                .size(12.0)
                .color(theme.text_muted),
        );
        return;
    }

    let row_height = ui.text_style_height(&egui::TextStyle::Monospace);
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for line in &state.log {
                ui.horizontal_top(|ui| {
                    ui.set_min_height(row_height);
                    ui.label(
                        egui::RichText::new(line.timestamp())
                            .monospace()
                            .size(11.0)
                            .color(theme.text_muted),
                    );
                    ui.label(
                        egui::RichText::new(format!("{:<5}", line.level.tag()))
                            .monospace()
                            .size(11.0)
                            .color(theme.log_colour(line.level)),
                    );
                    ui.label(
                        egui::RichText::new(&line.message)
                            .monospace()
                            .size(12.0)
                            .color(theme.log_colour(line.level)),
                    );
                });
            }
        });
}
