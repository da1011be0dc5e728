/// Modal dialogs: confirmations, the run summary, and About.
use crate::state::{AppState, PendingConfirm};
use crate::theme::SweepTheme;
use pngsweep_core::model::format::format_elapsed;

/// Draw whichever confirmation is pending, if any.
pub fn confirm_dialog(ctx: &egui::Context, state: &mut AppState) {
    let Some(pending) = state.pending_confirm else {
        return;
    };

    let (title, body) = match pending {
        PendingConfirm::FullSystem => {
            let target = state
                .resolve_root()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            (
                "Full system scan",
                format!(
                    "This walks every folder under {target}.\n\
                     It can take a long time and some folders may be skipped.\n\n\
                     Continue?"
                ),
            )
        }
        PendingConfirm::DeleteOriginals => (
            "Delete originals?",
            "Every successfully converted original will be deleted.\n\
             This cannot be undone.\n\n\
             Choose No to convert and keep the originals."
                .to_string(),
        ),
        PendingConfirm::Exit => (
            "Scan in progress",
            "A scan is still running.\nStop it and exit?".to_string(),
        ),
    };

    let mut answer: Option<bool> = None;
    let mut open = true;
    egui::Window::new(title)
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([360.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(body);
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("Yes").clicked() {
                    answer = Some(true);
                }
                if ui.button("No").clicked() {
                    answer = Some(false);
                }
                if pending == PendingConfirm::DeleteOriginals && ui.button("Cancel").clicked() {
                    state.dismiss_confirm();
                }
            });
        });

    if !open {
        state.dismiss_confirm();
        return;
    }
    if let Some(accepted) = answer {
        match pending {
            PendingConfirm::FullSystem => state.confirm_full_system(accepted),
            PendingConfirm::DeleteOriginals => state.confirm_delete(accepted),
            PendingConfirm::Exit => state.confirm_exit(accepted),
        }
    }
}

/// Draw the summary of the last run.
pub fn summary_dialog(ctx: &egui::Context, state: &mut AppState) {
    if !state.show_summary {
        return;
    }
    let Some(outcome) = state.last_outcome.as_ref() else {
        state.show_summary = false;
        return;
    };
    let theme = SweepTheme::for_mode(state.dark_mode);

    let (title, colour) = if outcome.fatal_error.is_some() {
        ("Scan failed", theme.error)
    } else if outcome.stopped_early {
        ("Scan stopped", theme.warning)
    } else if outcome.nothing_to_do() {
        ("Nothing to convert", theme.text_primary)
    } else {
        ("Scan complete", theme.success)
    };

    let mut open = true;
    let mut close_clicked = false;
    egui::Window::new(title)
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([380.0, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);
            if let Some(ref err) = outcome.fatal_error {
                ui.label(egui::RichText::new(err).color(colour));
                ui.label("The scan may be incomplete.");
                ui.add_space(8.0);
            } else if outcome.nothing_to_do() {
                ui.label("No matching files found.");
                ui.add_space(8.0);
            }

            egui::Grid::new("summary_grid")
                .num_columns(2)
                .spacing([16.0, 4.0])
                .show(ui, |ui| {
                    let c = &outcome.counters;
                    for (label, value) in [
                        ("Processed", c.processed),
                        ("Converted", c.converted),
                        ("Skipped", c.skipped),
                        ("Errors", c.errored),
                    ] {
                        ui.label(label);
                        ui.label(egui::RichText::new(value.to_string()).strong());
                        ui.end_row();
                    }
                    ui.label("Time");
                    ui.label(format_elapsed(outcome.elapsed_total()));
                    ui.end_row();
                    ui.label("Output");
                    ui.label(outcome.output_directory.display().to_string());
                    ui.end_row();
                    ui.label("Originals");
                    ui.label(if outcome.delete_originals {
                        "deleted"
                    } else {
                        "kept"
                    });
                    ui.end_row();
                });

            if outcome.skipped_dirs > 0 {
                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new(format!(
                        "{} folders could not be read.",
                        outcome.skipped_dirs
                    ))
                    .color(theme.warning),
                );
            }

            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    close_clicked = true;
                }
            });
        });

    if !open || close_clicked {
        state.show_summary = false;
    }
}

/// Draw the About window.
pub fn about_dialog(ctx: &egui::Context, state: &mut AppState) {
    let mut show_about = state.show_about;
    egui::Window::new("About PngSweep")
        .open(&mut show_about)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([340.0, 0.0])
        .show(ctx, |ui| {
            // Theme-aware colours so the dialog reads in both modes.
            let accent = ui.visuals().hyperlink_color;
            let muted = ui.visuals().weak_text_color();
            let normal = ui.visuals().text_color();

            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new("🖼 PngSweep")
                        .size(24.0)
                        .strong()
                        .color(accent),
                );
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                        .size(13.0)
                        .color(muted),
                );
                ui.add_space(12.0);
                ui.label(
                    egui::RichText::new(
                        "Finds WebP and JFIF images in a folder tree\n\
                         and converts them to flat PNGs.\n\
                         Safe to run again: existing PNGs are skipped.",
                    )
                    .size(12.0)
                    .color(normal),
                );
                ui.add_space(12.0);
                ui.separator();
                ui.add_space(4.0);
                ui.label(
                    egui::RichText::new("MIT License · Built with Rust & egui")
                        .size(11.0)
                        .color(muted),
                );
                ui.add_space(8.0);
            });
        });
    state.show_about = show_about;
}
