/// Bottom status bar: phase, progress bar, and counters.
use crate::state::{AppPhase, AppState};
use pngsweep_core::model::format::{format_count, format_elapsed};
use pngsweep_core::ScanState;
use egui::Ui;

/// Draw the status bar at the bottom of the window.
pub fn status_bar(ui: &mut Ui, state: &AppState) {
    // Extract theme-adaptive colours once for this frame.
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();
    let color_warning = egui::Color32::from_rgb(0xfa, 0xb3, 0x87);
    let color_success = egui::Color32::from_rgb(0xa6, 0xe3, 0xa1);
    let color_error = egui::Color32::from_rgb(0xf3, 0x8b, 0xa8);

    ui.horizontal(|ui| match state.phase {
        AppPhase::Idle => {
            ui.label(egui::RichText::new("Ready").size(12.0).color(color_weak));
        }
        AppPhase::Scanning => {
            ui.spinner();
            ui.label(
                egui::RichText::new(state.scan_state.label())
                    .size(12.0)
                    .color(color_normal),
            );
            ui.separator();

            if state.scan_state == ScanState::Converting && state.total > 0 {
                ui.add(
                    egui::ProgressBar::new(state.progress_fraction())
                        .desired_width(220.0)
                        .show_percentage(),
                );
                ui.separator();
                counters(ui, state, color_normal);
            }

            if !state.status_text.is_empty() {
                ui.separator();
                ui.label(
                    egui::RichText::new(truncate_middle(&state.status_text, 60))
                        .size(12.0)
                        .color(color_weak),
                );
            }
        }
        AppPhase::Results => {
            let Some(outcome) = state.last_outcome.as_ref() else {
                ui.label(egui::RichText::new("Stopped").size(12.0).color(color_error));
                return;
            };
            let (text, colour) = if outcome.fatal_error.is_some() {
                ("\u{2717} Scan failed", color_error)
            } else if outcome.stopped_early {
                ("\u{23f9} Scan stopped", color_warning)
            } else {
                ("\u{2713} Scan complete", color_success)
            };
            ui.label(egui::RichText::new(text).size(12.0).color(colour));
            ui.separator();
            counters(ui, state, color_normal);
            ui.separator();
            ui.label(
                egui::RichText::new(format_elapsed(outcome.elapsed_total()))
                    .size(12.0)
                    .color(color_weak),
            );
            if outcome.skipped_dirs > 0 {
                ui.separator();
                ui.label(
                    egui::RichText::new(format!(
                        "{} folders skipped",
                        format_count(outcome.skipped_dirs)
                    ))
                    .size(12.0)
                    .color(color_warning),
                );
            }
        }
    });
}

fn counters(ui: &mut Ui, state: &AppState, colour: egui::Color32) {
    let c = &state.counters;
    ui.label(
        egui::RichText::new(format!(
            "{} / {}  ·  {} converted  ·  {} skipped  ·  {} errors",
            format_count(c.processed),
            format_count(state.total),
            format_count(c.converted),
            format_count(c.skipped),
            format_count(c.errored),
        ))
        .size(12.0)
        .color(colour),
    );
}

/// Shorten `text` to at most `max_len` characters, replacing the middle
/// with "...".
fn truncate_middle(text: &str, max_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return text.to_string();
    }
    let half = (max_len - 3) / 2;
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[chars.len() - half..].iter().collect();
    format!("{head}...{tail}")
}
