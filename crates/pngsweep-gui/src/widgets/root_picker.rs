/// Full-system root picker.
///
/// Displays every scannable drive (or `/`) as a clickable card and lets
/// the user select which one a full-system run starts from.
use crate::state::AppState;
use egui::{Sense, Ui, Vec2};

/// Draw the root cards. Disabled while a run is active.
pub fn root_picker(ui: &mut Ui, state: &mut AppState) {
    if state.system_roots.is_empty() {
        ui.label(
            egui::RichText::new("No local drives found.")
                .size(12.0)
                .color(ui.visuals().weak_text_color()),
        );
        return;
    }

    let enabled = !state.is_scanning();
    let mut new_selection = state.selected_root;

    for (i, root) in state.system_roots.iter().enumerate() {
        let is_selected = state.selected_root == Some(i);

        let sense = if enabled { Sense::click() } else { Sense::hover() };
        let (rect, response) =
            ui.allocate_exact_size(Vec2::new(ui.available_width(), 34.0), sense);

        if response.clicked() {
            new_selection = Some(i);
        }

        let painter = ui.painter_at(rect);

        // Background -- deep navy card matching the accent blue hue.
        let bg = if is_selected {
            egui::Color32::from_rgb(0x36, 0x50, 0x78)
        } else if response.hovered() && enabled {
            egui::Color32::from_rgb(0x32, 0x48, 0x6e)
        } else {
            egui::Color32::from_rgb(0x28, 0x3a, 0x5c)
        };
        painter.rect_filled(rect, 4.0, bg);
        painter.rect_stroke(
            rect,
            4.0,
            egui::Stroke::new(1.0, egui::Color32::from_rgb(0x3a, 0x50, 0x72)),
            egui::StrokeKind::Outside,
        );

        let card_text = if enabled {
            egui::Color32::WHITE
        } else {
            egui::Color32::from_rgb(0xb8, 0xb8, 0xc4)
        };
        painter.text(
            egui::pos2(rect.left() + 8.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            &root.label,
            egui::FontId::proportional(13.0),
            card_text,
        );
        painter.text(
            egui::pos2(rect.right() - 8.0, rect.center().y),
            egui::Align2::RIGHT_CENTER,
            &root.detail,
            egui::FontId::proportional(11.0),
            card_text,
        );

        ui.add_space(2.0);
    }

    state.selected_root = new_selection;
}
