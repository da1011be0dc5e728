/// Main `eframe::App` implementation for PngSweep.
///
/// This is the top-level UI layout that composes all panels and widgets.
use crate::panels;
use crate::state::AppState;
use crate::theme::SweepTheme;
use crate::widgets;

/// Pre-built application state.
///
/// Construct this **before** calling `eframe::run_native` so that drive
/// enumeration and the elevation query complete before the OS window is
/// created and the first frame arrives immediately.
pub struct PngSweepState {
    pub(crate) inner: AppState,
}

impl PngSweepState {
    /// Enumerate roots and resolve default paths.
    /// Call this before `eframe::run_native`.
    pub fn build() -> Self {
        let state = AppState::new();
        tracing::info!(
            "Output folder: {} (elevated: {})",
            state.output_dir.display(),
            state.is_elevated
        );
        Self { inner: state }
    }
}

/// The PngSweep application.
pub struct PngSweepApp {
    state: AppState,
}

impl PngSweepApp {
    /// Create a new application instance from pre-built state.
    ///
    /// The state should have been constructed by [`PngSweepState::build()`]
    /// *before* `eframe::run_native` is called.
    pub fn with_state(cc: &eframe::CreationContext<'_>, state: PngSweepState) -> Self {
        SweepTheme::for_mode(state.inner.dark_mode).apply(&cc.egui_ctx);
        Self { state: state.inner }
    }
}

impl eframe::App for PngSweepApp {
    /// Override the GPU clear colour to match the active theme background,
    /// preventing a colour mismatch flash between frames.
    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        let [r, g, b, a] = visuals.panel_fill.to_array();
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Apply theme ───────────────────────────────────────────────────
        // Called every frame so that toggling dark_mode takes effect
        // immediately on the next rendered frame.
        SweepTheme::for_mode(self.state.dark_mode).apply(ctx);

        // ── Process background messages ───────────────────────────────────
        let _data_changed = self.state.process_scan_messages();

        // Request continuous repaint while scanning.
        if self.state.is_scanning() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // ── Window close ──────────────────────────────────────────────────
        if ctx.input(|i| i.viewport().close_requested()) && !self.state.request_exit() {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }
        if self.state.close_now {
            tracing::info!("Closing after the scan stopped");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        // ── Top toolbar ───────────────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .min_height(36.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                widgets::toolbar::toolbar(ui, &mut self.state);
                ui.add_space(4.0);
            });

        // ── Dialogs ───────────────────────────────────────────────────────
        panels::dialogs::about_dialog(ctx, &mut self.state);
        panels::dialogs::confirm_dialog(ctx, &mut self.state);
        panels::dialogs::summary_dialog(ctx, &mut self.state);

        // ── Bottom status bar ─────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.add_space(2.0);
                widgets::status_bar::status_bar(ui, &self.state);
                ui.add_space(2.0);
            });

        // ── Left sidebar ──────────────────────────────────────────────────
        egui::SidePanel::left("left_panel")
            .default_width(300.0)
            .min_width(240.0)
            .max_width(520.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::options_panel::options_panel(ui, &mut self.state);
                });
            });

        // ── Central panel (log) ───────────────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::log_panel::log_panel(ui, &self.state);
        });
    }
}

/// Title shown in the window's title bar.
pub const WINDOW_TITLE: &str = "PngSweep: WebP/JFIF to PNG";
const INITIAL_SIZE: [f32; 2] = [1000.0, 680.0];
const MIN_SIZE: [f32; 2] = [720.0, 440.0];

/// Native window options for the main viewport.
pub fn native_options(icon: egui::IconData) -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(INITIAL_SIZE)
            .with_min_inner_size(MIN_SIZE)
            .with_icon(icon),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_options_fit_the_progress_layout() {
        let options = native_options(crate::icon::generate_icon(16));
        let viewport = &options.viewport;
        assert_eq!(viewport.title.as_deref(), Some(WINDOW_TITLE));
        assert_eq!(viewport.min_inner_size, Some(egui::vec2(720.0, 440.0)));
        let initial = viewport.inner_size.expect("initial size set");
        assert!(initial.x >= 720.0 && initial.y >= 440.0);
        assert!(viewport.icon.is_some());
    }
}
