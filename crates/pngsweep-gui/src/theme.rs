/// Colour scheme and visual theme for PngSweep.
///
/// Provides both dark and light themes. All colour constants are defined
/// here so the rest of the UI code references semantically-named values
/// rather than raw hex codes.
use egui::{Color32, Stroke, Visuals};
use pngsweep_core::LogLevel;

/// Semantic colour palette for PngSweep.
pub struct SweepTheme {
    pub background: Color32,
    pub surface: Color32,
    pub surface_hover: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub error: Color32,
    pub warning: Color32,
    pub success: Color32,
    pub skip: Color32,
    pub selection: Color32,
}

impl SweepTheme {
    /// Dark theme: the default.
    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(0x1e, 0x1e, 0x2e),
            surface: Color32::from_rgb(0x2a, 0x2a, 0x3c),
            surface_hover: Color32::from_rgb(0x35, 0x35, 0x4a),
            text_primary: Color32::from_rgb(0xe4, 0xe4, 0xe8),
            text_secondary: Color32::from_rgb(0xb8, 0xb8, 0xc4),
            text_muted: Color32::from_rgb(0x6c, 0x70, 0x86),
            accent: Color32::from_rgb(0x89, 0xb4, 0xfa),
            error: Color32::from_rgb(0xf3, 0x8b, 0xa8),
            warning: Color32::from_rgb(0xfa, 0xb3, 0x87),
            success: Color32::from_rgb(0xa6, 0xe3, 0xa1),
            skip: Color32::from_rgb(0x94, 0x9c, 0xbb),
            selection: Color32::from_rgb(0x28, 0x3a, 0x5c),
        }
    }

    /// Light theme: optional toggle.
    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(0xf5, 0xf5, 0xf5),
            surface: Color32::from_rgb(0xff, 0xff, 0xff),
            surface_hover: Color32::from_rgb(0xe8, 0xe8, 0xef),
            text_primary: Color32::from_rgb(0x1e, 0x1e, 0x2e),
            text_secondary: Color32::from_rgb(0x4a, 0x4a, 0x5a),
            text_muted: Color32::from_rgb(0x8a, 0x8a, 0x9a),
            accent: Color32::from_rgb(0x3a, 0x6f, 0xd8),
            error: Color32::from_rgb(0xd0, 0x40, 0x50),
            warning: Color32::from_rgb(0xd0, 0x80, 0x20),
            success: Color32::from_rgb(0x30, 0x98, 0x30),
            skip: Color32::from_rgb(0x70, 0x70, 0x80),
            selection: Color32::from_rgba_premultiplied(0x3a, 0x6f, 0xd8, 0x30),
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Text colour for a log line of `level`.
    pub fn log_colour(&self, level: LogLevel) -> Color32 {
        match level {
            LogLevel::Info => self.text_primary,
            LogLevel::Warning => self.warning,
            LogLevel::Error => self.error,
            LogLevel::Success => self.success,
            LogLevel::Skip => self.skip,
        }
    }

    /// Apply this theme to an egui context.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = if self.background.r() < 128 {
            Visuals::dark()
        } else {
            Visuals::light()
        };

        visuals.panel_fill = self.background;
        visuals.window_fill = self.surface;
        visuals.extreme_bg_color = self.background;
        visuals.faint_bg_color = self.surface;
        visuals.selection.bg_fill = self.selection;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);
        visuals.hyperlink_color = self.accent;

        visuals.widgets.noninteractive.bg_fill = self.surface;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_primary);
        visuals.widgets.inactive.bg_fill = self.surface;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);
        visuals.widgets.hovered.bg_fill = self.surface_hover;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.accent);

        ctx.set_visuals(visuals);
    }
}
