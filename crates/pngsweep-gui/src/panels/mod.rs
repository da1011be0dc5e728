/// Panels and modal dialogs composing the main window.

pub mod dialogs;
pub mod log_panel;
pub mod options_panel;
