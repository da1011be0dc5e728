/// Platform-specific functionality: elevation status, full-system scan
/// roots, and the default output location.
pub mod permissions;
pub mod roots;

pub use permissions::is_elevated;
pub use roots::{system_roots, SystemRoot};

use crate::model::OUTPUT_FOLDER_NAME;
use std::path::PathBuf;

/// Directory containing the running executable, falling back to the
/// current working directory.
pub fn app_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `<app directory>/converted_png_images`.
pub fn default_output_directory() -> PathBuf {
    app_directory().join(OUTPUT_FOLDER_NAME)
}
